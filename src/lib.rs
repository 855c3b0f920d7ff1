pub mod assembler;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod surface;

pub use assembler::{AssemblyOutcome, PdfAssembler};
pub use config::{Appearance, Settings};
pub use engine::{CancelToken, ContentMeasurer, PaginationEngine};
pub use error::{ConfigError, PaginationError, SurfaceError};
pub use model::{DocumentMetadata, PageSpec, PaperSize, Region};
pub use render::{PageRenderer, RenderStrategy};
pub use surface::{RenderSurface, TextSurface};

/// High-level API for turning markdown into a paginated PDF file.
///
/// Loads `markdown` into a [`TextSurface`] with the appearance from
/// `settings`, paginates it with the configured strategy and writes the
/// result to `settings.output_path()`.
///
/// # Example
///
/// ```no_run
/// use paginated_pdf::{render_markdown_to_pdf, PaperSize, Settings};
///
/// # async fn run() -> Result<(), paginated_pdf::PaginationError> {
/// let settings = Settings::default()
///     .with_paper(PaperSize::A4)
///     .with_output("report.pdf");
/// let outcome = render_markdown_to_pdf("# Report\n\nBody text.", &settings).await?;
/// println!("{} pages", outcome.page_count);
/// # Ok(())
/// # }
/// ```
pub async fn render_markdown_to_pdf(
    markdown: &str,
    settings: &Settings,
) -> Result<AssemblyOutcome, PaginationError> {
    let engine = PaginationEngine::from_settings(settings)?;
    let mut surface = TextSurface::from_markdown(markdown, settings.appearance.clone());
    engine
        .render_to_file(&mut surface, settings.metadata.clone(), &settings.output_path())
        .await
}
