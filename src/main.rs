use anyhow::{Context, Result};
use clap::Parser;
use std::fs;

use paginated_pdf::cli::Args;
use paginated_pdf::config::Settings;
use paginated_pdf::engine::PaginationEngine;
use paginated_pdf::surface::TextSurface;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    // Read input file
    let markdown = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read input file: {}", args.input.display()))?;

    let mut settings = Settings::from_args(&args).with_context(|| "Invalid options")?;
    settings.metadata.creator = Some(env!("CARGO_PKG_NAME").to_string());

    let engine = PaginationEngine::from_settings(&settings).with_context(|| "Invalid page setup")?;
    log::info!(
        "Rendering {} on {:?} paper ({})",
        args.input.display(),
        settings.paper_size(),
        engine.strategy()
    );

    let output_path = settings.output_path();
    let mut surface = TextSurface::from_markdown(&markdown, settings.appearance.clone());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .with_context(|| "Failed to start async runtime")?;

    let outcome = runtime
        .block_on(engine.render_to_file(&mut surface, settings.metadata.clone(), &output_path))
        .with_context(|| "Failed to generate PDF")?;

    println!(
        "Successfully wrote {} pages to {}",
        outcome.page_count,
        outcome.path.display()
    );

    Ok(())
}
