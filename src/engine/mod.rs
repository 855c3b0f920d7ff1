//! Pagination orchestration.
//!
//! One engine call drives one surface through measure → render → filter →
//! assemble. Every step suspends on the surface and nothing runs
//! concurrently against it.

mod cancel;
mod measure;

pub use cancel::CancelToken;
pub use measure::{ContentMeasurer, MeasuredContent};

use std::path::Path;
use std::time::Duration;

use crate::assembler::{AssemblyOutcome, PdfAssembler};
use crate::config::defaults::DEFAULT_EMPTY_PAGE_SLACK;
use crate::config::Settings;
use crate::error::PaginationError;
use crate::model::{AcceptedPages, DocumentMetadata, PageSpec, RawPage};
use crate::parser::sniffer::extract_length;
use crate::render::{PagePlan, PageRenderer, RenderOutput, RenderStrategy};
use crate::surface::RenderSurface;

/// Drop every page whose fingerprint matches the empty-page probe.
///
/// The rule is applied to each page regardless of position. If every page
/// matches, the first one is kept so the output is never empty.
pub fn filter_empty_pages(probe: &RawPage, pages: Vec<RawPage>, slack: i64) -> Vec<RawPage> {
    let empty = extract_length(&probe.bytes);
    log::debug!("Empty-page fingerprint: {}", empty);

    let total = pages.len();
    let mut rejected: Option<RawPage> = None;
    let mut accepted = Vec::with_capacity(total);

    for page in pages {
        let fingerprint = extract_length(&page.bytes);
        if fingerprint.matches_empty(empty, slack) {
            log::warn!(
                "Dropping page {}: stream length {} matches empty page {} (slack {})",
                page.index + 1,
                fingerprint,
                empty,
                slack
            );
            if rejected.is_none() {
                rejected = Some(page);
            }
        } else {
            log::debug!("Accepted page {} (stream length {})", page.index + 1, fingerprint);
            accepted.push(page);
        }
    }

    if accepted.is_empty() {
        if let Some(first) = rejected {
            log::warn!("All {} pages look empty; keeping page {}", total, first.index + 1);
            accepted.push(first);
        }
    }
    accepted
}

pub struct PaginationEngine {
    spec: PageSpec,
    renderer: Box<dyn PageRenderer>,
    measurer: ContentMeasurer,
    empty_page_slack: i64,
    cancel: CancelToken,
}

impl PaginationEngine {
    pub fn new(spec: PageSpec, strategy: RenderStrategy) -> Self {
        Self {
            spec,
            renderer: strategy.renderer(),
            measurer: ContentMeasurer::default(),
            empty_page_slack: DEFAULT_EMPTY_PAGE_SLACK,
            cancel: CancelToken::new(),
        }
    }

    /// Engine configured from validated settings
    pub fn from_settings(settings: &Settings) -> Result<Self, PaginationError> {
        settings.validate()?;
        Ok(Self::new(settings.page_spec()?, settings.strategy)
            .with_slack(settings.empty_page_slack)
            .with_probe_timeout(settings.probe_timeout))
    }

    pub fn with_slack(mut self, slack: i64) -> Self {
        self.empty_page_slack = slack;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.measurer = ContentMeasurer::new(timeout);
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Swap in a custom backend
    pub fn with_renderer(mut self, renderer: Box<dyn PageRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn strategy(&self) -> RenderStrategy {
        self.renderer.strategy()
    }

    /// A handle that cancels this engine's in-flight request
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Measure, render and filter. Nothing is written.
    pub async fn paginate(
        &self,
        surface: &mut dyn RenderSurface,
        title: &str,
    ) -> Result<AcceptedPages, PaginationError> {
        self.cancel.check(0, 0)?;

        let measured = self.measurer.measure(surface, self.spec.size().width).await?;
        let plan = PagePlan::new(self.spec, measured.height, title)?;
        log::info!(
            "Paginating {:.1}pt of content into {} pages of {:.1}pt ({})",
            measured.height,
            plan.page_count,
            plan.content_rect().height(),
            self.strategy()
        );

        let output = self.renderer.render(surface, &plan, &self.cancel).await?;
        let accepted = match output {
            RenderOutput::Slices { probe, pages } => {
                AcceptedPages::Captures(filter_empty_pages(&probe, pages, self.empty_page_slack))
            }
            RenderOutput::Document(document) => AcceptedPages::Document(document),
        };

        log::info!("Accepted {} of {} pages", accepted.page_count(), plan.page_count);
        Ok(accepted)
    }

    /// Full request: paginate, then assemble to `path`.
    pub async fn render_to_file(
        &self,
        surface: &mut dyn RenderSurface,
        metadata: DocumentMetadata,
        path: &Path,
    ) -> Result<AssemblyOutcome, PaginationError> {
        let title = metadata.title.clone().unwrap_or_default();
        let accepted = self.paginate(surface, &title).await?;
        PdfAssembler::new(metadata).assemble(&accepted, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with_length(index: usize, length: i64) -> RawPage {
        let bytes = format!("%PDF-1.5\n1 0 obj\n<</Length {}/Filter/FlateDecode>>stream\n", length);
        RawPage::new(index, bytes.into_bytes())
    }

    #[test]
    fn test_filter_drops_pages_matching_probe() {
        let probe = page_with_length(3, 84);
        let pages = vec![
            page_with_length(0, 2400),
            page_with_length(1, 1900),
            page_with_length(2, 90),
        ];
        let accepted = filter_empty_pages(&probe, pages, 16);
        let indices: Vec<usize> = accepted.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_filter_is_position_independent() {
        let probe = page_with_length(3, 84);
        let pages = vec![
            page_with_length(0, 2400),
            page_with_length(1, 84),
            page_with_length(2, 1500),
        ];
        let indices: Vec<usize> = filter_empty_pages(&probe, pages, 16)
            .iter()
            .map(|p| p.index)
            .collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_filter_keeps_everything_without_probe_fingerprint() {
        let probe = RawPage::new(2, b"%PDF-1.5 no dictionary".to_vec());
        let pages = vec![page_with_length(0, 84), page_with_length(1, 84)];
        assert_eq!(filter_empty_pages(&probe, pages, 16).len(), 2);
    }

    #[test]
    fn test_filter_keeps_unsniffable_pages() {
        let probe = page_with_length(2, 84);
        let pages = vec![
            page_with_length(0, 2400),
            RawPage::new(1, b"<</Length 7 0 R>>".to_vec()),
        ];
        assert_eq!(filter_empty_pages(&probe, pages, 16).len(), 2);
    }

    #[test]
    fn test_filter_never_returns_nothing() {
        let probe = page_with_length(2, 84);
        let pages = vec![page_with_length(0, 84), page_with_length(1, 86)];
        let accepted = filter_empty_pages(&probe, pages, 16);
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].index, 0);
    }

    #[test]
    fn test_slack_is_tunable() {
        let probe = page_with_length(1, 84);
        let strict = filter_empty_pages(&probe, vec![page_with_length(0, 90)], 0);
        assert_eq!(strict[0].index, 0);

        let pages = vec![page_with_length(0, 2000), page_with_length(1, 90)];
        assert_eq!(filter_empty_pages(&probe, pages.clone(), 0).len(), 2);
        assert_eq!(filter_empty_pages(&probe, pages, 16).len(), 1);
    }
}
