//! Page rendering strategies.
//!
//! Which backend turns the measured content into PDF pages is data: a
//! [`RenderStrategy`] value picks one [`PageRenderer`]. The pagination
//! algorithm around it is the same for all three.

pub mod helpers;
pub mod print_formatter;
pub mod single_shot;
pub mod sliced;

use std::fmt;

use async_trait::async_trait;
use clap::ValueEnum;

use crate::config::defaults::MAX_PAGE_COUNT;
use crate::engine::CancelToken;
use crate::error::PaginationError;
use crate::model::{compute_page_count, PageSpec, Point, RawPage, Rect, RenderedDocument, Size};
use crate::surface::{Capture, RenderSurface};

pub use print_formatter::PrintFormatterRenderer;
pub use single_shot::SingleShotRenderer;
pub use sliced::SlicedCaptureRenderer;

/// Which backend produces the pages
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum RenderStrategy {
    /// One capture per page plus an out-of-bounds probe; blank pages are
    /// filtered by stream fingerprint
    #[default]
    Sliced,
    /// The surface exports and paginates the whole content in one call
    SingleShot,
    /// A print formatter decides the page count and draws each page
    PrintFormatter,
}

impl RenderStrategy {
    pub fn renderer(&self) -> Box<dyn PageRenderer> {
        match self {
            RenderStrategy::Sliced => Box::new(SlicedCaptureRenderer),
            RenderStrategy::SingleShot => Box::new(SingleShotRenderer),
            RenderStrategy::PrintFormatter => Box::new(PrintFormatterRenderer),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RenderStrategy::Sliced => "sliced-capture",
            RenderStrategy::SingleShot => "single-shot",
            RenderStrategy::PrintFormatter => "print-formatter",
        }
    }
}

impl fmt::Display for RenderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a renderer needs to know about one pagination request
#[derive(Debug, Clone)]
pub struct PagePlan {
    pub spec: PageSpec,
    pub content_height: f32,
    pub page_count: usize,
    /// Title handed to backends that build their own document
    pub title: String,
}

impl PagePlan {
    /// Fails when `content_height` would need more than [`MAX_PAGE_COUNT`] pages
    pub fn new(
        spec: PageSpec,
        content_height: f32,
        title: impl Into<String>,
    ) -> Result<Self, PaginationError> {
        let page_count = compute_page_count(content_height, spec.content_rect().height());
        if page_count > MAX_PAGE_COUNT {
            return Err(PaginationError::Measurement(format!(
                "content height {}pt needs more than {} pages",
                content_height, MAX_PAGE_COUNT
            )));
        }
        Ok(Self {
            spec,
            content_height,
            page_count,
            title: title.into(),
        })
    }

    pub fn paper(&self) -> Size {
        self.spec.size()
    }

    pub fn page_rect(&self) -> Rect {
        self.spec.page_rect()
    }

    pub fn content_rect(&self) -> Rect {
        self.spec.content_rect()
    }

    /// Capture for page `index`: a full-width slice one content-rect tall,
    /// placed below the top margin. `index == page_count` is the
    /// out-of-bounds empty-page probe.
    pub fn capture(&self, index: usize) -> Capture {
        let paper = self.paper();
        let slice_height = self.content_rect().height();
        Capture {
            source: Rect::new(0.0, index as f32 * slice_height, paper.width, slice_height),
            media: paper,
            origin: Point::new(0.0, self.spec.margin),
        }
    }
}

/// What a renderer hands back to the engine
#[derive(Debug)]
pub enum RenderOutput {
    /// Per-page captures still subject to empty-page filtering, plus the
    /// probe they are compared against
    Slices { probe: RawPage, pages: Vec<RawPage> },
    /// A finished multi-page document, accepted as-is
    Document(RenderedDocument),
}

#[async_trait]
pub trait PageRenderer: Send + Sync {
    fn strategy(&self) -> RenderStrategy;

    /// Render every page of `plan`. A failure on any page aborts the whole
    /// request.
    async fn render(
        &self,
        surface: &mut dyn RenderSurface,
        plan: &PagePlan,
        cancel: &CancelToken,
    ) -> Result<RenderOutput, PaginationError>;
}

/// Page count of a backend-produced PDF
pub(crate) fn count_pages(bytes: &[u8]) -> Result<usize, PaginationError> {
    let doc = lopdf::Document::load_mem(bytes)
        .map_err(|e| PaginationError::Assembly(format!("Backend produced an unreadable PDF: {}", e)))?;
    Ok(doc.get_pages().len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PaperSize;

    #[test]
    fn test_capture_rectangles() {
        let spec = PageSpec::new(PaperSize::A4, 36.0).unwrap();
        let plan = PagePlan::new(spec, 2000.0, "t").unwrap();
        assert_eq!(plan.page_count, 3);

        let second = plan.capture(1);
        assert_eq!(second.source, Rect::new(0.0, 770.0, 595.0, 770.0));
        assert_eq!(second.media, Size::new(595.0, 842.0));
        assert_eq!(second.origin, Point::new(0.0, 36.0));

        let probe = plan.capture(plan.page_count);
        assert_eq!(probe.source.y(), 2310.0);
    }

    #[test]
    fn test_page_count_limit() {
        let spec = PageSpec::new(PaperSize::A4, 36.0).unwrap();
        let at_limit = 770.0 * MAX_PAGE_COUNT as f32;
        assert_eq!(PagePlan::new(spec, at_limit, "t").unwrap().page_count, MAX_PAGE_COUNT);

        for height in [at_limit * 2.0, 1e30] {
            assert!(matches!(
                PagePlan::new(spec, height, "t"),
                Err(PaginationError::Measurement(_))
            ));
        }
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(RenderStrategy::default(), RenderStrategy::Sliced);
        assert_eq!(RenderStrategy::SingleShot.to_string(), "single-shot");
        for strategy in [
            RenderStrategy::Sliced,
            RenderStrategy::SingleShot,
            RenderStrategy::PrintFormatter,
        ] {
            assert_eq!(strategy.renderer().strategy(), strategy);
        }
    }
}
