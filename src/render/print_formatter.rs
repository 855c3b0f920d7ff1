//! Print formatter pipeline: the formatter owns pagination.

use async_trait::async_trait;

use super::{count_pages, PagePlan, PageRenderer, RenderOutput, RenderStrategy};
use crate::engine::CancelToken;
use crate::error::{PaginationError, SurfaceError};
use crate::model::RenderedDocument;
use crate::surface::{PrintContext, RenderSurface};

pub struct PrintFormatterRenderer;

#[async_trait]
impl PageRenderer for PrintFormatterRenderer {
    fn strategy(&self) -> RenderStrategy {
        RenderStrategy::PrintFormatter
    }

    async fn render(
        &self,
        surface: &mut dyn RenderSurface,
        plan: &PagePlan,
        cancel: &CancelToken,
    ) -> Result<RenderOutput, PaginationError> {
        let formatter = surface
            .print_formatter()
            .ok_or_else(|| PaginationError::render(0, SurfaceError::Unsupported("print formatter")))?;

        let formatter_pages = formatter
            .prepare(plan.page_rect(), plan.content_rect())
            .map_err(|e| PaginationError::render(0, e))?;

        // The formatter may need more pages than the height estimate
        let total = formatter_pages.max(plan.page_count);
        if formatter_pages != plan.page_count {
            log::info!(
                "Print formatter wants {} pages, estimate was {}; printing {}",
                formatter_pages,
                plan.page_count,
                total
            );
        }

        let mut context = PrintContext::new(plan.title.as_str(), plan.paper());
        for index in 0..total {
            cancel.check(index, total)?;
            context.begin_page();
            formatter
                .draw_page(index, &mut context)
                .map_err(|e| PaginationError::render(index, e))?;
            context.end_page();
            log::debug!("Printed page {}/{}", index + 1, total);
        }

        let bytes = context
            .finish()
            .map_err(|e| PaginationError::Assembly(e.to_string()))?;
        let page_count = count_pages(&bytes)?;

        Ok(RenderOutput::Document(RenderedDocument { bytes, page_count }))
    }
}
