//! Single-shot export: the surface paginates everything in one call.

use async_trait::async_trait;

use super::{count_pages, PagePlan, PageRenderer, RenderOutput, RenderStrategy};
use crate::engine::CancelToken;
use crate::error::PaginationError;
use crate::model::RenderedDocument;
use crate::surface::RenderSurface;

pub struct SingleShotRenderer;

#[async_trait]
impl PageRenderer for SingleShotRenderer {
    fn strategy(&self) -> RenderStrategy {
        RenderStrategy::SingleShot
    }

    async fn render(
        &self,
        surface: &mut dyn RenderSurface,
        plan: &PagePlan,
        cancel: &CancelToken,
    ) -> Result<RenderOutput, PaginationError> {
        cancel.check(0, plan.page_count)?;

        let bytes = surface
            .export_document(plan.paper(), plan.spec.margin, plan.content_height)
            .await
            .map_err(|e| PaginationError::render(0, e))?;
        let page_count = count_pages(&bytes)?;

        if page_count != plan.page_count {
            log::info!(
                "Backend paginated into {} pages (estimate was {})",
                page_count,
                plan.page_count
            );
        }

        Ok(RenderOutput::Document(RenderedDocument { bytes, page_count }))
    }
}
