//! Sliced capture: one export per page rectangle.

use async_trait::async_trait;

use super::{PagePlan, PageRenderer, RenderOutput, RenderStrategy};
use crate::engine::CancelToken;
use crate::error::PaginationError;
use crate::model::RawPage;
use crate::surface::RenderSurface;

pub struct SlicedCaptureRenderer;

#[async_trait]
impl PageRenderer for SlicedCaptureRenderer {
    fn strategy(&self) -> RenderStrategy {
        RenderStrategy::Sliced
    }

    async fn render(
        &self,
        surface: &mut dyn RenderSurface,
        plan: &PagePlan,
        cancel: &CancelToken,
    ) -> Result<RenderOutput, PaginationError> {
        let total = plan.page_count;

        // The probe comes first: its fingerprint is what every page is compared to
        cancel.check(0, total)?;
        let probe_index = total;
        let probe = surface
            .export_pdf(plan.capture(probe_index))
            .await
            .map_err(|e| PaginationError::render(probe_index, e))?;
        log::debug!("Captured empty-page probe ({} bytes)", probe.len());

        let mut pages = Vec::new();
        for index in 0..total {
            cancel.check(index, total)?;
            let bytes = surface
                .export_pdf(plan.capture(index))
                .await
                .map_err(|e| PaginationError::render(index, e))?;
            log::debug!("Captured page {}/{} ({} bytes)", index + 1, total, bytes.len());
            pages.push(RawPage::new(index, bytes));
        }

        Ok(RenderOutput::Slices {
            probe: RawPage::new(probe_index, probe),
            pages,
        })
    }
}
