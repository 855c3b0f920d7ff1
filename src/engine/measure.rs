//! Natural content height measurement.

use std::time::Duration;

use tokio::time::timeout;

use crate::config::defaults::DEFAULT_PROBE_TIMEOUT_MS;
use crate::error::PaginationError;
use crate::model::Size;
use crate::surface::RenderSurface;

/// Content laid out at a fixed width with unconstrained height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasuredContent {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone)]
pub struct ContentMeasurer {
    timeout: Duration,
}

impl Default for ContentMeasurer {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
        }
    }
}

impl ContentMeasurer {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Lay the surface out at `width` with zero height and take the largest
    /// reported height metric.
    ///
    /// The surface must already have finished loading. A probe that fails,
    /// times out, reports nothing or reports a height that is not positive
    /// is a measurement failure.
    pub async fn measure(
        &self,
        surface: &mut dyn RenderSurface,
        width: f32,
    ) -> Result<MeasuredContent, PaginationError> {
        if !surface.is_loaded() {
            return Err(PaginationError::Measurement(
                "content has not finished loading".to_string(),
            ));
        }

        surface.set_frame(Size::new(width, 0.0));
        surface.layout_if_needed();

        let metrics = timeout(self.timeout, surface.evaluate_metrics())
            .await
            .map_err(|_| {
                PaginationError::Measurement(format!(
                    "height probe timed out after {} ms",
                    self.timeout.as_millis()
                ))
            })?
            .map_err(|e| PaginationError::Measurement(e.to_string()))?;

        let height = metrics.max_height().ok_or_else(|| {
            PaginationError::Measurement("height probe reported no metrics".to_string())
        })?;
        if height <= 0.0 || !height.is_finite() {
            return Err(PaginationError::Measurement(format!(
                "content height {} is not positive",
                height
            )));
        }

        log::debug!("Measured content height {:.1}pt at width {:.1}pt", height, width);
        Ok(MeasuredContent {
            width,
            height: height as f32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SurfaceError;
    use crate::surface::{Capture, DocumentMetrics};
    use async_trait::async_trait;

    /// Reports fixed metrics, optionally after a delay
    struct FixedSurface {
        loaded: bool,
        metrics: Result<DocumentMetrics, &'static str>,
        delay: Option<Duration>,
        frame: Size,
    }

    impl FixedSurface {
        fn with_height(height: f64) -> Self {
            Self {
                loaded: true,
                metrics: Ok(DocumentMetrics {
                    body_scroll_height: Some(height),
                    ..Default::default()
                }),
                delay: None,
                frame: Size::default(),
            }
        }
    }

    #[async_trait]
    impl RenderSurface for FixedSurface {
        fn is_loaded(&self) -> bool {
            self.loaded
        }

        fn set_frame(&mut self, size: Size) {
            self.frame = size;
        }

        fn layout_if_needed(&mut self) {}

        async fn evaluate_metrics(&mut self) -> Result<DocumentMetrics, SurfaceError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.metrics
                .map_err(|e| SurfaceError::Evaluation(e.to_string()))
        }

        async fn export_pdf(&mut self, _capture: Capture) -> Result<Vec<u8>, SurfaceError> {
            Err(SurfaceError::Unsupported("export"))
        }

        async fn export_document(&mut self, _page: Size, _margin: f32, _height: f32) -> Result<Vec<u8>, SurfaceError> {
            Err(SurfaceError::Unsupported("export"))
        }
    }

    #[tokio::test]
    async fn test_measures_at_fixed_width_and_zero_height() {
        let mut surface = FixedSurface::with_height(2000.0);
        let measured = ContentMeasurer::default().measure(&mut surface, 595.0).await.unwrap();
        assert_eq!(measured, MeasuredContent { width: 595.0, height: 2000.0 });
        assert_eq!(surface.frame, Size::new(595.0, 0.0));
    }

    #[tokio::test]
    async fn test_non_positive_height_is_failure() {
        for height in [0.0, -1.0, f64::INFINITY] {
            let mut surface = FixedSurface::with_height(height);
            assert!(matches!(
                ContentMeasurer::default().measure(&mut surface, 595.0).await,
                Err(PaginationError::Measurement(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_unloaded_surface_is_failure() {
        let mut surface = FixedSurface::with_height(100.0);
        surface.loaded = false;
        assert!(matches!(
            ContentMeasurer::default().measure(&mut surface, 595.0).await,
            Err(PaginationError::Measurement(_))
        ));
    }

    #[tokio::test]
    async fn test_probe_error_and_empty_metrics() {
        let mut failing = FixedSurface::with_height(100.0);
        failing.metrics = Err("script threw");
        assert!(ContentMeasurer::default().measure(&mut failing, 595.0).await.is_err());

        let mut empty = FixedSurface::with_height(100.0);
        empty.metrics = Ok(DocumentMetrics::default());
        assert!(ContentMeasurer::default().measure(&mut empty, 595.0).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_timeout() {
        let mut surface = FixedSurface::with_height(100.0);
        surface.delay = Some(Duration::from_secs(60));
        let result = ContentMeasurer::new(Duration::from_millis(50))
            .measure(&mut surface, 595.0)
            .await;
        match result {
            Err(PaginationError::Measurement(message)) => assert!(message.contains("timed out")),
            other => panic!("expected timeout, got {:?}", other),
        }
    }
}
