//! Rendering surface capabilities.
//!
//! A surface is the live, loaded view of the document: it can be resized,
//! laid out, queried for its natural height and exported as PDF. The
//! pagination engine drives exactly one surface per request and never
//! interleaves calls from two requests on the same instance.

pub mod capture;
pub mod formatter;
pub mod layout;
pub mod text;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::SurfaceError;
use crate::model::{Point, Rect, Size};

pub use formatter::PrintContext;
pub use text::TextSurface;

/// Probe evaluated by script-capable surfaces. Returns the six height
/// metrics as a JSON object matching [`DocumentMetrics`].
pub const HEIGHT_PROBE_SCRIPT: &str = r#"(() => {
  const b = document.body, e = document.documentElement;
  return {
    bodyScrollHeight: b.scrollHeight, bodyOffsetHeight: b.offsetHeight,
    bodyClientHeight: b.clientHeight, rootScrollHeight: e.scrollHeight,
    rootOffsetHeight: e.offsetHeight, rootClientHeight: e.clientHeight
  };
})()"#;

/// Height metrics reported by a surface after layout, in points.
///
/// Any single metric can under-report (collapsed margins, overflow), so
/// consumers take the maximum. Missing metrics are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetrics {
    pub body_scroll_height: Option<f64>,
    pub body_offset_height: Option<f64>,
    pub body_client_height: Option<f64>,
    pub root_scroll_height: Option<f64>,
    pub root_offset_height: Option<f64>,
    pub root_client_height: Option<f64>,
}

impl DocumentMetrics {
    /// Decode the JSON value produced by [`HEIGHT_PROBE_SCRIPT`]
    pub fn from_probe_json(value: serde_json::Value) -> Result<Self, SurfaceError> {
        serde_json::from_value(value).map_err(|e| SurfaceError::Evaluation(e.to_string()))
    }

    /// Largest finite metric, or `None` if none were reported
    pub fn max_height(&self) -> Option<f64> {
        [
            self.body_scroll_height,
            self.body_offset_height,
            self.body_client_height,
            self.root_scroll_height,
            self.root_offset_height,
            self.root_client_height,
        ]
        .into_iter()
        .flatten()
        .filter(|h| h.is_finite())
        .reduce(f64::max)
    }
}

/// One capture request: the `source` rectangle in content coordinates is
/// drawn on a page of size `media`, with its top-left corner at `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capture {
    pub source: Rect,
    pub media: Size,
    pub origin: Point,
}

impl Capture {
    /// A capture whose page is exactly the source rectangle
    pub fn exact(source: Rect) -> Self {
        Self {
            source,
            media: source.size,
            origin: Point::ZERO,
        }
    }
}

#[async_trait]
pub trait RenderSurface: Send {
    /// True once the content has finished loading. Measurements taken
    /// before this are unreliable.
    fn is_loaded(&self) -> bool;

    /// Force the frame size. A height of zero means unconstrained.
    fn set_frame(&mut self, size: Size);

    /// Synchronous layout pass for the current frame
    fn layout_if_needed(&mut self);

    /// Evaluate the height probe against the laid-out content
    async fn evaluate_metrics(&mut self) -> Result<DocumentMetrics, SurfaceError>;

    /// Export one capture as a single-page PDF
    async fn export_pdf(&mut self, capture: Capture) -> Result<Vec<u8>, SurfaceError>;

    /// Export the whole `content_height` in one call, paginated by the
    /// surface into pages of `page` size with content placed inside `margin`.
    async fn export_document(
        &mut self,
        page: Size,
        margin: f32,
        content_height: f32,
    ) -> Result<Vec<u8>, SurfaceError>;

    /// Print formatter bound to this surface, if the backend has one
    fn print_formatter(&mut self) -> Option<&mut dyn PrintFormatter> {
        None
    }
}

/// A platform-style print pipeline. It decides its own page count, which
/// may exceed the height-derived estimate.
pub trait PrintFormatter: Send {
    /// Configure for `paper` with content confined to `printable`;
    /// returns the formatter's page count.
    fn prepare(&mut self, paper: Rect, printable: Rect) -> Result<usize, SurfaceError>;

    /// Draw page `index` into the open context. Indices past the
    /// formatter's own count draw nothing.
    fn draw_page(&mut self, index: usize, context: &mut PrintContext) -> Result<(), SurfaceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_max_height_takes_largest_metric() {
        let metrics = DocumentMetrics {
            body_scroll_height: Some(1200.0),
            body_offset_height: Some(1180.0),
            body_client_height: Some(0.0),
            root_scroll_height: Some(1236.0),
            root_offset_height: None,
            root_client_height: Some(800.0),
        };
        assert_eq!(metrics.max_height(), Some(1236.0));
    }

    #[test]
    fn test_max_height_none_when_empty() {
        assert_eq!(DocumentMetrics::default().max_height(), None);
    }

    #[test]
    fn test_max_height_skips_nan() {
        let metrics = DocumentMetrics {
            body_scroll_height: Some(f64::NAN),
            root_scroll_height: Some(42.0),
            ..Default::default()
        };
        assert_eq!(metrics.max_height(), Some(42.0));
    }

    #[test]
    fn test_from_probe_json() {
        let value = json!({
            "bodyScrollHeight": 1500,
            "bodyOffsetHeight": 1490.5,
            "bodyClientHeight": 1490,
            "rootScrollHeight": 1536,
            "rootOffsetHeight": 1536,
            "rootClientHeight": 900
        });
        let metrics = DocumentMetrics::from_probe_json(value).unwrap();
        assert_eq!(metrics.max_height(), Some(1536.0));
    }

    #[test]
    fn test_from_probe_json_rejects_non_numeric() {
        let value = json!({ "bodyScrollHeight": "tall" });
        assert!(matches!(
            DocumentMetrics::from_probe_json(value),
            Err(SurfaceError::Evaluation(_))
        ));
    }
}
