//! Helper utilities for PDF rendering

pub mod compress;
pub mod encoding;
pub mod layer;
pub mod text_metrics;

pub use compress::compress_pdf;
pub use layer::LayerBuilder;
pub use text_metrics::{builtin_font, measurer, BuiltinFontMeasurer};
