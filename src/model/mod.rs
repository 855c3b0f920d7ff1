pub mod geometry;
pub mod metadata;
pub mod page;

pub use geometry::{compute_page_count, PageSpec, PaperSize, Point, Rect, Region, Size};
pub use metadata::{pdf_date, DocumentMetadata};
pub use page::{AcceptedPages, RawPage, RenderedDocument, StreamFingerprint};
