//! The open output context a print formatter draws into.

use printpdf::{Mm, PdfDocument, PdfPage, PdfSaveOptions};

use crate::error::SurfaceError;
use crate::model::Size;
use crate::render::helpers::{compress_pdf, LayerBuilder};

const MM_PER_PT: f32 = 25.4 / 72.0;

/// A printpdf document being filled one page at a time.
///
/// Pages are opened with [`begin_page`](Self::begin_page), drawn through
/// [`layer`](Self::layer) and closed with [`end_page`](Self::end_page).
pub struct PrintContext {
    title: String,
    paper: Size,
    pages: Vec<PdfPage>,
    current: Option<LayerBuilder>,
}

impl PrintContext {
    pub fn new(title: impl Into<String>, paper: Size) -> Self {
        Self {
            title: title.into(),
            paper,
            pages: Vec::new(),
            current: None,
        }
    }

    pub fn paper(&self) -> Size {
        self.paper
    }

    /// Start a new page, closing any page left open
    pub fn begin_page(&mut self) {
        self.end_page();
        self.current = Some(LayerBuilder::new());
    }

    pub fn end_page(&mut self) {
        if let Some(layer) = self.current.take() {
            self.pages.push(PdfPage::new(
                Mm(self.paper.width * MM_PER_PT),
                Mm(self.paper.height * MM_PER_PT),
                layer.into_ops(),
            ));
        }
    }

    /// Operations of the open page
    pub fn layer(&mut self) -> Result<&mut LayerBuilder, SurfaceError> {
        self.current
            .as_mut()
            .ok_or_else(|| SurfaceError::Formatter("no page is open".to_string()))
    }

    /// Pages closed so far
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Close the document and return compressed PDF bytes
    pub fn finish(mut self) -> Result<Vec<u8>, SurfaceError> {
        self.end_page();
        if self.pages.is_empty() {
            return Err(SurfaceError::Formatter("document has no pages".to_string()));
        }

        let mut doc = PdfDocument::new(&self.title);
        doc.with_pages(self.pages);

        let mut warnings = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        for warning in &warnings {
            log::debug!("printpdf: {:?}", warning);
        }

        compress_pdf(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use printpdf::Rgb;

    #[test]
    fn test_layer_requires_open_page() {
        let mut context = PrintContext::new("t", Size::new(595.0, 842.0));
        assert!(context.layer().is_err());
        context.begin_page();
        assert!(context.layer().is_ok());
    }

    #[test]
    fn test_finish_counts_pages() {
        let mut context = PrintContext::new("Two pages", Size::new(612.0, 792.0));
        for _ in 0..2 {
            context.begin_page();
            context
                .layer()
                .unwrap()
                .fill_rect(36.0, 36.0, 100.0, 20.0, &Rgb::new(0.5, 0.5, 0.5, None));
        }
        assert_eq!(context.page_count(), 1);

        let bytes = context.finish().unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_finish_without_pages_fails() {
        let context = PrintContext::new("empty", Size::new(595.0, 842.0));
        assert!(context.finish().is_err());
    }
}
