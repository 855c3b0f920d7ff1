//! Built-in rendering surface for markdown text.
//!
//! Plays the role a web view plays for a browser-backed host: it owns the
//! loaded content, lays it out for whatever frame it is given, answers the
//! height probe and exports captures as PDF. It also carries a print
//! formatter that paginates on line boundaries.

use async_trait::async_trait;

use crate::config::Appearance;
use crate::error::SurfaceError;
use crate::model::{compute_page_count, Point, Rect, Size};
use crate::parser::markdown::{parse_markdown, Block};
use crate::surface::capture::write_captures;
use crate::surface::formatter::PrintContext;
use crate::surface::layout::{layout_blocks, Band, DocumentLayout, Mark};
use crate::surface::{Capture, DocumentMetrics, PrintFormatter, RenderSurface};

/// Bands of the print layout that land on one printed page
#[derive(Debug, Clone, Copy)]
struct PrintedPage {
    first: usize,
    end: usize,
    /// Content y drawn at the top of the printable area
    top: f32,
}

struct PrintPlan {
    paper: Rect,
    printable: Rect,
    layout: DocumentLayout,
    pages: Vec<PrintedPage>,
}

pub struct TextSurface {
    appearance: Appearance,
    blocks: Vec<Block>,
    loaded: bool,
    frame: Size,
    layout: Option<DocumentLayout>,
    print_plan: Option<PrintPlan>,
}

impl TextSurface {
    /// An empty surface that has not loaded anything yet
    pub fn new(appearance: Appearance) -> Self {
        Self {
            appearance,
            blocks: Vec::new(),
            loaded: false,
            frame: Size::default(),
            layout: None,
            print_plan: None,
        }
    }

    /// A surface with `markdown` already loaded
    pub fn from_markdown(markdown: &str, appearance: Appearance) -> Self {
        let mut surface = Self::new(appearance);
        surface.load(markdown);
        surface
    }

    /// Replace the content. Any previous layout is discarded.
    pub fn load(&mut self, markdown: &str) {
        self.blocks = parse_markdown(markdown);
        self.layout = None;
        self.print_plan = None;
        self.loaded = true;
        log::debug!("Loaded {} blocks", self.blocks.len());
    }

    fn ensure_loaded(&self) -> Result<(), SurfaceError> {
        if self.loaded {
            Ok(())
        } else {
            Err(SurfaceError::NotLoaded)
        }
    }

    fn current_layout(&mut self) -> Result<&DocumentLayout, SurfaceError> {
        self.ensure_loaded()?;
        self.layout_if_needed();
        self.layout
            .as_ref()
            .ok_or_else(|| SurfaceError::Evaluation("layout unavailable".to_string()))
    }
}

#[async_trait]
impl RenderSurface for TextSurface {
    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn set_frame(&mut self, size: Size) {
        if self.frame.width != size.width {
            self.layout = None;
        }
        self.frame = size;
    }

    fn layout_if_needed(&mut self) {
        if !self.loaded || self.layout.is_some() {
            return;
        }
        let padding = self.appearance.body_padding;
        self.layout = Some(layout_blocks(&self.blocks, &self.appearance, self.frame.width, padding));
    }

    async fn evaluate_metrics(&mut self) -> Result<DocumentMetrics, SurfaceError> {
        let frame_height = self.frame.height as f64;
        let layout = self.current_layout()?;
        let content = layout.content_height as f64;
        let body = (layout.body_bottom() - layout.padding).max(0.0) as f64;

        Ok(DocumentMetrics {
            body_scroll_height: Some(content),
            body_offset_height: Some(body),
            body_client_height: Some(body),
            root_scroll_height: Some(content.max(frame_height)),
            root_offset_height: Some(content),
            root_client_height: Some(frame_height),
        })
    }

    async fn export_pdf(&mut self, capture: Capture) -> Result<Vec<u8>, SurfaceError> {
        let layout = self.current_layout()?;
        write_captures(layout, &[capture])
    }

    async fn export_document(
        &mut self,
        page: Size,
        margin: f32,
        content_height: f32,
    ) -> Result<Vec<u8>, SurfaceError> {
        let layout = self.current_layout()?;
        let slice_height = page.height - 2.0 * margin;
        if slice_height <= 0.0 {
            return Err(SurfaceError::Export(format!(
                "margin {}pt leaves no room on a {}pt page",
                margin, page.height
            )));
        }

        let pages = compute_page_count(content_height, slice_height);
        let captures: Vec<Capture> = (0..pages)
            .map(|i| Capture {
                source: Rect::new(0.0, i as f32 * slice_height, page.width, slice_height),
                media: page,
                origin: Point::new(0.0, margin),
            })
            .collect();
        write_captures(layout, &captures)
    }

    fn print_formatter(&mut self) -> Option<&mut dyn PrintFormatter> {
        Some(self)
    }
}

/// Greedy band packing; a band taller than the page gets a page of its own
fn paginate(bands: &[Band], page_height: f32) -> Vec<PrintedPage> {
    let mut pages = Vec::new();
    let mut first = 0;

    while first < bands.len() {
        let top = bands[first].top;
        let mut end = first + 1;
        while end < bands.len() && bands[end].bottom() - top <= page_height {
            end += 1;
        }
        pages.push(PrintedPage { first, end, top });
        first = end;
    }

    if pages.is_empty() {
        pages.push(PrintedPage {
            first: 0,
            end: 0,
            top: 0.0,
        });
    }
    pages
}

impl PrintFormatter for TextSurface {
    fn prepare(&mut self, paper: Rect, printable: Rect) -> Result<usize, SurfaceError> {
        self.ensure_loaded()?;
        if printable.width() <= 0.0 || printable.height() <= 0.0 {
            return Err(SurfaceError::Formatter("printable area is empty".to_string()));
        }

        let layout = layout_blocks(&self.blocks, &self.appearance, printable.width(), 0.0);
        let pages = paginate(&layout.bands, printable.height());
        let count = pages.len();
        self.print_plan = Some(PrintPlan {
            paper,
            printable,
            layout,
            pages,
        });
        Ok(count)
    }

    fn draw_page(&mut self, index: usize, context: &mut PrintContext) -> Result<(), SurfaceError> {
        let plan = self
            .print_plan
            .as_ref()
            .ok_or_else(|| SurfaceError::Formatter("draw_page called before prepare".to_string()))?;
        let Some(page) = plan.pages.get(index) else {
            return Ok(());
        };

        let paper_height = plan.paper.height();
        let printable = plan.printable;
        let layer = context.layer()?;

        layer.fill_rect(0.0, 0.0, plan.paper.width(), paper_height, &plan.layout.background);

        // Content y (top-down, relative to the page's first band) to PDF y
        let to_pdf_y = |y: f32| paper_height - (printable.y() + (y - page.top));

        for band in &plan.layout.bands[page.first..page.end] {
            for mark in &band.marks {
                match mark {
                    Mark::Fill { rect, color } => layer.fill_rect(
                        printable.x() + rect.x(),
                        to_pdf_y(rect.max_y()),
                        rect.width(),
                        rect.height(),
                        color,
                    ),
                    Mark::Text {
                        x,
                        baseline,
                        text,
                        font,
                        size,
                        color,
                    } => layer.use_text(text, *size, printable.x() + x, to_pdf_y(*baseline), *font, color),
                }
            }
        }
        Ok(())
    }
}
