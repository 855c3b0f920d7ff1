//! Operation builder for printpdf 0.8 pages
//!
//! Collects `Op`s for one page in PDF user space (points, origin
//! bottom-left), drawing text with the builtin fonts only.

use printpdf::{
    BuiltinFont, Color, LinePoint, Op, PaintMode, Point, Polygon, PolygonRing, Pt, Rgb, TextItem,
    WindingOrder,
};

use super::encoding::ascii_fallback;

/// A builder that collects PDF operations for one page
#[derive(Default)]
pub struct LayerBuilder {
    ops: Vec<Op>,
}

impl LayerBuilder {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Get the collected operations
    pub fn into_ops(self) -> Vec<Op> {
        self.ops
    }

    /// Get a reference to the operations (for inspection)
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Set the fill color
    pub fn set_fill_color(&mut self, color: &Rgb) {
        self.ops.push(Op::SetFillColor {
            col: Color::Rgb(color.clone()),
        });
    }

    /// Draw text with its baseline starting at `(x, y)`
    pub fn use_text(&mut self, text: &str, font_size: f32, x: f32, y: f32, font: BuiltinFont, color: &Rgb) {
        if text.is_empty() {
            return;
        }

        self.ops.push(Op::StartTextSection);
        self.ops.push(Op::SetTextCursor {
            pos: Point { x: Pt(x), y: Pt(y) },
        });
        self.ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(font_size),
            font,
        });
        self.ops.push(Op::SetLineHeight { lh: Pt(font_size) });
        self.set_fill_color(color);
        self.ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(ascii_fallback(text))],
            font,
        });
        self.ops.push(Op::EndTextSection);
    }

    /// Add a rectangle given its lower-left and upper-right corners
    pub fn add_rect(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, mode: PaintMode) {
        let corner = |x: f32, y: f32| LinePoint {
            p: Point { x: Pt(x), y: Pt(y) },
            bezier: false,
        };

        let polygon = Polygon {
            rings: vec![PolygonRing {
                points: vec![corner(x1, y1), corner(x2, y1), corner(x2, y2), corner(x1, y2)],
            }],
            mode,
            winding_order: WindingOrder::NonZero,
        };

        self.ops.push(Op::DrawPolygon { polygon });
    }

    /// Fill a rectangle given its lower-left corner and size
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: &Rgb) {
        self.set_fill_color(color);
        self.add_rect(x, y, x + width, y + height, PaintMode::Fill);
    }
}
