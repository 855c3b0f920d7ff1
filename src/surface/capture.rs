//! Minimal PDF writer for text surface captures.
//!
//! Each page's content stream is added before any other object, so the
//! first dictionary of the file is `<</Length N/Filter/FlateDecode>>` and
//! blank captures share a stable stream length.

use std::collections::BTreeMap;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use printpdf::{BuiltinFont, Rgb};

use crate::error::SurfaceError;
use crate::render::helpers::encoding::win_ansi_bytes;
use crate::render::helpers::text_metrics::base_font_name;
use crate::surface::layout::{DocumentLayout, Mark};
use crate::surface::Capture;

/// Font resource names in first-use order across all captures
#[derive(Default)]
struct FontTable {
    names: BTreeMap<&'static str, String>,
}

impl FontTable {
    fn resource_name(&mut self, font: BuiltinFont) -> String {
        let base = base_font_name(font);
        let next = self.names.len() + 1;
        self.names
            .entry(base)
            .or_insert_with(|| format!("F{}", next))
            .clone()
    }
}

fn color_op(operator: &str, color: &Rgb) -> Operation {
    Operation::new(
        operator,
        vec![color.r.into(), color.g.into(), color.b.into()],
    )
}

fn rect_op(x: f32, y: f32, width: f32, height: f32) -> Operation {
    Operation::new("re", vec![x.into(), y.into(), width.into(), height.into()])
}

/// Content stream operations for one capture
fn capture_operations(layout: &DocumentLayout, capture: &Capture, fonts: &mut FontTable) -> Vec<Operation> {
    let page_height = capture.media.height;
    let source = capture.source;
    let to_page_x = |x: f32| capture.origin.x + (x - source.x());
    // Content y (top-down) to PDF y (bottom-up)
    let to_page_y = |y: f32| page_height - (capture.origin.y + (y - source.y()));

    let mut ops = vec![
        color_op("rg", &layout.background),
        rect_op(0.0, 0.0, capture.media.width, page_height),
        Operation::new("f", vec![]),
        Operation::new("q", vec![]),
        rect_op(
            capture.origin.x,
            page_height - capture.origin.y - source.height(),
            source.width(),
            source.height(),
        ),
        Operation::new("W", vec![]),
        Operation::new("n", vec![]),
    ];

    let visible = layout
        .bands
        .iter()
        .filter(|band| band.intersects(source.y(), source.max_y()));

    for band in visible {
        for mark in &band.marks {
            match mark {
                Mark::Fill { rect, color } => {
                    ops.push(color_op("rg", color));
                    ops.push(rect_op(
                        to_page_x(rect.x()),
                        to_page_y(rect.max_y()),
                        rect.width(),
                        rect.height(),
                    ));
                    ops.push(Operation::new("f", vec![]));
                }
                Mark::Text {
                    x,
                    baseline,
                    text,
                    font,
                    size,
                    color,
                } => {
                    let resource = fonts.resource_name(*font);
                    ops.push(Operation::new("BT", vec![]));
                    ops.push(color_op("rg", color));
                    ops.push(Operation::new(
                        "Tf",
                        vec![Object::Name(resource.into_bytes()), (*size).into()],
                    ));
                    ops.push(Operation::new(
                        "Td",
                        vec![to_page_x(*x).into(), to_page_y(*baseline).into()],
                    ));
                    ops.push(Operation::new(
                        "Tj",
                        vec![Object::string_literal(win_ansi_bytes(text))],
                    ));
                    ops.push(Operation::new("ET", vec![]));
                }
            }
        }
    }

    ops.push(Operation::new("Q", vec![]));
    ops
}

/// Write one page per capture into a single PDF.
pub fn write_captures(layout: &DocumentLayout, captures: &[Capture]) -> Result<Vec<u8>, SurfaceError> {
    let mut doc = Document::with_version("1.5");
    let mut fonts = FontTable::default();

    let mut contents: Vec<ObjectId> = Vec::with_capacity(captures.len());
    for capture in captures {
        let content = Content {
            operations: capture_operations(layout, capture, &mut fonts),
        };
        let encoded = content
            .encode()
            .map_err(|e| SurfaceError::Export(format!("Failed to encode page content: {}", e)))?;
        let mut stream = Stream::new(dictionary! {}, encoded);
        stream
            .compress()
            .map_err(|e| SurfaceError::Export(format!("Failed to compress page content: {}", e)))?;
        contents.push(doc.add_object(stream));
    }

    let mut font_dict = lopdf::Dictionary::new();
    for (base, resource) in &fonts.names {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => *base,
            "Encoding" => "WinAnsiEncoding",
        });
        font_dict.set(resource.as_bytes().to_vec(), font_id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => font_dict,
    });

    let pages_id = doc.new_object_id();
    let kids: Vec<Object> = captures
        .iter()
        .zip(&contents)
        .map(|(capture, content_id)| {
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(capture.media.width),
                    Object::Real(capture.media.height),
                ],
                "Contents" => *content_id,
                "Resources" => resources_id,
            });
            page_id.into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| SurfaceError::Export(format!("Failed to serialize PDF: {}", e)))?;
    Ok(bytes)
}
