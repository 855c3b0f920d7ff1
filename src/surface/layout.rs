//! Block layout for the text surface.
//!
//! Blocks are broken into horizontal bands (one per laid-out line) holding
//! absolutely positioned marks in content coordinates, origin top-left.
//! Captures slice bands by rectangle; the print formatter moves whole bands
//! from page to page so a line is never split.

use printpdf::{BuiltinFont, Rgb};

use crate::config::Appearance;
use crate::model::Rect;
use crate::parser::markdown::{Block, BlockKind, Run};
use crate::render::helpers::text_metrics::{builtin_font, measurer};

const LIST_INDENT: f32 = 18.0;
const MARKER_GAP: f32 = 6.0;
const QUOTE_INDENT: f32 = 14.0;
const QUOTE_BAR_WIDTH: f32 = 3.0;
const CODE_PADDING: f32 = 8.0;

/// Relative heading sizes, h1..h6
const HEADING_SCALE: [f32; 6] = [2.0, 1.5, 1.25, 1.0, 0.875, 0.85];

/// A positioned drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Text {
        x: f32,
        baseline: f32,
        text: String,
        font: BuiltinFont,
        size: f32,
        color: Rgb,
    },
    Fill {
        rect: Rect,
        color: Rgb,
    },
}

/// One laid-out line and everything drawn alongside it
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub top: f32,
    pub height: f32,
    pub marks: Vec<Mark>,
}

impl Band {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// True when any part of the band falls inside `[top, bottom)`
    pub fn intersects(&self, top: f32, bottom: f32) -> bool {
        self.top < bottom && self.bottom() > top
    }
}

#[derive(Debug, Clone)]
pub struct DocumentLayout {
    pub width: f32,
    pub padding: f32,
    pub bands: Vec<Band>,
    /// Bottom of the last band plus the bottom padding
    pub content_height: f32,
    pub background: Rgb,
}

impl DocumentLayout {
    /// Bottom of the last band, without the trailing padding
    pub fn body_bottom(&self) -> f32 {
        self.bands.last().map(Band::bottom).unwrap_or(self.padding)
    }
}

/// A word or a run of preformatted text in a single style
struct Piece {
    text: String,
    font: BuiltinFont,
    color: Rgb,
    x: f32,
    width: f32,
}

enum Token<'a> {
    Word(&'a str, &'a Run),
    Space(&'a Run),
    Break,
}

fn tokenize(runs: &[Run]) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    for run in runs {
        let mut word_start: Option<usize> = None;
        for (i, c) in run.text.char_indices() {
            if c.is_whitespace() {
                if let Some(start) = word_start.take() {
                    tokens.push(Token::Word(&run.text[start..i], run));
                }
                if c == '\n' {
                    tokens.push(Token::Break);
                } else if !matches!(tokens.last(), Some(Token::Space(_))) {
                    tokens.push(Token::Space(run));
                }
            } else if word_start.is_none() {
                word_start = Some(i);
            }
        }
        if let Some(start) = word_start {
            tokens.push(Token::Word(&run.text[start..], run));
        }
    }
    tokens
}

struct BlockStyle {
    size: f32,
    bold: bool,
    color: Rgb,
    line_height: f32,
}

struct LayoutContext<'a> {
    appearance: &'a Appearance,
    left: f32,
    right: f32,
    y: f32,
    bands: Vec<Band>,
}

impl<'a> LayoutContext<'a> {
    fn font_for(&self, run: &Run, style: &BlockStyle) -> BuiltinFont {
        builtin_font(style.bold || run.style.bold, run.style.italic, run.style.code)
    }

    fn color_for(&self, run: &Run, style: &BlockStyle) -> Rgb {
        if run.style.link {
            self.appearance.accent.clone()
        } else {
            style.color.clone()
        }
    }

    /// Greedy line filling. Words wider than the whole line are split by
    /// characters.
    fn wrap(&self, runs: &[Run], style: &BlockStyle, max_width: f32) -> Vec<Vec<Piece>> {
        let mut lines: Vec<Vec<Piece>> = Vec::new();
        let mut line: Vec<Piece> = Vec::new();
        let mut x = 0.0f32;
        let mut pending_space: Option<f32> = None;

        for token in tokenize(runs) {
            match token {
                Token::Break => {
                    lines.push(std::mem::take(&mut line));
                    x = 0.0;
                    pending_space = None;
                }
                Token::Space(run) => {
                    if !line.is_empty() {
                        let font = self.font_for(run, style);
                        pending_space = Some(measurer(font).width_pt(" ", style.size));
                    }
                }
                Token::Word(word, run) => {
                    let font = self.font_for(run, style);
                    let color = self.color_for(run, style);
                    let metrics = measurer(font);
                    let mut rest = word;

                    while !rest.is_empty() {
                        let space = pending_space.take().unwrap_or(0.0);
                        let width = metrics.width_pt(rest, style.size);

                        if !line.is_empty() && x + space + width > max_width {
                            lines.push(std::mem::take(&mut line));
                            x = 0.0;
                            continue;
                        }

                        let (head, tail) = if width > max_width {
                            split_to_fit(rest, max_width - x, |s| metrics.width_pt(s, style.size))
                        } else {
                            (rest, "")
                        };
                        let head_width = metrics.width_pt(head, style.size);
                        let start = x + if line.is_empty() { 0.0 } else { space };

                        match line.last_mut() {
                            Some(last) if last.font == font && last.color == color && space > 0.0 => {
                                last.text.push(' ');
                                last.text.push_str(head);
                                last.width = start + head_width - last.x;
                            }
                            _ => line.push(Piece {
                                text: head.to_string(),
                                font,
                                color: color.clone(),
                                x: start,
                                width: head_width,
                            }),
                        }
                        x = start + head_width;

                        rest = tail;
                        if !rest.is_empty() {
                            lines.push(std::mem::take(&mut line));
                            x = 0.0;
                        }
                    }
                }
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
        lines
    }

    fn push_line(&mut self, pieces: Vec<Piece>, left: f32, style: &BlockStyle, quote_depth: usize) {
        let ascent = measurer(BuiltinFont::Helvetica).ascender_pt(style.size);
        let descent = measurer(BuiltinFont::Helvetica).descender_pt(style.size);
        let baseline = self.y + (style.line_height - ascent - descent) / 2.0 + ascent;

        let mut marks = self.quote_bars(quote_depth, self.y, style.line_height);
        marks.extend(pieces.into_iter().map(|piece| Mark::Text {
            x: left + piece.x,
            baseline,
            text: piece.text,
            font: piece.font,
            size: style.size,
            color: piece.color,
        }));

        self.bands.push(Band {
            top: self.y,
            height: style.line_height,
            marks,
        });
        self.y += style.line_height;
    }

    fn quote_bars(&self, depth: usize, top: f32, height: f32) -> Vec<Mark> {
        (0..depth)
            .map(|level| Mark::Fill {
                rect: Rect::new(
                    self.left + level as f32 * QUOTE_INDENT,
                    top,
                    QUOTE_BAR_WIDTH,
                    height,
                ),
                color: self.appearance.rule_color(),
            })
            .collect()
    }

    fn text_block(&mut self, block: &Block, style: BlockStyle, indent: f32, marker: Option<&str>) {
        let left = self.left + indent;
        let max_width = (self.right - left).max(1.0);
        let lines = self.wrap(&block.runs, &style, max_width);
        let first_band = self.bands.len();

        for pieces in lines {
            self.push_line(pieces, left, &style, block.quote_depth);
        }

        if let (Some(marker), Some(band)) = (marker.filter(|m| !m.is_empty()), self.bands.get_mut(first_band)) {
            let baseline = band
                .marks
                .iter()
                .find_map(|m| match m {
                    Mark::Text { baseline, .. } => Some(*baseline),
                    _ => None,
                })
                .unwrap_or(band.top + style.size);
            let width = measurer(BuiltinFont::Helvetica).width_pt(marker, style.size);
            band.marks.push(Mark::Text {
                x: left - MARKER_GAP - width,
                baseline,
                text: marker.to_string(),
                font: BuiltinFont::Helvetica,
                size: style.size,
                color: style.color.clone(),
            });
        }
    }

    fn code_block(&mut self, block: &Block) {
        let size = self.appearance.base_font_size * 0.9;
        let line_height = size * 1.35;
        let left = self.left + block.quote_depth as f32 * QUOTE_INDENT;
        let width = (self.right - left).max(1.0);
        let background = self.appearance.code_background();
        let color = self.appearance.text_color();
        let courier = measurer(BuiltinFont::Courier);
        let char_width = courier.width_pt(" ", size);
        let columns = (((width - 2.0 * CODE_PADDING) / char_width).floor() as usize).max(1);

        let text = block.text();
        let mut lines: Vec<String> = Vec::new();
        for source_line in text.trim_end_matches('\n').split('\n') {
            let chars: Vec<char> = source_line.chars().collect();
            if chars.is_empty() {
                lines.push(String::new());
            }
            for chunk in chars.chunks(columns) {
                lines.push(chunk.iter().collect());
            }
        }

        let fill = |top: f32, height: f32| Mark::Fill {
            rect: Rect::new(left, top, width, height),
            color: background.clone(),
        };

        self.bands.push(Band {
            top: self.y,
            height: CODE_PADDING,
            marks: vec![fill(self.y, CODE_PADDING)],
        });
        self.y += CODE_PADDING;

        let ascent = courier.ascender_pt(size);
        let descent = courier.descender_pt(size);
        for line in lines {
            let mut marks = vec![fill(self.y, line_height)];
            marks.extend(self.quote_bars(block.quote_depth, self.y, line_height));
            if !line.trim().is_empty() {
                marks.push(Mark::Text {
                    x: left + CODE_PADDING,
                    baseline: self.y + (line_height - ascent - descent) / 2.0 + ascent,
                    text: line.trim_end().to_string(),
                    font: BuiltinFont::Courier,
                    size,
                    color: color.clone(),
                });
            }
            self.bands.push(Band {
                top: self.y,
                height: line_height,
                marks,
            });
            self.y += line_height;
        }

        self.bands.push(Band {
            top: self.y,
            height: CODE_PADDING,
            marks: vec![fill(self.y, CODE_PADDING)],
        });
        self.y += CODE_PADDING;
    }

    fn rule(&mut self, quote_depth: usize) {
        let height = self.appearance.base_font_size;
        let left = self.left + quote_depth as f32 * QUOTE_INDENT;
        self.bands.push(Band {
            top: self.y,
            height,
            marks: vec![Mark::Fill {
                rect: Rect::new(left, self.y + height / 2.0 - 0.5, self.right - left, 1.0),
                color: self.appearance.rule_color(),
            }],
        });
        self.y += height;
    }
}

/// Largest prefix of `word` narrower than `available`, at least one character
fn split_to_fit(word: &str, available: f32, width_of: impl Fn(&str) -> f32) -> (&str, &str) {
    let mut end = 0;
    for (i, c) in word.char_indices() {
        let next = i + c.len_utf8();
        if end > 0 && width_of(&word[..next]) > available {
            break;
        }
        end = next;
    }
    word.split_at(end)
}

/// Lay out `blocks` for a frame `width` points wide, inset by `padding` on
/// every side.
pub fn layout_blocks(blocks: &[Block], appearance: &Appearance, width: f32, padding: f32) -> DocumentLayout {
    let base = appearance.base_font_size;
    let mut cx = LayoutContext {
        appearance,
        left: padding,
        right: (width - padding).max(padding + 1.0),
        y: padding,
        bands: Vec::new(),
    };

    for (i, block) in blocks.iter().enumerate() {
        let quote_indent = block.quote_depth as f32 * QUOTE_INDENT;
        let text_color = if block.quote_depth > 0 {
            appearance.rule_color()
        } else {
            appearance.text_color()
        };

        match &block.kind {
            BlockKind::Heading(level) => {
                if i > 0 {
                    cx.y += base;
                }
                let scale = HEADING_SCALE[(*level as usize).clamp(1, 6) - 1];
                let size = base * scale;
                let style = BlockStyle {
                    size,
                    bold: true,
                    color: text_color,
                    line_height: size * 1.25,
                };
                cx.text_block(block, style, quote_indent, None);
                cx.y += base * 0.5;
            }
            BlockKind::Paragraph => {
                let style = BlockStyle {
                    size: base,
                    bold: false,
                    color: text_color,
                    line_height: base * 1.45,
                };
                cx.text_block(block, style, quote_indent, None);
                cx.y += base * 0.75;
            }
            BlockKind::ListItem { marker, depth } => {
                let style = BlockStyle {
                    size: base,
                    bold: false,
                    color: text_color,
                    line_height: base * 1.45,
                };
                let indent = quote_indent + *depth as f32 * LIST_INDENT;
                cx.text_block(block, style, indent, Some(marker));
                cx.y += base * 0.35;
            }
            BlockKind::Code => {
                cx.code_block(block);
                cx.y += base * 0.75;
            }
            BlockKind::Rule => {
                cx.rule(block.quote_depth);
                cx.y += base * 0.5;
            }
        }
    }

    let body_bottom = cx.bands.last().map(Band::bottom).unwrap_or(padding);
    DocumentLayout {
        width,
        padding,
        bands: cx.bands,
        content_height: body_bottom + padding,
        background: appearance.background_color(),
    }
}
