//! Markdown → layout blocks.
//!
//! Feeds the built-in text surface. Only the structure the surface can lay
//! out is kept: headings, paragraphs, list items, block quotes, fenced or
//! indented code and thematic breaks, with bold / italic / code / link runs.

use pulldown_cmark::{Event, Options, Parser, Tag};

/// Inline style of a run of text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStyle {
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
    pub link: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub style: RunStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Heading(u8),
    Paragraph,
    /// `marker` is empty for continuation paragraphs of a loose item
    ListItem { marker: String, depth: usize },
    /// Preformatted; line breaks in the runs are preserved
    Code,
    Rule,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub quote_depth: usize,
    pub runs: Vec<Run>,
}

impl Block {
    fn new(kind: BlockKind, quote_depth: usize) -> Self {
        Self {
            kind,
            quote_depth,
            runs: Vec::new(),
        }
    }

    /// Concatenated text of every run
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    fn push(&mut self, text: &str, style: RunStyle) {
        if text.is_empty() {
            return;
        }
        match self.runs.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => self.runs.push(Run {
                text: text.to_string(),
                style,
            }),
        }
    }
}

/// Open containers, pushed on every start event and popped on every end.
/// pulldown-cmark guarantees the events are balanced.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Open {
    Heading,
    Paragraph,
    List,
    Item,
    Quote,
    Code,
    Emphasis,
    Strong,
    Link,
    Other,
}

#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<Block>,
    current: Option<Block>,
    open: Vec<Open>,
    /// Next ordinal per nested list; `None` for bullet lists
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    emphasis: usize,
    strong: usize,
    links: usize,
}

impl BlockBuilder {
    fn style(&self) -> RunStyle {
        RunStyle {
            bold: self.strong > 0,
            italic: self.emphasis > 0,
            code: false,
            link: self.links > 0,
        }
    }

    fn flush(&mut self) {
        if let Some(block) = self.current.take() {
            let keep = matches!(block.kind, BlockKind::Rule | BlockKind::Code)
                || block.runs.iter().any(|r| !r.text.trim().is_empty());
            if keep {
                self.blocks.push(block);
            }
        }
    }

    fn begin(&mut self, kind: BlockKind) {
        self.flush();
        self.current = Some(Block::new(kind, self.quote_depth));
    }

    fn inside_item(&self) -> bool {
        self.open.iter().rev().find(|o| **o == Open::Item || **o == Open::Quote) == Some(&Open::Item)
    }

    fn text(&mut self, text: &str, style: RunStyle) {
        if self.current.is_none() {
            let kind = if self.inside_item() {
                BlockKind::ListItem {
                    marker: String::new(),
                    depth: self.lists.len(),
                }
            } else {
                BlockKind::Paragraph
            };
            self.current = Some(Block::new(kind, self.quote_depth));
        }
        if let Some(block) = self.current.as_mut() {
            block.push(text, style);
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let open = match tag {
            Tag::Heading { level, .. } => {
                self.begin(BlockKind::Heading(level as u8));
                Open::Heading
            }
            Tag::Paragraph => {
                // The first paragraph of a loose list item continues the item block
                let continues_item = matches!(
                    &self.current,
                    Some(Block { kind: BlockKind::ListItem { .. }, runs, .. }) if runs.is_empty()
                );
                if !continues_item {
                    let kind = if self.inside_item() {
                        BlockKind::ListItem {
                            marker: String::new(),
                            depth: self.lists.len(),
                        }
                    } else {
                        BlockKind::Paragraph
                    };
                    self.begin(kind);
                }
                Open::Paragraph
            }
            Tag::List(first) => {
                self.flush();
                self.lists.push(first);
                Open::List
            }
            Tag::Item => {
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}.", n);
                        *n += 1;
                        marker
                    }
                    _ => "\u{2022}".to_string(),
                };
                self.begin(BlockKind::ListItem {
                    marker,
                    depth: self.lists.len(),
                });
                Open::Item
            }
            Tag::BlockQuote(_) => {
                self.flush();
                self.quote_depth += 1;
                Open::Quote
            }
            Tag::CodeBlock(_) => {
                self.begin(BlockKind::Code);
                Open::Code
            }
            Tag::Emphasis => {
                self.emphasis += 1;
                Open::Emphasis
            }
            Tag::Strong => {
                self.strong += 1;
                Open::Strong
            }
            Tag::Link { .. } => {
                self.links += 1;
                Open::Link
            }
            _ => Open::Other,
        };
        self.open.push(open);
    }

    fn end(&mut self) {
        match self.open.pop() {
            Some(Open::Heading) | Some(Open::Paragraph) | Some(Open::Code) | Some(Open::Item) => {
                self.flush()
            }
            Some(Open::List) => {
                self.flush();
                self.lists.pop();
            }
            Some(Open::Quote) => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            Some(Open::Emphasis) => self.emphasis = self.emphasis.saturating_sub(1),
            Some(Open::Strong) => self.strong = self.strong.saturating_sub(1),
            Some(Open::Link) => self.links = self.links.saturating_sub(1),
            Some(Open::Other) | None => {}
        }
    }
}

/// Parse markdown into a flat list of layout blocks
pub fn parse_markdown(markdown: &str) -> Vec<Block> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TASKLISTS);

    let mut builder = BlockBuilder::default();
    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(tag) => builder.start(tag),
            Event::End(_) => builder.end(),
            Event::Text(text) => {
                let style = builder.style();
                builder.text(&text, style);
            }
            Event::Code(code) => {
                let style = RunStyle {
                    code: true,
                    ..builder.style()
                };
                builder.text(&code, style);
            }
            Event::SoftBreak => {
                let style = builder.style();
                builder.text(" ", style);
            }
            Event::HardBreak => {
                let style = builder.style();
                builder.text("\n", style);
            }
            Event::TaskListMarker(done) => {
                let style = builder.style();
                builder.text(if done { "[x] " } else { "[ ] " }, style);
            }
            Event::Rule => {
                builder.begin(BlockKind::Rule);
                builder.flush();
            }
            _ => {}
        }
    }
    builder.flush();
    builder.blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_and_paragraphs() {
        let blocks = parse_markdown("# Title\n\nSome *body* text.\n\n## Section\n");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].kind, BlockKind::Heading(1));
        assert_eq!(blocks[0].text(), "Title");
        assert_eq!(blocks[1].kind, BlockKind::Paragraph);
        assert_eq!(blocks[1].text(), "Some body text.");
        assert!(blocks[1].runs.iter().any(|r| r.style.italic && r.text == "body"));
        assert_eq!(blocks[2].kind, BlockKind::Heading(2));
    }

    #[test]
    fn test_lists_get_markers() {
        let blocks = parse_markdown("- one\n- two\n\n3. three\n4. four\n");
        let markers: Vec<String> = blocks
            .iter()
            .filter_map(|b| match &b.kind {
                BlockKind::ListItem { marker, .. } => Some(marker.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(markers, vec!["\u{2022}", "\u{2022}", "3.", "4."]);
    }

    #[test]
    fn test_nested_list_depth() {
        let blocks = parse_markdown("- outer\n  - inner\n");
        let depths: Vec<usize> = blocks
            .iter()
            .filter_map(|b| match &b.kind {
                BlockKind::ListItem { depth, .. } => Some(*depth),
                _ => None,
            })
            .collect();
        assert_eq!(depths, vec![1, 2]);
    }

    #[test]
    fn test_code_block_keeps_lines() {
        let blocks = parse_markdown("```rust\nfn main() {\n    println!(\"hi\");\n}\n```\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Code);
        assert_eq!(blocks[0].text().lines().count(), 3);
    }

    #[test]
    fn test_tildes_stay_literal() {
        let blocks = parse_markdown("keep ~~this~~ text");
        assert_eq!(blocks[0].text(), "keep ~~this~~ text");
        assert!(blocks[0].runs.iter().all(|r| r.style == RunStyle::default()));
    }

    #[test]
    fn test_rule_and_quote() {
        let blocks = parse_markdown("> quoted\n\n---\n\nafter\n");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].quote_depth, 1);
        assert_eq!(blocks[1].kind, BlockKind::Rule);
        assert_eq!(blocks[2].quote_depth, 0);
    }

    #[test]
    fn test_inline_code_and_links() {
        let blocks = parse_markdown("Call `render()` or see [docs](https://example.com).");
        let runs = &blocks[0].runs;
        assert!(runs.iter().any(|r| r.style.code && r.text == "render()"));
        assert!(runs.iter().any(|r| r.style.link && r.text == "docs"));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_markdown("").is_empty());
        assert!(parse_markdown("\n\n   \n").is_empty());
    }
}
