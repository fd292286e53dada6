//! Defines the [`Block`] type and [`parse_blocks`], the line-oriented half of
//! the content renderer.
//!
//! Content is split into lines and consumed by a single forward cursor. At
//! each line the constructs below are tried in order and the first one that
//! starts there consumes all of its lines:
//!
//! 1. diagram marker (`<!-- diagram:NAME -->`)
//! 2. callout (`:::kind` ... `:::`)
//! 3. blockquote (`> ` lines, optional `> — attribution` last line)
//! 4. heading (`## `)
//! 5. horizontal rule (`---`)
//! 6. fenced code block (```` ``` ````)
//! 7. bullet list (`- `)
//! 8. numbered list (`1. `)
//! 9. blank line (dropped)
//! 10. paragraph
//!
//! Every line belongs to exactly one block (or is a dropped blank line), so
//! there is no error state: any input parses.

use crate::inline::{parse_inline, Span};

/// A structural unit of rendered content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    /// A `## ` heading. Only level 2 is recognized; the text is not
    /// inline-parsed.
    Heading { level: u8, text: String },

    /// Consecutive plain lines joined with single spaces.
    Paragraph { spans: Vec<Span> },

    /// The verbatim lines between two code fences.
    CodeBlock { lines: Vec<String> },

    BulletList { items: Vec<Vec<Span>> },

    /// Source numbers are discarded; items are numbered in display order.
    NumberedList { items: Vec<Vec<Span>> },

    HorizontalRule,

    Blockquote {
        spans: Vec<Span>,
        attribution: Option<Vec<Span>>,
    },

    /// A delimited container. Each non-blank content line is its own
    /// paragraph.
    Callout {
        kind: String,
        paragraphs: Vec<Vec<Span>>,
    },

    /// A placeholder for a named diagram (see [`crate::diagram`]).
    DiagramMarker { name: String },
}

/// Parses `content` into blocks in source order.
pub fn parse_blocks(content: &str) -> Vec<Block> {
    let mut lines = Lines::new(content);
    let mut blocks = Vec::new();

    while let Some(line) = lines.peek() {
        if let Some(name) = diagram_name(line) {
            lines.advance();
            blocks.push(Block::DiagramMarker {
                name: name.to_owned(),
            });
        } else if let Some(kind) = callout_kind(line) {
            lines.advance();
            blocks.push(callout(kind, &mut lines));
        } else if quote_line(line).is_some() {
            blocks.push(blockquote(&mut lines));
        } else if let Some(text) = heading_text(line) {
            lines.advance();
            blocks.push(Block::Heading {
                level: 2,
                text: text.to_owned(),
            });
        } else if is_rule(line) {
            lines.advance();
            blocks.push(Block::HorizontalRule);
        } else if is_fence(line) {
            lines.advance();
            blocks.push(code_block(&mut lines));
        } else if bullet_item(line).is_some() {
            blocks.push(Block::BulletList {
                items: lines.take_items(bullet_item),
            });
        } else if numbered_item(line).is_some() {
            blocks.push(Block::NumberedList {
                items: lines.take_items(numbered_item),
            });
        } else if is_blank(line) {
            lines.advance();
        } else {
            blocks.push(paragraph(&mut lines));
        }
    }

    blocks
}

/// A forward-only cursor over the content's lines.
struct Lines<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> Lines<'a> {
    fn new(content: &'a str) -> Self {
        Lines {
            lines: content.split('\n').collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn next_line(&mut self) -> Option<&'a str> {
        let line = self.peek();
        if line.is_some() {
            self.advance();
        }
        line
    }

    /// Consumes the run of lines for which `item` matches, parsing each
    /// match as a list item.
    fn take_items(&mut self, item: fn(&str) -> Option<&str>) -> Vec<Vec<Span>> {
        let mut items = Vec::new();
        while let Some(text) = self.peek().and_then(item) {
            items.push(parse_inline(text));
            self.advance();
        }
        items
    }
}

fn callout(kind: &str, lines: &mut Lines) -> Block {
    let mut paragraphs = Vec::new();
    while let Some(line) = lines.next_line() {
        if line.trim() == ":::" {
            break;
        }
        if !is_blank(line) {
            paragraphs.push(parse_inline(line.trim()));
        }
    }
    Block::Callout {
        kind: kind.to_owned(),
        paragraphs,
    }
}

fn blockquote(lines: &mut Lines) -> Block {
    let mut body = Vec::new();
    while let Some(text) = lines.peek().and_then(quote_line) {
        body.push(text);
        lines.advance();
    }

    let attribution = match body.last().and_then(|last| last.strip_prefix("— ")) {
        Some(attribution) => {
            let attribution = parse_inline(attribution);
            body.pop();
            Some(attribution)
        }
        None => None,
    };

    Block::Blockquote {
        spans: parse_inline(&body.join(" ")),
        attribution,
    }
}

fn code_block(lines: &mut Lines) -> Block {
    let mut code = Vec::new();
    while let Some(line) = lines.next_line() {
        if is_fence(line) {
            break;
        }
        code.push(line.to_owned());
    }
    Block::CodeBlock { lines: code }
}

fn paragraph(lines: &mut Lines) -> Block {
    // The first line is always consumed, which guarantees progress even for
    // lines that look like the start of a construct without completing one.
    let mut text: Vec<&str> = lines.next_line().into_iter().collect();
    while let Some(line) = lines.peek() {
        if starts_block(line) {
            break;
        }
        text.push(line);
        lines.advance();
    }
    Block::Paragraph {
        spans: parse_inline(&text.join(" ")),
    }
}

/// Reports whether `line` begins any construct other than a paragraph, which
/// ends a running paragraph.
fn starts_block(line: &str) -> bool {
    diagram_name(line).is_some()
        || callout_kind(line).is_some()
        || quote_line(line).is_some()
        || heading_text(line).is_some()
        || is_rule(line)
        || is_fence(line)
        || bullet_item(line).is_some()
        || numbered_item(line).is_some()
        || is_blank(line)
}

fn diagram_name(line: &str) -> Option<&str> {
    let name = line
        .trim()
        .strip_prefix("<!-- diagram:")?
        .strip_suffix("-->")?
        .trim();
    match name.is_empty() {
        true => None,
        false => Some(name),
    }
}

fn callout_kind(line: &str) -> Option<&str> {
    line.trim().strip_prefix(":::").map(str::trim)
}

fn quote_line(line: &str) -> Option<&str> {
    line.strip_prefix("> ")
}

fn heading_text(line: &str) -> Option<&str> {
    line.strip_prefix("## ")
}

fn is_rule(line: &str) -> bool {
    line.trim() == "---"
}

fn is_fence(line: &str) -> bool {
    line.starts_with("```")
}

fn bullet_item(line: &str) -> Option<&str> {
    line.strip_prefix("- ")
}

/// Matches `^\d+\.\s` and returns the rest of the line.
fn numbered_item(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == line.len() {
        return None;
    }
    let mut chars = rest.strip_prefix('.')?.chars();
    match chars.next() {
        Some(c) if c.is_whitespace() => Some(chars.as_str()),
        _ => None,
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
