//! Serializes parsed [`Block`]s to plain HTML tags. This is the crawler-facing
//! rendering used inside the pre-rendered `<noscript>` fallback: no classes
//! beyond what identifies a construct, no scripts, no styling.

use crate::block::Block;
use crate::diagram;
use crate::inline::Span;
use pulldown_cmark::escape::{escape_href, escape_html, StrWrite};
use std::fmt::{self, Display};
use std::io;

/// Adapts a [`fmt::Formatter`] to [`StrWrite`] so the escaping functions can
/// be used from [`Display`] impls.
struct Adaptor<'a, T> {
    formatter: &'a mut T,
    result: fmt::Result,
}

impl<T> Adaptor<'_, T> {
    fn handle_result(&mut self, result: fmt::Result) -> io::Result<()> {
        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                self.result = result;
                Err(io::Error::new(io::ErrorKind::Other, e))
            }
        }
    }
}

impl<T: fmt::Write> StrWrite for Adaptor<'_, T> {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        let result = self.formatter.write_str(s);
        self.handle_result(result)
    }

    fn write_fmt(&mut self, args: fmt::Arguments) -> io::Result<()> {
        let result = self.formatter.write_fmt(args);
        self.handle_result(result)
    }
}

/// Displays a string with HTML special characters escaped. Safe in text and
/// in double-quoted attribute values.
pub struct EscapeHtml<'a>(pub &'a str);

impl Display for EscapeHtml<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut adaptor = Adaptor {
            formatter: f,
            result: Ok(()),
        };
        let _ = escape_html(&mut adaptor, self.0);
        adaptor.result
    }
}

/// Displays a URL escaped for use in an `href`.
pub struct EscapeHref<'a>(pub &'a str);

impl Display for EscapeHref<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut adaptor = Adaptor {
            formatter: f,
            result: Ok(()),
        };
        let _ = escape_href(&mut adaptor, self.0);
        adaptor.result
    }
}

/// Returns `s` with HTML special characters escaped.
pub fn escape(s: &str) -> String {
    EscapeHtml(s).to_string()
}

/// Returns the URL `s` escaped for use in an `href`.
pub fn escape_url(s: &str) -> String {
    EscapeHref(s).to_string()
}

/// Renders [`Block`]s into HTML. Blocks are separated by newlines; nothing
/// inside a block is.
struct HtmlRenderer;

impl HtmlRenderer {
    fn on_block<W: StrWrite>(&mut self, w: &mut W, block: &Block) -> io::Result<()> {
        match block {
            Block::Heading { level, text } => {
                write!(w, "<h{}>{}</h{}>", level, EscapeHtml(text), level)
            }
            Block::Paragraph { spans } => self.on_paragraph(w, spans),
            Block::CodeBlock { lines } => {
                w.write_str("<pre><code>")?;
                for (i, line) in lines.iter().enumerate() {
                    if i > 0 {
                        w.write_str("\n")?;
                    }
                    escape_html(&mut *w, line)?;
                }
                w.write_str("</code></pre>")
            }
            Block::BulletList { items } => self.on_list(w, "ul", items),
            Block::NumberedList { items } => self.on_list(w, "ol", items),
            Block::HorizontalRule => w.write_str("<hr />"),
            Block::Blockquote { spans, attribution } => {
                w.write_str("<blockquote>")?;
                self.on_paragraph(w, spans)?;
                if let Some(attribution) = attribution {
                    w.write_str("<footer>")?;
                    self.on_spans(w, attribution)?;
                    w.write_str("</footer>")?;
                }
                w.write_str("</blockquote>")
            }
            Block::Callout { kind, paragraphs } => {
                write!(w, r#"<div class="callout callout-{}">"#, EscapeHtml(kind))?;
                for paragraph in paragraphs {
                    self.on_paragraph(w, paragraph)?;
                }
                w.write_str("</div>")
            }
            Block::DiagramMarker { name } => self.on_diagram(w, name),
        }
    }

    fn on_paragraph<W: StrWrite>(&mut self, w: &mut W, spans: &[Span]) -> io::Result<()> {
        w.write_str("<p>")?;
        self.on_spans(w, spans)?;
        w.write_str("</p>")
    }

    fn on_list<W: StrWrite>(
        &mut self,
        w: &mut W,
        tag: &str,
        items: &[Vec<Span>],
    ) -> io::Result<()> {
        write!(w, "<{}>", tag)?;
        for item in items {
            w.write_str("<li>")?;
            self.on_spans(w, item)?;
            w.write_str("</li>")?;
        }
        write!(w, "</{}>", tag)
    }

    // Unknown diagrams render nothing, same as the live view.
    fn on_diagram<W: StrWrite>(&mut self, w: &mut W, name: &str) -> io::Result<()> {
        let diagram = match diagram::lookup(name) {
            Some(diagram) => diagram,
            None => return Ok(()),
        };
        write!(w, r#"<figure class="diagram diagram-{}">"#, diagram.name)?;
        for (node, edge) in diagram.segments() {
            escape_html(&mut *w, node.label)?;
            if let Some(edge) = edge {
                write!(w, " &rarr; <em>{}</em> &rarr; ", EscapeHtml(edge))?;
            }
        }
        w.write_str("</figure>")
    }

    fn on_spans<W: StrWrite>(&mut self, w: &mut W, spans: &[Span]) -> io::Result<()> {
        for span in spans {
            self.on_span(w, span)?;
        }
        Ok(())
    }

    fn on_span<W: StrWrite>(&mut self, w: &mut W, span: &Span) -> io::Result<()> {
        match span {
            Span::PlainText(text) => escape_html(&mut *w, text),
            Span::Bold(children) => {
                w.write_str("<strong>")?;
                self.on_spans(w, children)?;
                w.write_str("</strong>")
            }
            Span::Italic(children) => {
                w.write_str("<em>")?;
                self.on_spans(w, children)?;
                w.write_str("</em>")
            }
            Span::Code(code) => write!(w, "<code>{}</code>", EscapeHtml(code)),
            Span::Link { text, href } => write!(
                w,
                r#"<a href="{}">{}</a>"#,
                EscapeHref(href),
                EscapeHtml(text),
            ),
        }
    }
}

/// Serializes `blocks` as HTML, appending to `out`.
pub fn push_html(out: &mut String, blocks: &[Block]) -> io::Result<()> {
    write_html(out, blocks)
}

/// Serializes `blocks` as HTML to any [`StrWrite`].
pub fn write_html<W: StrWrite>(w: &mut W, blocks: &[Block]) -> io::Result<()> {
    let mut renderer = HtmlRenderer;
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            w.write_str("\n")?;
        }
        renderer.on_block(w, block)?;
    }
    Ok(())
}
