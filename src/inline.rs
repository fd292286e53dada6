//! Defines the [`Span`] type and [`parse_inline`], which turns a run of text
//! into styled inline fragments.
//!
//! The dialect is deliberately small: `**bold**`, `*italic*`, `` `code` `` and
//! `[text](href)`. There is no escaping mechanism, so a lone `*` that never
//! pairs up is simply rendered as text. Parsing never fails.

/// An inline styled fragment of text within a block. Bold and italic spans
/// nest; code and link text are literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Span {
    /// Unstyled text.
    PlainText(String),

    /// Text enclosed in `**`.
    Bold(Vec<Span>),

    /// Text enclosed in `*`.
    Italic(Vec<Span>),

    /// Text enclosed in backticks. Never parsed further.
    Code(String),

    /// `[text](href)`.
    Link { text: String, href: String },
}

impl Span {
    /// Pushes the span's text, stripped of all markup, onto `out`.
    pub fn push_text(&self, out: &mut String) {
        match self {
            Span::PlainText(text) | Span::Code(text) => out.push_str(text),
            Span::Link { text, .. } => out.push_str(text),
            Span::Bold(children) | Span::Italic(children) => {
                for child in children {
                    child.push_text(out);
                }
            }
        }
    }
}

/// Returns the text of `spans` with all markup removed.
pub fn plain_text(spans: &[Span]) -> String {
    let mut out = String::new();
    for span in spans {
        span.push_text(&mut out);
    }
    out
}

/// Parses `text` into a sequence of [`Span`]s in source order.
///
/// At each step the remaining text is searched for, in priority order, a
/// bold pair, an italic pair, a code pair and a link. The first kind that
/// matches anywhere wins, using its leftmost occurrence with the shortest
/// enclosed text (so `**a** and **b**` is two bold spans). Text in front of
/// the match is parsed recursively; so is the inside of bold and italic
/// spans. Whatever is left once nothing matches becomes a plain-text span.
///
/// ```
/// use forkzero_site::inline::{parse_inline, Span};
///
/// assert_eq!(
///     parse_inline("some **bold** text"),
///     vec![
///         Span::PlainText("some ".to_owned()),
///         Span::Bold(vec![Span::PlainText("bold".to_owned())]),
///         Span::PlainText(" text".to_owned()),
///     ],
/// );
/// ```
pub fn parse_inline(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut remaining = text;
    while !remaining.is_empty() {
        match next_match(remaining) {
            Some(found) => {
                spans.extend(parse_inline(&remaining[..found.start]));
                spans.push(found.span);
                remaining = &remaining[found.end..];
            }
            None => {
                spans.push(Span::PlainText(remaining.to_owned()));
                break;
            }
        }
    }
    spans
}

/// A matched piece of markup. `start` and `end` are byte offsets of the whole
/// construct, delimiters included.
struct Match {
    start: usize,
    end: usize,
    span: Span,
}

fn next_match(text: &str) -> Option<Match> {
    if let Some((start, inner, end)) = delimited(text, "**") {
        return Some(Match {
            start,
            end,
            span: Span::Bold(parse_inline(inner)),
        });
    }
    if let Some((start, inner, end)) = delimited(text, "*") {
        return Some(Match {
            start,
            end,
            span: Span::Italic(parse_inline(inner)),
        });
    }
    if let Some((start, inner, end)) = delimited(text, "`") {
        return Some(Match {
            start,
            end,
            span: Span::Code(inner.to_owned()),
        });
    }
    link(text)
}

/// Skips the first character of `text[from..]`, returning the offset just
/// past it. Enclosed text must be at least one character long.
fn after_first_char(text: &str, from: usize) -> Option<usize> {
    text[from..].chars().next().map(|c| from + c.len_utf8())
}

/// Finds the leftmost run enclosed in `delim` with non-empty content and
/// returns `(start of opening delimiter, content, end of closing delimiter)`.
fn delimited<'a>(text: &'a str, delim: &str) -> Option<(usize, &'a str, usize)> {
    let mut from = 0;
    while let Some(offset) = text[from..].find(delim) {
        let open = from + offset;
        let content_start = open + delim.len();
        if let Some(search_from) = after_first_char(text, content_start) {
            if let Some(offset) = text[search_from..].find(delim) {
                let close = search_from + offset;
                return Some((open, &text[content_start..close], close + delim.len()));
            }
        }
        // delimiters are ASCII, so `open + 1` is always a char boundary
        from = open + 1;
    }
    None
}

/// Finds the leftmost `[text](href)` with non-empty text and href.
fn link(text: &str) -> Option<Match> {
    let mut from = 0;
    while let Some(offset) = text[from..].find('[') {
        let open = from + offset;
        let text_start = open + 1;
        let mut search = match after_first_char(text, text_start) {
            Some(search) => search,
            None => return None,
        };
        while let Some(offset) = text[search..].find("](") {
            let text_end = search + offset;
            let href_start = text_end + 2;
            if let Some(href_search) = after_first_char(text, href_start) {
                if let Some(offset) = text[href_search..].find(')') {
                    let href_end = href_search + offset;
                    return Some(Match {
                        start: open,
                        end: href_end + 1,
                        span: Span::Link {
                            text: text[text_start..text_end].to_owned(),
                            href: text[href_start..href_end].to_owned(),
                        },
                    });
                }
            }
            search = text_end + 1;
        }
        from = open + 1;
    }
    None
}
