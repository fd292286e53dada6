//! The live view: turns parsed content and blog pages into a tree of UI
//! [`Node`]s for the interactive runtime to mount. Presentation is left to
//! the stylesheet; nodes carry class names only.
//!
//! [`Node::to_html`] serializes a tree as markup. The structure matches what
//! [`crate::html`] emits for crawlers (same heading, list and paragraph
//! elements for the same content), with extra classes and the page chrome
//! around it.

use crate::block::Block;
use crate::config::Site;
use crate::diagram::{self, Diagram};
use crate::html::{EscapeHref, EscapeHtml};
use crate::inline::Span;
use crate::page::Page;
use crate::post::Post;
use pulldown_cmark::escape::StrWrite;
use std::io;
use url::Url;

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &["hr", "br"];

/// A node in the UI tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with its attributes (in insertion order) and children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub attributes: Vec<(&'static str, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Element {
        Element {
            tag,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr<S: Into<String>>(mut self, name: &'static str, value: S) -> Element {
        self.attributes.push((name, value.into()));
        self
    }

    pub fn class<S: Into<String>>(self, class: S) -> Element {
        self.attr("class", class)
    }

    pub fn child<N: Into<Node>>(mut self, child: N) -> Element {
        self.children.push(child.into());
        self
    }

    pub fn children<I: IntoIterator<Item = Node>>(mut self, children: I) -> Element {
        self.children.extend(children);
        self
    }

    pub fn text<S: Into<String>>(self, text: S) -> Element {
        self.child(Node::Text(text.into()))
    }

    /// Returns the value of the attribute `name`, if set.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Node {
        Node::Element(element)
    }
}

impl Node {
    /// Serializes the tree rooted at this node as HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        // writing into a `String` can't fail
        let _ = self.write_html(&mut out);
        out
    }

    pub fn write_html<W: StrWrite>(&self, w: &mut W) -> io::Result<()> {
        match self {
            Node::Text(text) => write!(w, "{}", EscapeHtml(text)),
            Node::Element(element) => {
                write!(w, "<{}", element.tag)?;
                for (name, value) in &element.attributes {
                    match *name {
                        "href" => write!(w, r#" {}="{}""#, name, EscapeHref(value))?,
                        _ => write!(w, r#" {}="{}""#, name, EscapeHtml(value))?,
                    }
                }
                if VOID_ELEMENTS.contains(&element.tag) {
                    return w.write_str(" />");
                }
                w.write_str(">")?;
                for child in &element.children {
                    child.write_html(w)?;
                }
                write!(w, "</{}>", element.tag)
            }
        }
    }

    /// Visits this node and all of its descendants, depth first.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Node)) {
        visit(self);
        if let Node::Element(element) = self {
            for child in &element.children {
                child.walk(visit);
            }
        }
    }
}

/// Renders a link that opens in a new tab.
fn external_link(href: &str) -> Element {
    Element::new("a")
        .attr("href", href)
        .attr("target", "_blank")
        .attr("rel", "noopener noreferrer")
}

/// Renders inline spans. Bold, italic, code and links become `strong`, `em`,
/// `code` and `a`; plain text becomes a text node.
pub fn render_inline(spans: &[Span]) -> Vec<Node> {
    spans
        .iter()
        .map(|span| match span {
            Span::PlainText(text) => Node::Text(text.clone()),
            Span::Bold(children) => Element::new("strong")
                .children(render_inline(children))
                .into(),
            Span::Italic(children) => Element::new("em")
                .children(render_inline(children))
                .into(),
            Span::Code(code) => Element::new("code").text(code.as_str()).into(),
            Span::Link { text, href } => external_link(href).text(text.as_str()).into(),
        })
        .collect()
}

/// Renders parsed content blocks, one node per block. Diagram markers that
/// name no known diagram render nothing.
pub fn render_content(blocks: &[Block]) -> Vec<Node> {
    blocks.iter().filter_map(render_block).collect()
}

fn render_block(block: &Block) -> Option<Node> {
    let element = match block {
        Block::Heading { text, .. } => Element::new("h2").text(text.as_str()),
        Block::Paragraph { spans } => Element::new("p").children(render_inline(spans)),
        Block::CodeBlock { lines } => {
            Element::new("pre").child(Element::new("code").text(lines.join("\n")))
        }
        Block::BulletList { items } => list("ul", items),
        Block::NumberedList { items } => list("ol", items),
        Block::HorizontalRule => Element::new("hr"),
        Block::Blockquote { spans, attribution } => {
            let quote = Element::new("blockquote")
                .child(Element::new("p").children(render_inline(spans)));
            match attribution {
                Some(attribution) => {
                    quote.child(Element::new("footer").children(render_inline(attribution)))
                }
                None => quote,
            }
        }
        Block::Callout { kind, paragraphs } => Element::new("div")
            .class(format!("callout callout-{}", kind))
            .children(paragraphs.iter().enumerate().map(|(i, spans)| {
                Element::new("p")
                    .class(match i {
                        0 => "callout-first-line",
                        _ => "callout-text",
                    })
                    .children(render_inline(spans))
                    .into()
            })),
        Block::DiagramMarker { name } => render_diagram(diagram::lookup(name)?),
    };
    Some(element.into())
}

fn list(tag: &'static str, items: &[Vec<Span>]) -> Element {
    Element::new(tag).children(
        items
            .iter()
            .map(|item| Element::new("li").children(render_inline(item)).into()),
    )
}

fn render_diagram(diagram: &Diagram) -> Element {
    let segments = diagram.segments().map(|(node, edge)| {
        let segment = Element::new("div").class("diagram-segment").child(
            Element::new("div")
                .class("diagram-node")
                .child(
                    Element::new("span")
                        .class(format!("diagram-dot accent-{}", node.accent.as_str())),
                )
                .child(Element::new("span").class("diagram-label").text(node.label)),
        );
        let segment = match edge {
            Some(edge) => segment.child(
                Element::new("div")
                    .class("diagram-edge")
                    .child(Element::new("span").class("diagram-arrow").text("→"))
                    .child(Element::new("span").class("diagram-edge-label").text(edge)),
            ),
            None => segment,
        };
        Node::from(segment)
    });
    Element::new("div")
        .class(format!("diagram diagram-{}", diagram.name))
        .child(Element::new("div").class("diagram-flow").children(segments))
}

/// `February 10, 2026 · George Moon`
fn post_meta(post: &Post) -> String {
    format!("{} · {}", post.display_date(), post.author.name)
}

/// Renders the blog listing: a title, the blog description and one card per
/// post, in the order given.
pub fn blog_listing(site: &Site, posts: &[Post]) -> Node {
    let cards = posts.iter().map(|post| {
        Element::new("a")
            .class("post-card")
            .attr("href", post.route().path())
            .child(Element::new("h2").class("post-card-title").text(post.title.as_str()))
            .child(Element::new("div").class("post-meta").text(post_meta(post)))
            .child(Element::new("p").class("post-excerpt").text(post.excerpt.as_str()))
            .child(Element::new("span").class("read-more").text("Read more →"))
            .into()
    });
    Element::new("div")
        .class("blog-listing")
        .child(Element::new("h1").class("page-title").text(site.blog_title.as_str()))
        .child(
            Element::new("p")
                .class("page-subtitle")
                .text(site.blog_description.as_str()),
        )
        .children(cards)
        .into()
}

/// Renders a single post: back link, article (title, meta, content, source
/// cards, author bio), discussion prompt, share links and the comments mount.
pub fn blog_post(site: &Site, post: &Post) -> Result<Node, url::ParseError> {
    let mut article = Element::new("article")
        .class("blog-post")
        .child(Element::new("h1").class("article-title").text(post.title.as_str()))
        .child(Element::new("div").class("article-meta").text(post_meta(post)))
        .child(
            Element::new("div")
                .class("post-content")
                .children(render_content(&post.blocks())),
        );
    if !post.sources.is_empty() {
        article = article.child(source_cards(post));
    }
    article = article.child(author_bio(post));

    let mut container = Element::new("div")
        .class("blog-post-page")
        .child(Element::new("a").class("back-link").attr("href", "/blog").text("← All posts"))
        .child(article);
    if let Some(prompt) = &post.discussion_prompt {
        container = container.child(
            Element::new("div")
                .class("discussion")
                .child(Element::new("h3").text("Join the conversation"))
                .child(Element::new("p").text(prompt.as_str())),
        );
    }
    let canonical = Page::BlogPost(post).meta(site)?.canonical;
    Ok(container
        .child(share_links(post, &canonical)?)
        .child(
            Element::new("div")
                .class("comments")
                .attr("id", "comments")
                .attr("data-slug", post.slug.as_str()),
        )
        .into())
}

fn source_cards(post: &Post) -> Element {
    let cards = post.sources.iter().map(|source| {
        external_link(&source.url)
            .class("source-card")
            .child(Element::new("div").class("source-name").text(source.name.as_str()))
            .child(Element::new("div").class("source-author").text(source.author.as_str()))
            .child(
                Element::new("div")
                    .class("source-description")
                    .text(source.description.as_str()),
            )
            .into()
    });
    Element::new("div")
        .class("sources")
        .child(Element::new("h3").text("Sources"))
        .child(Element::new("div").class("source-cards").children(cards))
}

fn author_bio(post: &Post) -> Element {
    let author = &post.author;
    let mut links = Element::new("div").class("author-links");
    if let Some(github) = &author.github {
        links = links.child(external_link(github).text("GitHub"));
    }
    if let Some(x) = &author.x {
        links = links.child(external_link(x).text("X"));
    }
    Element::new("div")
        .class("author-bio")
        .child(Element::new("div").class("author-name").text(author.name.as_str()))
        .child(
            Element::new("div")
                .class("author-bio-text")
                .text(author.bio.clone().unwrap_or_default()),
        )
        .child(links)
}

fn share_links(post: &Post, canonical: &Url) -> Result<Element, url::ParseError> {
    let title = post.title.as_str();
    let url = canonical.as_str();
    let x = Url::parse_with_params("https://x.com/intent/tweet", &[("text", title), ("url", url)])?;
    let linked_in = Url::parse_with_params(
        "https://www.linkedin.com/sharing/share-offsite/",
        &[("url", url)],
    )?;
    let hacker_news = Url::parse_with_params(
        "https://news.ycombinator.com/submitlink",
        &[("u", url), ("t", title)],
    )?;
    Ok(Element::new("div")
        .class("share")
        .child(Element::new("span").class("share-label").text("Share"))
        .child(external_link(x.as_str()).class("share-pill").text("X"))
        .child(external_link(linked_in.as_str()).class("share-pill").text("LinkedIn"))
        .child(external_link(hacker_news.as_str()).class("share-pill").text("Hacker News")))
}

/// Renders the page shown for a blog route with an unknown slug.
pub fn post_not_found() -> Node {
    Element::new("div")
        .class("post-not-found")
        .child(Element::new("h1").class("page-title").text("Post not found"))
        .child(Element::new("p").text("The blog post you're looking for doesn't exist."))
        .child(Element::new("a").class("back-link").attr("href", "/blog").text("Back to blog"))
        .into()
}

/// Renders the body of a blog page. Pages outside the blog have no body
/// here; the interactive bundle owns them.
pub fn render_page(site: &Site, page: &Page) -> Result<Option<Node>, url::ParseError> {
    Ok(match page {
        Page::BlogListing(posts) => Some(blog_listing(site, posts)),
        Page::BlogPost(post) => Some(blog_post(site, post)?),
        Page::PostNotFound => Some(post_not_found()),
        Page::Home | Page::Reader | Page::GettingStarted => None,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::block::parse_blocks;
    use crate::inline::parse_inline;
    use crate::post::test::post;
    use crate::post::{Author, Source};
    use pretty_assertions::assert_eq;

    fn site() -> Site {
        Site::with_url(Url::parse("https://forkzero.ai/").unwrap())
    }

    fn count_tags(nodes: &[Node], tag: &str) -> usize {
        let mut count = 0;
        for node in nodes {
            node.walk(&mut |n| {
                if let Node::Element(e) = n {
                    if e.tag == tag {
                        count += 1;
                    }
                }
            });
        }
        count
    }

    fn find<'a>(node: &'a Node, class: &str) -> Option<&'a Element> {
        let mut found = None;
        node.walk(&mut |n| {
            if let Node::Element(e) = n {
                let classes = e.get_attr("class").unwrap_or("");
                if found.is_none() && classes.split(' ').any(|c| c == class) {
                    found = Some(e);
                }
            }
        });
        found
    }

    #[test]
    fn test_render_inline() {
        let nodes = render_inline(&parse_inline("a **b** [c](https://c.example)"));
        assert_eq!(
            r#"a <strong>b</strong> <a href="https://c.example" target="_blank" rel="noopener noreferrer">c</a>"#,
            nodes.iter().map(Node::to_html).collect::<String>(),
        );
    }

    #[test]
    fn test_render_content_elements() {
        let nodes = render_content(&parse_blocks(
            "## Title\n\nText\n\n```\ncode\nmore\n```\n\n- a\n- b\n\n1. x\n\n---",
        ));
        let html: Vec<String> = nodes.iter().map(Node::to_html).collect();
        assert_eq!(
            vec![
                "<h2>Title</h2>",
                "<p>Text</p>",
                "<pre><code>code\nmore</code></pre>",
                "<ul><li>a</li><li>b</li></ul>",
                "<ol><li>x</li></ol>",
                "<hr />",
            ],
            html
        );
    }

    #[test]
    fn test_callout_marks_first_line() {
        let nodes = render_content(&parse_blocks(":::insight\nOne\n\nTwo\n:::"));
        assert_eq!(
            r#"<div class="callout callout-insight"><p class="callout-first-line">One</p><p class="callout-text">Two</p></div>"#,
            nodes[0].to_html(),
        );
    }

    #[test]
    fn test_blockquote_attribution() {
        let nodes = render_content(&parse_blocks("> Quoted\n> — Author"));
        assert_eq!(
            "<blockquote><p>Quoted</p><footer>Author</footer></blockquote>",
            nodes[0].to_html(),
        );
    }

    #[test]
    fn test_diagram() {
        let nodes = render_content(&parse_blocks(
            "<!-- diagram:lattice-flow -->\n<!-- diagram:unknown -->",
        ));
        assert_eq!(1, nodes.len());
        assert_eq!(13, count_tags(&nodes, "div"));
        let labels: Vec<String> = {
            let mut labels = Vec::new();
            nodes[0].walk(&mut |n| {
                if let Node::Element(e) = n {
                    if e.get_attr("class") == Some("diagram-label") {
                        labels.push(e.children[0].to_html());
                    }
                }
            });
            labels
        };
        assert_eq!(
            vec!["Sources", "Theses", "Requirements", "Implementations"],
            labels
        );
        assert!(nodes[0].to_html().contains("diagram-dot accent-purple"));
    }

    #[test]
    fn test_escaping() {
        let node: Node = Element::new("p")
            .attr("title", r#"a "b" & c"#)
            .text("<script>")
            .into();
        assert_eq!(
            r#"<p title="a &quot;b&quot; &amp; c">&lt;script&gt;</p>"#,
            node.to_html()
        );
    }

    #[test]
    fn test_blog_listing() {
        let posts = vec![
            post("post-001", "first", "Some body text."),
            post("post-002", "second", "Some body text."),
        ];
        let listing = blog_listing(&site(), &posts);
        let html = listing.to_html();
        assert!(html.contains(r#"<h1 class="page-title">Blog</h1>"#));
        assert!(html.contains(r#"href="/blog/first""#));
        assert!(html.contains(r#"href="/blog/second""#));
        assert!(html.contains("February 10, 2026 · George Moon"));
        assert!(html.contains("Read more →"));
        assert_eq!(2, count_tags(&[listing], "h2"));
    }

    #[test]
    fn test_blog_post() -> Result<(), url::ParseError> {
        let mut p = post("post-001", "my-post", "## One\n\nBody text.");
        p.title = String::from("Hello & welcome");
        p.author = Author {
            name: String::from("George Moon"),
            bio: Some(String::from("Builds Lattice.")),
            github: Some(String::from("https://github.com/gmoon")),
            x: None,
        };
        p.sources = vec![Source {
            name: String::from("Paper"),
            author: String::from("Someone"),
            url: String::from("https://example.org/paper"),
            description: String::from("A paper."),
        }];
        p.discussion_prompt = Some(String::from("What do you think?"));

        let node = blog_post(&site(), &p)?;
        let html = node.to_html();
        assert!(html.contains(r#"<a class="back-link" href="/blog">← All posts</a>"#));
        assert!(html.contains("<h1 class=\"article-title\">Hello &amp; welcome</h1>"));
        assert!(html.contains("<h2>One</h2>"));
        assert!(html.contains("Builds Lattice."));
        assert!(html.contains("What do you think?"));
        assert!(html.contains(r#"data-slug="my-post""#));

        let card = find(&node, "source-card").map(|e| e.get_attr("href"));
        assert_eq!(Some(Some("https://example.org/paper")), card);

        let share = find(&node, "share").map(|e| e.children.len());
        assert_eq!(Some(4), share);
        assert!(html.contains(
            "https://x.com/intent/tweet?text=Hello+%26+welcome&amp;url=https%3A%2F%2Fforkzero.ai%2Fblog%2Fmy-post"
        ));
        assert!(html.contains(
            "https://news.ycombinator.com/submitlink?u=https%3A%2F%2Fforkzero.ai%2Fblog%2Fmy-post"
        ));
        Ok(())
    }

    #[test]
    fn test_blog_post_without_extras() -> Result<(), url::ParseError> {
        let p = post("post-001", "plain", "Body text.");
        let node = blog_post(&site(), &p)?;
        assert_eq!(None, find(&node, "sources"));
        assert_eq!(None, find(&node, "discussion"));
        Ok(())
    }

    #[test]
    fn test_post_not_found() {
        let html = post_not_found().to_html();
        assert!(html.contains("Post not found"));
        assert!(html.contains(r#"href="/blog""#));
    }

    #[test]
    fn test_render_page() -> Result<(), url::ParseError> {
        let site = site();
        assert_eq!(None, render_page(&site, &Page::Home)?);
        assert_eq!(Some(post_not_found()), render_page(&site, &Page::PostNotFound)?);
        Ok(())
    }
}
