//! The static pre-renderer. For each blog route, the [`Writer`] fills the
//! built page [`Template`] with the route's head metadata and a `<noscript>`
//! fallback (see [`Fragments`]) and writes it to `<dist>/<route>/index.html`.

use crate::config::Site;
use crate::html::push_html;
use crate::page::{prerender_pages, Page, RouteMeta};
use crate::post::Post;
use crate::template::Template;
use gtmpl::{Context, Template as Gtmpl, Value};
use log::info;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Head tags added to every pre-rendered page.
const HEAD_TAGS: &str = concat!(
    r#"<meta property="og:title" content="{{.title}}" />"#,
    "\n    ",
    r#"<meta property="og:description" content="{{.description}}" />"#,
    "\n    ",
    r#"<meta property="og:type" content="{{.og_type}}" />"#,
    "\n    ",
    r#"<meta property="og:url" content="{{.canonical}}" />"#,
    "\n    ",
    r#"<link rel="canonical" href="{{.canonical}}" />"#,
);

/// The listing fallback: a heading and one article per post.
const LISTING_NOSCRIPT: &str = concat!(
    r#"<noscript><div style="max-width:800px;margin:0 auto;padding:2rem;font-family:sans-serif">"#,
    "<h1>{{.blog_title}}</h1>",
    "{{range .posts}}",
    r#"<article><h2><a href="{{.url}}">{{.title}}</a></h2><p>{{.excerpt}}</p></article>"#,
    "{{end}}",
    "</div></noscript>",
);

/// The post fallback: the full article. `content` is already HTML.
const POST_NOSCRIPT: &str = concat!(
    r#"<noscript><article style="max-width:800px;margin:0 auto;padding:2rem;font-family:sans-serif">"#,
    "<h1>{{.post.title}}</h1>",
    "<p><em>{{.post.date}} · {{.post.author}}</em></p>",
    "{{.content}}",
    "</article></noscript>",
);

/// The parsed templates for the pieces inserted into each page.
pub struct Fragments {
    head_tags: Gtmpl,
    listing: Gtmpl,
    post: Gtmpl,
}

impl Fragments {
    pub fn new() -> Result<Fragments> {
        Ok(Fragments {
            head_tags: parse(HEAD_TAGS)?,
            listing: parse(LISTING_NOSCRIPT)?,
            post: parse(POST_NOSCRIPT)?,
        })
    }

    /// The Open Graph and canonical tags for a route.
    pub fn head_tags(&self, meta: &RouteMeta) -> Result<String> {
        execute(&self.head_tags, Value::from(meta))
    }

    /// The `<noscript>` fallback for a page. Pages outside the blog have
    /// none, which is returned as an empty string.
    pub fn noscript(&self, site: &Site, page: &Page) -> Result<String> {
        match page {
            Page::BlogListing(posts) => {
                let mut m: HashMap<String, Value> = HashMap::new();
                m.insert(
                    "blog_title".to_owned(),
                    Value::String(crate::html::escape(&site.blog_title)),
                );
                m.insert(
                    "posts".to_owned(),
                    Value::Array(posts.iter().map(Value::from).collect()),
                );
                execute(&self.listing, Value::Object(m))
            }
            Page::BlogPost(post) => {
                let mut content = String::new();
                push_html(&mut content, &post.blocks())?;

                let mut m: HashMap<String, Value> = HashMap::new();
                m.insert("post".to_owned(), Value::from(*post));
                m.insert("content".to_owned(), Value::String(content));
                execute(&self.post, Value::Object(m))
            }
            Page::Home | Page::Reader | Page::GettingStarted | Page::PostNotFound => {
                Ok(String::new())
            }
        }
    }
}

fn parse(source: &str) -> Result<Gtmpl> {
    let mut template = Gtmpl::default();
    template.parse(source)?;
    Ok(template)
}

fn execute(template: &Gtmpl, value: Value) -> Result<String> {
    let mut out: Vec<u8> = Vec::new();
    template.execute(&mut out, &Context::from(value)?)?;
    Ok(String::from_utf8(out)?)
}

/// Responsible for rendering and writing pre-rendered pages to disk.
pub struct Writer<'a> {
    /// The built page document every route starts from.
    pub template: &'a Template,

    pub fragments: &'a Fragments,

    pub site: &'a Site,

    /// The posts, in listing order.
    pub posts: &'a [Post],

    /// The directory pages are written under. Each route's page is written
    /// to `{dist_directory}/{route path}/index.html`.
    pub dist_directory: &'a Path,
}

impl Writer<'_> {
    /// Renders a single page to a string.
    pub fn render_page(&self, page: &Page) -> Result<String> {
        let meta = page.meta(self.site)?;
        let head_tags = self.fragments.head_tags(&meta)?;
        let noscript = self.fragments.noscript(self.site, page)?;
        Ok(self.template.render(&meta, &head_tags, &noscript))
    }

    /// Writes the listing page and one page per post, in post order, and
    /// returns the paths written.
    pub fn write_routes(&self) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for page in prerender_pages(self.posts) {
            let route_path = page.route().path();
            let file_path = output_path(self.dist_directory, &route_path);
            let html = self.render_page(&page)?;
            if let Some(dir) = file_path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            std::fs::write(&file_path, html)?;
            info!("Pre-rendered: {}", route_path);
            written.push(file_path);
        }
        Ok(written)
    }
}

/// Returns where the page for `route_path` is written:
/// `{dist_directory}/{route_path}/index.html`.
pub fn output_path(dist_directory: &Path, route_path: &str) -> PathBuf {
    dist_directory
        .join(route_path.trim_start_matches('/'))
        .join("index.html")
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),

    /// Returned when a canonical URL can't be built from the site URL.
    Url(url::ParseError),

    /// Returned when a template produces invalid UTF-8.
    Utf8(std::string::FromUtf8Error),

    /// An error writing the output files.
    Io(io::Error),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Error {
        Error::Url(err)
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Error {
        Error::Utf8(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::Url(err) => write!(f, "Building canonical URL: {}", err),
            Error::Utf8(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::Url(err) => Some(err),
            Error::Utf8(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::DEFAULT_MOUNT_POINT;
    use crate::parser::Parser;
    use crate::post::test::post;
    use crate::view;
    use pretty_assertions::assert_eq;
    use url::Url;

    const INDEX: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <title>Forkzero</title>
    <meta name="description" content="Forkzero builds developer tools." />
  </head>
  <body>
    <div id="root"></div>
  </body>
</html>
"#;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    fn site() -> Site {
        Site::with_url(Url::parse("https://forkzero.ai/").unwrap())
    }

    fn posts() -> Vec<Post> {
        vec![
            post("post-001", "first-post", "## One\n\nBody text with **bold**."),
            post("post-002", "second-post", "## Two\n\n- a\n- b"),
        ]
    }

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            PathBuf::from("/dist/blog/index.html"),
            output_path(Path::new("/dist"), "/blog")
        );
        assert_eq!(
            PathBuf::from("/dist/blog/my-post/index.html"),
            output_path(Path::new("/dist"), "/blog/my-post")
        );
    }

    #[test]
    fn test_head_tags() -> Result<()> {
        let p = post("post-001", "my-post", "Body text.");
        let meta = Page::BlogPost(&p).meta(&site())?;
        assert_eq!(
            concat!(
                r#"<meta property="og:title" content="Post post-001 — Forkzero" />"#,
                "\n    ",
                r#"<meta property="og:description" content="Short." />"#,
                "\n    ",
                r#"<meta property="og:type" content="article" />"#,
                "\n    ",
                r#"<meta property="og:url" content="https://forkzero.ai/blog/my-post" />"#,
                "\n    ",
                r#"<link rel="canonical" href="https://forkzero.ai/blog/my-post" />"#,
            ),
            Fragments::new()?.head_tags(&meta)?,
        );
        Ok(())
    }

    #[test]
    fn test_listing_noscript() -> Result<()> {
        let posts = posts();
        let noscript = Fragments::new()?.noscript(&site(), &Page::BlogListing(&posts))?;
        assert_eq!(
            concat!(
                r#"<noscript><div style="max-width:800px;margin:0 auto;padding:2rem;font-family:sans-serif">"#,
                "<h1>Blog</h1>",
                r#"<article><h2><a href="/blog/first-post">Post post-001</a></h2><p>Short.</p></article>"#,
                r#"<article><h2><a href="/blog/second-post">Post post-002</a></h2><p>Short.</p></article>"#,
                "</div></noscript>",
            ),
            noscript,
        );
        Ok(())
    }

    #[test]
    fn test_post_noscript() -> Result<()> {
        let mut p = post("post-001", "my-post", "## One\n\nA & B.");
        p.title = String::from("Tom & Jerry");
        let noscript = Fragments::new()?.noscript(&site(), &Page::BlogPost(&p))?;
        assert_eq!(
            concat!(
                r#"<noscript><article style="max-width:800px;margin:0 auto;padding:2rem;font-family:sans-serif">"#,
                "<h1>Tom &amp; Jerry</h1>",
                "<p><em>2026-02-10 · George Moon</em></p>",
                "<h2>One</h2>\n<p>A &amp; B.</p>",
                "</article></noscript>",
            ),
            noscript,
        );
        Ok(())
    }

    #[test]
    fn test_other_pages_have_no_noscript() -> Result<()> {
        let fragments = Fragments::new()?;
        assert_eq!("", fragments.noscript(&site(), &Page::Home)?);
        assert_eq!("", fragments.noscript(&site(), &Page::PostNotFound)?);
        Ok(())
    }

    #[test]
    fn test_write_routes() -> TestResult {
        let dist = tempfile::tempdir()?;
        std::fs::write(dist.path().join("index.html"), INDEX)?;
        let template = Template::new(INDEX.to_owned(), DEFAULT_MOUNT_POINT.to_owned());
        let fragments = Fragments::new()?;
        let site = site();
        let posts = posts();
        let writer = Writer {
            template: &template,
            fragments: &fragments,
            site: &site,
            posts: &posts,
            dist_directory: dist.path(),
        };

        let written = writer.write_routes()?;
        assert_eq!(
            vec![
                dist.path().join("blog/index.html"),
                dist.path().join("blog/first-post/index.html"),
                dist.path().join("blog/second-post/index.html"),
            ],
            written
        );

        let listing = std::fs::read_to_string(&written[0])?;
        assert_eq!(1, count(&listing, "<title>"));
        assert!(listing.contains("<title>Blog — Forkzero</title>"));
        assert!(listing.contains("context engineering"));
        assert!(listing.contains(r#"<link rel="canonical" href="https://forkzero.ai/blog" />"#));
        assert!(listing.contains(r#"og:type" content="website""#));
        assert!(listing.contains("<noscript>"));
        for p in &posts {
            assert!(listing.contains(&format!(r#"href="/blog/{}""#, p.slug)));
        }

        let first = std::fs::read_to_string(&written[1])?;
        assert_eq!(1, count(&first, "<title>"));
        assert!(first.contains("<title>Post post-001 — Forkzero</title>"));
        assert!(first.contains(r#"<meta name="description" content="Short." />"#));
        assert!(first.contains(r#"og:type" content="article""#));
        assert!(first.contains(
            r#"<link rel="canonical" href="https://forkzero.ai/blog/first-post" />"#
        ));
        assert!(first.contains("George Moon"));
        assert!(first.contains("<h2>One</h2>"));
        assert!(first.contains("<strong>bold</strong>"));

        // the template is never modified
        assert_eq!(INDEX, std::fs::read_to_string(dist.path().join("index.html"))?);
        Ok(())
    }

    #[test]
    fn test_write_routes_is_idempotent() -> TestResult {
        let dist = tempfile::tempdir()?;
        let template = Template::new(INDEX.to_owned(), DEFAULT_MOUNT_POINT.to_owned());
        let fragments = Fragments::new()?;
        let site = site();
        let posts = posts();
        let writer = Writer {
            template: &template,
            fragments: &fragments,
            site: &site,
            posts: &posts,
            dist_directory: dist.path(),
        };

        let first: Vec<String> = writer
            .write_routes()?
            .iter()
            .map(std::fs::read_to_string)
            .collect::<io::Result<_>>()?;
        let second: Vec<String> = writer
            .write_routes()?
            .iter()
            .map(std::fs::read_to_string)
            .collect::<io::Result<_>>()?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_noscript_matches_live_structure() -> TestResult {
        let posts = Parser::new(Path::new("./content/blog")).parse_posts()?;
        let fragments = Fragments::new()?;
        for post in &posts {
            let noscript = fragments.noscript(&site(), &Page::BlogPost(post))?;
            let live: String = view::render_content(&post.blocks())
                .iter()
                .map(view::Node::to_html)
                .collect();
            for tag in &["<h2", "<p", "<ul", "<ol", "<li", "<pre"] {
                // the noscript adds one `<p>` for the date line
                let extra = match *tag {
                    "<p" => 1,
                    _ => 0,
                };
                assert_eq!(
                    count(&live, tag) + extra,
                    count(&noscript, tag),
                    "{} in {}",
                    tag,
                    post.slug
                );
            }
        }
        Ok(())
    }
}
