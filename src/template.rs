//! The built page document used as the template for every pre-rendered page,
//! and the string-level insertions that turn it into a route's page.
//!
//! Insertion points are found by plain text search, so the template must use
//! the exact markers below. A missing marker skips its insertion with a
//! warning rather than failing the build.

use crate::html::escape;
use crate::page::RouteMeta;
use log::warn;

const TITLE_OPEN: &str = "<title>";
const TITLE_CLOSE: &str = "</title>";
const DESCRIPTION_OPEN: &str = r#"<meta name="description""#;
const HEAD_CLOSE: &str = "</head>";

/// The template document plus the mount point the noscript fallback goes
/// after.
#[derive(Clone, Debug)]
pub struct Template {
    html: String,
    mount_point: String,
}

impl Template {
    pub fn new(html: String, mount_point: String) -> Template {
        Template { html, mount_point }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Produces the page for `meta`: the title and description replaced,
    /// `head_tags` inserted before `</head>` and `noscript` (if any) inserted
    /// right after the mount point. The template itself is left untouched.
    pub fn render(&self, meta: &RouteMeta, head_tags: &str, noscript: &str) -> String {
        let mut html = self.html.clone();
        let description = format!(
            r#"<meta name="description" content="{}" />"#,
            escape(&meta.description)
        );

        match replace_title(&html, &escape(&meta.title)) {
            Some(replaced) => html = replaced,
            None => warn!("{}: template has no <title>", meta.path),
        }

        let mut head = String::new();
        match replace_description(&html, &description) {
            Some(replaced) => html = replaced,
            None => {
                head.push_str(&description);
                head.push_str("\n    ");
            }
        }
        head.push_str(head_tags);

        match html.contains(HEAD_CLOSE) {
            true => {
                html = html.replacen(HEAD_CLOSE, &format!("    {}\n  {}", head, HEAD_CLOSE), 1)
            }
            false => warn!("{}: template has no {}", meta.path, HEAD_CLOSE),
        }

        if noscript.is_empty() {
            return html;
        }
        match html.contains(&self.mount_point) {
            true => {
                html = html.replacen(
                    &self.mount_point,
                    &format!("{}\n    {}", self.mount_point, noscript),
                    1,
                )
            }
            false => warn!(
                "{}: template has no mount point `{}`",
                meta.path, self.mount_point
            ),
        }

        html
    }
}

/// Replaces the content of the first `<title>` element.
fn replace_title(html: &str, title: &str) -> Option<String> {
    let start = html.find(TITLE_OPEN)? + TITLE_OPEN.len();
    let end = start + html[start..].find(TITLE_CLOSE)?;
    Some(format!("{}{}{}", &html[..start], title, &html[end..]))
}

/// Replaces the whole first description meta tag with `tag`.
fn replace_description(html: &str, tag: &str) -> Option<String> {
    let start = html.find(DESCRIPTION_OPEN)?;
    let end = start + html[start..].find('>')? + 1;
    Some(format!("{}{}{}", &html[..start], tag, &html[end..]))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::DEFAULT_MOUNT_POINT;
    use crate::page::OgType;
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

    fn meta() -> RouteMeta {
        RouteMeta {
            path: String::from("/blog"),
            title: String::from("Blog — Forkzero"),
            description: String::from(r#"Say "hi" & more"#),
            canonical: Url::parse("https://forkzero.ai/blog").unwrap(),
            og_type: OgType::Website,
        }
    }

    fn template(html: &str) -> Template {
        Template::new(html.to_owned(), DEFAULT_MOUNT_POINT.to_owned())
    }

    #[test]
    fn test_render() {
        assert_eq!(
            r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <title>Blog — Forkzero</title>
    <meta name="description" content="Say &quot;hi&quot; &amp; more" />
      <meta property="og:type" content="website" />
  </head>
  <body>
    <div id="root"></div>
    <noscript>fallback</noscript>
  </body>
</html>
"#,
            template(INDEX).render(
                &meta(),
                r#"<meta property="og:type" content="website" />"#,
                "<noscript>fallback</noscript>"
            ),
        );
    }

    #[test]
    fn test_missing_description_is_inserted() {
        let html = template("<head><title>x</title></head>").render(&meta(), "TAGS", "");
        assert_eq!(
            "<head><title>Blog — Forkzero</title>    <meta name=\"description\" content=\"Say &quot;hi&quot; &amp; more\" />\n    TAGS\n  </head>",
            html
        );
    }

    #[test]
    fn test_missing_markers_are_skipped() {
        assert_eq!(
            "<p>no markers</p>",
            template("<p>no markers</p>").render(&meta(), "TAGS", "<noscript></noscript>")
        );
    }

    #[test]
    fn test_only_first_marker_is_used() {
        let html = template("<title></title><title></title>").render(&meta(), "", "");
        assert_eq!("<title>Blog — Forkzero</title><title></title>", html);
    }
}
