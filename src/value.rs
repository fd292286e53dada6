//! Conversions into template [`Value`]s. Templates don't escape anything, so
//! every string is HTML-escaped on the way in; template authors can drop
//! values straight into text or double-quoted attributes.

use crate::html::{escape, escape_url};
use crate::page::RouteMeta;
use crate::post::Post;
use gtmpl_value::Value;
use std::collections::HashMap;

fn escaped(s: &str) -> Value {
    Value::String(escape(s))
}

impl From<&Post> for Value {
    /// Fields: `id`, `slug`, `title`, `date` (as written), `display_date`,
    /// `author`, `excerpt` and `url` (the post's path).
    fn from(post: &Post) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("id".to_owned(), escaped(&post.id));
        m.insert("slug".to_owned(), escaped(&post.slug));
        m.insert("title".to_owned(), escaped(&post.title));
        m.insert("date".to_owned(), escaped(&post.date));
        m.insert("display_date".to_owned(), escaped(&post.display_date()));
        m.insert("author".to_owned(), escaped(&post.author.name));
        m.insert("excerpt".to_owned(), escaped(&post.excerpt));
        m.insert(
            "url".to_owned(),
            Value::String(escape_url(&post.route().path())),
        );
        Value::Object(m)
    }
}

impl From<&RouteMeta> for Value {
    /// Fields: `path`, `title`, `description`, `og_type` and `canonical`.
    fn from(meta: &RouteMeta) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("path".to_owned(), escaped(&meta.path));
        m.insert("title".to_owned(), escaped(&meta.title));
        m.insert("description".to_owned(), escaped(&meta.description));
        m.insert("og_type".to_owned(), escaped(meta.og_type.as_str()));
        m.insert(
            "canonical".to_owned(),
            Value::String(escape_url(meta.canonical.as_str())),
        );
        Value::Object(m)
    }
}
