//! Maps request paths to logical pages.

use std::fmt;

/// The logical page identity for a path. A route is a pure function of the
/// path string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Reader,
    GettingStarted,

    /// The blog listing.
    Blog,

    /// A single blog post. The slug may contain further slashes; it is not
    /// checked against the known posts here.
    BlogPost { slug: String },
}

impl Route {
    /// The route's page name (`home`, `reader`, `getting-started`, `blog`, or
    /// `blog-post`).
    pub fn page(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Reader => "reader",
            Route::GettingStarted => "getting-started",
            Route::Blog => "blog",
            Route::BlogPost { .. } => "blog-post",
        }
    }

    pub fn slug(&self) -> Option<&str> {
        match self {
            Route::BlogPost { slug } => Some(slug),
            _ => None,
        }
    }

    /// The canonical path for the route, without a trailing slash (except for
    /// the root).
    pub fn path(&self) -> String {
        match self {
            Route::Home => String::from("/"),
            Route::Reader => String::from("/reader"),
            Route::GettingStarted => String::from("/getting-started"),
            Route::Blog => String::from("/blog"),
            Route::BlogPost { slug } => format!("/blog/{}", slug),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Route::BlogPost { slug } => write!(f, "{} ({})", self.page(), slug),
            _ => f.write_str(self.page()),
        }
    }
}

/// Resolves `path` to a [`Route`]. Rules are exact matches evaluated top to
/// bottom, tolerating one trailing slash; anything unrecognized is the home
/// page.
pub fn resolve_route(path: &str) -> Route {
    match path {
        "/reader" | "/reader/" => Route::Reader,
        "/getting-started" | "/getting-started/" => Route::GettingStarted,
        "/blog" | "/blog/" => Route::Blog,
        _ => match path.strip_prefix("/blog/") {
            Some(rest) => Route::BlogPost {
                slug: rest.strip_suffix('/').unwrap_or(rest).to_owned(),
            },
            None => Route::Home,
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn post(slug: &str) -> Route {
        Route::BlogPost {
            slug: slug.to_owned(),
        }
    }

    #[test]
    fn test_home() {
        assert_eq!(Route::Home, resolve_route("/"));
        assert_eq!(Route::Home, resolve_route(""));
    }

    #[test]
    fn test_unknown_paths_are_home() {
        assert_eq!(Route::Home, resolve_route("/about"));
        assert_eq!(Route::Home, resolve_route("/foo/bar"));
        assert_eq!(Route::Home, resolve_route("/readers"));
        assert_eq!(Route::Home, resolve_route("/reader//"));
        assert_eq!(Route::Home, resolve_route("/getting-started/x"));
        assert_eq!(Route::Home, resolve_route("/blogs"));
    }

    #[test]
    fn test_reader() {
        assert_eq!(Route::Reader, resolve_route("/reader"));
        assert_eq!(Route::Reader, resolve_route("/reader/"));
    }

    #[test]
    fn test_getting_started() {
        assert_eq!(Route::GettingStarted, resolve_route("/getting-started"));
        assert_eq!(Route::GettingStarted, resolve_route("/getting-started/"));
    }

    #[test]
    fn test_blog_listing() {
        assert_eq!(Route::Blog, resolve_route("/blog"));
        assert_eq!(Route::Blog, resolve_route("/blog/"));
    }

    #[test]
    fn test_blog_post() {
        assert_eq!(post("my-post"), resolve_route("/blog/my-post"));
        assert_eq!(post("my-post"), resolve_route("/blog/my-post/"));
        assert_eq!(
            post("context-engineering-knowledge-layer"),
            resolve_route("/blog/context-engineering-knowledge-layer"),
        );
    }

    #[test]
    fn test_multi_segment_slug_strips_one_trailing_slash() {
        assert_eq!(post("a/b"), resolve_route("/blog/a/b/"));
        assert_eq!(post("a/b/"), resolve_route("/blog/a/b//"));
    }

    #[test]
    fn test_path_round_trips_through_resolve() {
        for route in vec![
            Route::Home,
            Route::Reader,
            Route::GettingStarted,
            Route::Blog,
            post("my-post"),
        ] {
            assert_eq!(route, resolve_route(&route.path()));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!("blog-post (my-post)", post("my-post").to_string());
        assert_eq!("getting-started", Route::GettingStarted.to_string());
    }
}
