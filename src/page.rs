//! Selects the page to show for a [`Route`] and computes its head metadata.
//! Both the live view and the pre-renderer go through [`Page`], so the two
//! agree on titles, descriptions and canonical URLs.

use crate::config::Site;
use crate::post::Post;
use crate::route::Route;
use url::Url;

/// A page with the data it needs to render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page<'a> {
    Home,
    Reader,
    GettingStarted,
    BlogListing(&'a [Post]),
    BlogPost(&'a Post),

    /// A blog route whose slug matches no post.
    PostNotFound,
}

impl<'a> Page<'a> {
    /// Picks the page for `route` from the static post list.
    pub fn select(route: &Route, posts: &'a [Post]) -> Page<'a> {
        match route {
            Route::Home => Page::Home,
            Route::Reader => Page::Reader,
            Route::GettingStarted => Page::GettingStarted,
            Route::Blog => Page::BlogListing(posts),
            Route::BlogPost { slug } => match posts.iter().find(|p| &p.slug == slug) {
                Some(post) => Page::BlogPost(post),
                None => Page::PostNotFound,
            },
        }
    }

    /// The route that canonically identifies this page. A missing post has
    /// none of its own and points back at the listing.
    pub fn route(&self) -> Route {
        match self {
            Page::Home => Route::Home,
            Page::Reader => Route::Reader,
            Page::GettingStarted => Route::GettingStarted,
            Page::BlogListing(_) | Page::PostNotFound => Route::Blog,
            Page::BlogPost(post) => post.route(),
        }
    }

    /// Computes the head metadata for the page.
    pub fn meta(&self, site: &Site) -> Result<RouteMeta, url::ParseError> {
        let (title, description) = match self {
            Page::Home => (site.name.clone(), site.description.clone()),
            Page::Reader => (
                titled("Lattice Reader", site),
                String::from("Explore a Lattice knowledge graph in the browser."),
            ),
            Page::GettingStarted => (
                titled("Get Started with Lattice", site),
                String::from("Install Lattice and build your first knowledge graph."),
            ),
            Page::BlogListing(_) => (
                titled(&site.blog_title, site),
                site.blog_description.clone(),
            ),
            Page::BlogPost(post) => (titled(&post.title, site), post.excerpt.clone()),
            Page::PostNotFound => (
                titled("Post not found", site),
                site.blog_description.clone(),
            ),
        };

        let path = self.route().path();
        let canonical = site.url.join(path.trim_start_matches('/'))?;
        Ok(RouteMeta {
            path,
            title,
            description,
            canonical,
            og_type: match self {
                Page::BlogPost(_) => OgType::Article,
                _ => OgType::Website,
            },
        })
    }
}

fn titled(title: &str, site: &Site) -> String {
    format!("{} — {}", title, site.name)
}

/// The Open Graph object type of a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OgType {
    Website,
    Article,
}

impl OgType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OgType::Website => "website",
            OgType::Article => "article",
        }
    }
}

/// Head metadata for one route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteMeta {
    /// The route path, e.g. `/blog/my-post`.
    pub path: String,
    pub title: String,
    pub description: String,
    pub canonical: Url,
    pub og_type: OgType,
}

/// The pages the pre-renderer writes: the listing followed by one page per
/// post, in post order.
pub fn prerender_pages(posts: &[Post]) -> Vec<Page<'_>> {
    let mut pages = Vec::with_capacity(posts.len() + 1);
    pages.push(Page::BlogListing(posts));
    pages.extend(posts.iter().map(Page::BlogPost));
    pages
}
