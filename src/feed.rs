//! Support for creating an Atom feed for the blog from a list of posts.

use crate::config::Site;
use crate::page::Page;
use crate::post::Post;
use atom_syndication::{Entry, Error as AtomError, Feed, Link, Person, Text};
use chrono::{DateTime, FixedOffset, NaiveDateTime, NaiveTime, ParseError, TimeZone};
use std::fmt;
use std::io::Write;

/// Where the feed is written, relative to the dist directory.
pub const FEED_PATH: &str = "blog/feed.atom";

type FixedDateTime = DateTime<FixedOffset>;

/// Creates a feed for `posts` and writes the result to a
/// [`std::io::Write`]. The feed's `updated` date is the newest post date, so
/// the output only changes when the posts do.
pub fn write_feed<W: Write>(site: &Site, posts: &[Post], w: W) -> Result<()> {
    feed(site, posts)?.write_to(w)?;
    Ok(())
}

fn feed(site: &Site, posts: &[Post]) -> Result<Feed> {
    let listing = Page::BlogListing(posts).meta(site)?;

    let mut entries = Vec::with_capacity(posts.len());
    let mut updated: Option<FixedDateTime> = None;
    for post in posts {
        let date = post_date(post)?;
        if updated.map_or(true, |newest| date > newest) {
            updated = Some(date);
        }
        entries.push(entry(site, post, date)?);
    }

    let mut feed = Feed::default();
    feed.set_title(Text::plain(listing.title));
    feed.set_subtitle(Some(Text::plain(listing.description)));
    feed.set_id(listing.canonical.to_string());
    feed.set_links(vec![alternate(listing.canonical.as_str())]);
    feed.set_updated(updated.ok_or(Error::NoPosts)?);
    feed.set_entries(entries);
    Ok(feed)
}

fn entry(site: &Site, post: &Post, date: FixedDateTime) -> Result<Entry> {
    let canonical = Page::BlogPost(post).meta(site)?.canonical;

    let mut author = Person::default();
    author.set_name(post.author.name.as_str());

    let mut entry = Entry::default();
    entry.set_id(canonical.as_str());
    entry.set_title(Text::plain(post.title.as_str()));
    entry.set_summary(Some(Text::plain(post.excerpt.as_str())));
    entry.set_updated(date);
    entry.set_published(Some(date));
    entry.set_authors(vec![author]);
    entry.set_links(vec![alternate(canonical.as_str())]);
    Ok(entry)
}

fn alternate(href: &str) -> Link {
    let mut link = Link::default();
    link.set_href(href);
    link.set_rel("alternate");
    link
}

/// A post's date at midnight UTC.
fn post_date(post: &Post) -> Result<FixedDateTime> {
    let naive_date_time = NaiveDateTime::new(post.parsed_date()?, NaiveTime::from_hms(0, 0, 0));
    Ok(FixedOffset::east(0).from_utc_datetime(&naive_date_time))
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants inlude I/O, Atom, and
/// date-time parsing issues.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when there is an Atom-related error.
    Atom(AtomError),

    /// Returned when there is an issue parsing a post's date.
    DateTimeParse(ParseError),

    /// Returned when a feed URL can't be built from the site URL.
    Url(url::ParseError),

    /// Returned when there are no posts to date the feed by.
    NoPosts,
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Atom(err) => err.fmt(f),
            Error::DateTimeParse(err) => err.fmt(f),
            Error::Url(err) => err.fmt(f),
            Error::NoPosts => write!(f, "a feed needs at least one post"),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Atom(err) => Some(err),
            Error::DateTimeParse(err) => Some(err),
            Error::Url(err) => Some(err),
            Error::NoPosts => None,
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<AtomError> for Error {
    /// Converts [`AtomError`]s into [`Error`]. This allows us to use the `?`
    /// operator in fallible feed operations.
    fn from(err: AtomError) -> Error {
        Error::Atom(err)
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the `?`
    /// operator in fallible feed operations.
    fn from(err: ParseError) -> Error {
        Error::DateTimeParse(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Error {
        Error::Url(err)
    }
}
