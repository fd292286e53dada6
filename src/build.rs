//! Exports the [`build_site`] function which stitches together the high-level
//! steps of pre-rendering the site: loading the built page template, parsing
//! and validating the posts ([`crate::parser`], [`crate::post`]), writing one
//! page per blog route ([`crate::write`]), and generating the Atom feed
//! ([`crate::feed`]).

use crate::config::Config;
use crate::feed::{write_feed, Error as FeedError, FEED_PATH};
use crate::parser::{Error as ParseError, Parser};
use crate::post::{validate, Post, ValidationError};
use crate::template::Template;
use crate::write::{Error as WriteError, Fragments, Writer};
use log::{info, warn};
use std::fmt;
use std::fs::File;
use std::path::PathBuf;

/// Pre-renders the site described by a [`Config`] and returns the paths of
/// every file written. The built bundle's `index.html` must already exist in
/// the dist directory; nothing is written if it doesn't.
pub fn build_site(config: &Config) -> Result<Vec<PathBuf>> {
    let template_path = config.template_path();
    let html = std::fs::read_to_string(&template_path).map_err(|err| {
        Error::MissingTemplate {
            path: template_path.clone(),
            err,
        }
    })?;
    let template = Template::new(html, config.mount_point.clone());

    let posts = load_posts(config)?;
    info!(
        "Loaded {} post(s) from {}",
        posts.len(),
        config.posts_directory.display()
    );

    let fragments = Fragments::new()?;
    let writer = Writer {
        template: &template,
        fragments: &fragments,
        site: &config.site,
        posts: &posts,
        dist_directory: &config.dist_directory,
    };
    let mut written = writer.write_routes()?;

    if posts.is_empty() {
        warn!("No posts; skipping {}", FEED_PATH);
    } else {
        let feed_path = config.dist_directory.join(FEED_PATH);
        write_feed(&config.site, &posts, File::create(&feed_path)?)?;
        info!("Wrote feed: {}", feed_path.display());
        written.push(feed_path);
    }

    Ok(written)
}

/// Parses the posts in the configured posts directory and checks them with
/// [`validate`].
pub fn load_posts(config: &Config) -> Result<Vec<Post>> {
    let posts = Parser::new(&config.posts_directory).parse_posts()?;
    validate(&posts)?;
    Ok(posts)
}

pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during parsing,
/// validation, writing, feed generation, and other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned when the built page template can't be read. The interactive
    /// bundle must be built before pre-rendering.
    MissingTemplate { path: PathBuf, err: std::io::Error },

    /// Returned for errors during parsing.
    Parse(ParseError),

    /// Returned when the posts break a data-integrity rule.
    Validation(ValidationError),

    /// Returned for errors writing pages to disk.
    Write(WriteError),

    /// Returned for errors writing the feed.
    Feed(FeedError),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingTemplate { path, err } => write!(
                f,
                "Reading template '{}' (build the site bundle first): {}",
                path.display(),
                err
            ),
            Error::Parse(err) => err.fmt(f),
            Error::Validation(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MissingTemplate { path: _, err } => Some(err),
            Error::Parse(err) => Some(err),
            Error::Validation(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Feed(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Error {
        Error::Validation(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}
