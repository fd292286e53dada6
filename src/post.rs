//! Defines the [`Post`] type and its supporting [`Author`] and [`Source`]
//! types, plus [`validate`], which checks the data-integrity rules every post
//! list must satisfy before it is rendered.

use crate::block::{parse_blocks, Block};
use crate::route::Route;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;

/// The date format used in post frontmatter.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A blog post. Posts are loaded once at build time (see
/// [`crate::parser::Parser`]) and never change afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Post {
    pub id: String,

    /// The URL slug. The post lives at `/blog/{slug}`.
    pub slug: String,

    pub title: String,

    /// The publication date as written in the frontmatter (`YYYY-MM-DD`).
    pub date: String,

    pub author: Author,

    /// A short summary shown on the listing page and used as the page
    /// description.
    pub excerpt: String,

    /// The raw body in the content dialect (see [`crate::block`]).
    pub content: String,

    pub sources: Vec<Source>,

    pub discussion_prompt: Option<String>,
}

impl Post {
    /// Parses the post's content into blocks.
    pub fn blocks(&self) -> Vec<Block> {
        parse_blocks(&self.content)
    }

    pub fn route(&self) -> Route {
        Route::BlogPost {
            slug: self.slug.clone(),
        }
    }

    /// Parses the post's date.
    pub fn parsed_date(&self) -> Result<NaiveDate, chrono::ParseError> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
    }

    /// The date for display, e.g. `February 10, 2026`. Falls back to the raw
    /// frontmatter value if it doesn't parse.
    pub fn display_date(&self) -> String {
        match self.parsed_date() {
            Ok(date) => date.format("%B %-d, %Y").to_string(),
            Err(_) => self.date.clone(),
        }
    }
}

/// A post's author. In frontmatter this may be written as a plain name or as
/// a map with `name` and the optional `bio`, `github` and `x` links.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "AuthorFrontmatter")]
pub struct Author {
    pub name: String,
    pub bio: Option<String>,
    pub github: Option<String>,
    pub x: Option<String>,
}

impl Author {
    pub fn named(name: &str) -> Author {
        Author {
            name: name.to_owned(),
            bio: None,
            github: None,
            x: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AuthorFrontmatter {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        bio: Option<String>,
        #[serde(default)]
        github: Option<String>,
        #[serde(default)]
        x: Option<String>,
    },
}

impl From<AuthorFrontmatter> for Author {
    fn from(author: AuthorFrontmatter) -> Author {
        match author {
            AuthorFrontmatter::Name(name) => Author::named(&name),
            AuthorFrontmatter::Full {
                name,
                bio,
                github,
                x,
            } => Author {
                name,
                bio,
                github,
                x,
            },
        }
    }
}

/// A reference cited by a post, rendered as a source card.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Source {
    pub name: String,
    pub author: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
}

/// Checks the invariants a post list must satisfy: required fields are
/// present, ids and slugs are unique, slugs match `^[a-z0-9-]+$`, dates are
/// valid calendar dates, and each excerpt is shorter than its content. All
/// problems are collected rather than stopping at the first.
pub fn validate(posts: &[Post]) -> Result<(), ValidationError> {
    let mut problems = Vec::new();
    let mut ids = HashSet::new();
    let mut slugs = HashSet::new();

    for post in posts {
        let required = [
            ("id", &post.id),
            ("slug", &post.slug),
            ("title", &post.title),
            ("date", &post.date),
            ("author", &post.author.name),
            ("excerpt", &post.excerpt),
            ("content", &post.content),
        ];
        for &(field, value) in required.iter() {
            if value.trim().is_empty() {
                problems.push(Problem::MissingField {
                    post: post.slug.clone(),
                    field,
                });
            }
        }

        if !ids.insert(post.id.as_str()) {
            problems.push(Problem::DuplicateId(post.id.clone()));
        }
        if !slugs.insert(post.slug.as_str()) {
            problems.push(Problem::DuplicateSlug(post.slug.clone()));
        }
        if !is_valid_slug(&post.slug) {
            problems.push(Problem::InvalidSlug(post.slug.clone()));
        }
        if post.parsed_date().is_err() {
            problems.push(Problem::InvalidDate {
                post: post.slug.clone(),
                date: post.date.clone(),
            });
        }
        if post.excerpt.chars().count() >= post.content.chars().count() {
            problems.push(Problem::ExcerptTooLong(post.slug.clone()));
        }
    }

    match problems.is_empty() {
        true => Ok(()),
        false => Err(ValidationError(problems)),
    }
}

/// Reports whether `slug` is non-empty and contains only lowercase ASCII
/// letters, digits and hyphens.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// A single broken invariant found by [`validate`].
#[derive(Debug, PartialEq, Eq)]
pub enum Problem {
    MissingField { post: String, field: &'static str },
    DuplicateId(String),
    DuplicateSlug(String),
    InvalidSlug(String),
    InvalidDate { post: String, date: String },
    ExcerptTooLong(String),
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Problem::MissingField { post, field } => {
                write!(f, "post `{}` is missing `{}`", post, field)
            }
            Problem::DuplicateId(id) => write!(f, "duplicate post id `{}`", id),
            Problem::DuplicateSlug(slug) => {
                write!(f, "duplicate post slug `{}`", slug)
            }
            Problem::InvalidSlug(slug) => write!(
                f,
                "slug `{}` must contain only lowercase letters, digits and `-`",
                slug
            ),
            Problem::InvalidDate { post, date } => write!(
                f,
                "post `{}` has invalid date `{}` (expected YYYY-MM-DD)",
                post, date
            ),
            Problem::ExcerptTooLong(slug) => write!(
                f,
                "post `{}` has an excerpt that is not shorter than its content",
                slug
            ),
        }
    }
}

/// Returned by [`validate`] with every problem found.
#[derive(Debug, PartialEq, Eq)]
pub struct ValidationError(pub Vec<Problem>);

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} invalid post(s):", self.0.len())?;
        for problem in &self.0 {
            write!(f, "\n  - {}", problem)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
