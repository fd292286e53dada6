//! Defines the [`Parser`] and [`Error`] types, which load the static list of
//! [`Post`]s from source files on disk.

use std::{
    fmt,
    fs::File,
    path::{Path, PathBuf},
};

use log::debug;
use serde::Deserialize;
use walkdir::WalkDir;

use crate::post::{Author, Post, Source};

const MARKDOWN_EXTENSION: &str = "md";

/// Parses [`Post`] objects from source files.
pub struct Parser<'a> {
    /// `posts_directory` is the directory holding one `.md` file per post.
    posts_directory: &'a Path,
}

impl<'a> Parser<'a> {
    /// Constructs a new parser for the posts in `posts_directory`.
    pub fn new(posts_directory: &'a Path) -> Parser<'a> {
        Parser { posts_directory }
    }

    /// Searches the posts directory for post files (extension = `.md`) and
    /// returns a list of [`Post`] objects sorted by date (most recent first;
    /// posts with the same date keep file-name order). Each post file must be
    /// structured as follows:
    ///
    /// 1. Initial frontmatter fence (`---`)
    /// 2. YAML frontmatter with fields `id`, `title`, `date`, `author`,
    ///    `excerpt`, and optionally `slug`, `sources`, and
    ///    `discussion_prompt`
    /// 3. Terminal frontmatter fence (a line containing only `---`)
    /// 4. Post content
    ///
    /// For example:
    ///
    /// ```md
    /// ---
    /// id: post-001
    /// title: Hello, world!
    /// date: 2026-02-10
    /// author: George Moon
    /// excerpt: A greeting.
    /// ---
    /// ## Hello
    ///
    /// World
    /// ```
    pub fn parse_posts(&self) -> Result<Vec<Post>> {
        let mut posts = Vec::new();
        for result in WalkDir::new(self.posts_directory)
            .min_depth(1)
            .max_depth(1)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        {
            let entry = result?;
            let is_post = entry.file_type().is_file()
                && entry.path().extension().map_or(false, |ext| ext == MARKDOWN_EXTENSION);
            if is_post {
                posts.push(self.parse_post(entry.path())?);
            }
        }

        posts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(posts)
    }

    /// Parses a single [`Post`] from the file at `path`, annotating any error
    /// with the path.
    pub fn parse_post(&self, path: &Path) -> Result<Post> {
        match self._parse_post(path) {
            Ok(post) => {
                debug!("parsed post `{}` from {}", post.slug, path.display());
                Ok(post)
            }
            Err(e) => Err(Error::Annotated(
                format!("parsing post `{}`", path.display()),
                Box::new(e),
            )),
        }
    }

    fn _parse_post(&self, path: &Path) -> Result<Post> {
        use std::io::Read;
        let mut contents = String::new();
        File::open(path)?.read_to_string(&mut contents)?;

        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| InvalidFileNameError(path.to_owned()))?;
        parse_post_str(stem, &contents)
    }
}

/// Parses a post from the contents of its source file. `file_stem` is the
/// source file's name without its extension; it becomes the slug when the
/// frontmatter doesn't set one.
pub fn parse_post_str(file_stem: &str, input: &str) -> Result<Post> {
    let input = input.replace("\r\n", "\n");
    let (yaml, content) = split_frontmatter(&input)?;
    let frontmatter: Frontmatter = serde_yaml::from_str(yaml)?;

    Ok(Post {
        id: frontmatter.id,
        slug: frontmatter
            .slug
            .unwrap_or_else(|| slug::slugify(file_stem)),
        title: frontmatter.title,
        date: frontmatter.date,
        author: frontmatter.author,
        excerpt: frontmatter.excerpt,
        content: content.trim_end().to_owned(),
        sources: frontmatter.sources,
        discussion_prompt: frontmatter.discussion_prompt,
    })
}

/// Splits a post source into its YAML frontmatter and its content. The
/// closing fence must be on a line of its own so that `---` rules in the
/// frontmatter's strings or the content are never mistaken for it.
fn split_frontmatter(input: &str) -> Result<(&str, &str)> {
    const FENCE: &str = "---";
    let rest = match input.strip_prefix(FENCE) {
        Some(rest) if rest.starts_with('\n') => &rest[1..],
        _ => return Err(Error::FrontmatterMissingStartFence),
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            return Ok((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    Err(Error::FrontmatterMissingEndFence)
}

#[derive(Deserialize, Clone)]
struct Frontmatter {
    #[serde(default)]
    pub id: String,

    /// Defaults to the slugified file name.
    #[serde(default)]
    pub slug: Option<String>,

    pub title: String,

    pub date: String,

    pub author: Author,

    pub excerpt: String,

    #[serde(default)]
    pub sources: Vec<Source>,

    #[serde(default)]
    pub discussion_prompt: Option<String>,
}

#[derive(Debug)]
pub struct InvalidFileNameError(PathBuf);

impl fmt::Display for InvalidFileNameError {
    /// Displays an [`InvalidFileNameError`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid file name: {:?}", &self.0)
    }
}

impl std::error::Error for InvalidFileNameError {
    /// Implements the [`std::error::Error`] trait for [`InvalidFileNameError`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

/// Represents the result of a [`Post`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a [`Post`] object.
#[derive(Debug)]
pub enum Error {
    /// Returned when a post source file is missing its starting frontmatter
    /// fence (`---`).
    FrontmatterMissingStartFence,

    /// Returned when a post source file is missing its terminal frontmatter
    /// fence (`---` i.e., the starting fence was found but the ending one was
    /// missing).
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the frontmatter as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// Returned for WalkDir I/O errors.
    WalkDir(walkdir::Error),

    /// Returned when a source file name isn't valid UTF-8.
    InvalidFileName(InvalidFileNameError),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => {
                write!(f, "Post must begin with `---`")
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::InvalidFileName(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::InvalidFileName(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<InvalidFileNameError> for Error {
    fn from(err: InvalidFileNameError) -> Error {
        Error::InvalidFileName(err)
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator while walking the posts directory.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::post::validate;

    const SIMPLE: &str = "---
id: post-007
title: Simple
date: 2026-01-01
author: George Moon
excerpt: The first day.
---
## Hello

Today is the first day of the year.
";

    #[test]
    fn test_parse_post_str() -> Result<()> {
        let post = parse_post_str("Simple Post", SIMPLE)?;
        assert_eq!("post-007", post.id);
        assert_eq!("simple-post", post.slug);
        assert_eq!("Simple", post.title);
        assert_eq!("2026-01-01", post.date);
        assert_eq!("George Moon", post.author.name);
        assert_eq!(
            "## Hello\n\nToday is the first day of the year.",
            post.content
        );
        assert!(post.sources.is_empty());
        Ok(())
    }

    #[test]
    fn test_frontmatter_slug_and_sources() -> Result<()> {
        let post = parse_post_str(
            "ignored",
            "---\nid: p\nslug: chosen\ntitle: T\ndate: 2026-01-01\nauthor:\n  name: A\nexcerpt: E\nsources:\n  - name: Paper\n    author: Someone\n    url: https://example.org/paper\ndiscussion_prompt: Thoughts?\n---\nBody\n",
        )?;
        assert_eq!("chosen", post.slug);
        assert_eq!(1, post.sources.len());
        assert_eq!("https://example.org/paper", post.sources[0].url);
        assert_eq!(Some("Thoughts?".to_owned()), post.discussion_prompt);
        Ok(())
    }

    #[test]
    fn test_rules_in_content_are_not_fences() -> Result<()> {
        let post = parse_post_str(
            "rules",
            "---\nid: p\ntitle: T\ndate: 2026-01-01\nauthor: A\nexcerpt: E\n---\nabove\n\n---\n\nbelow\n",
        )?;
        assert_eq!("above\n\n---\n\nbelow", post.content);
        Ok(())
    }

    #[test]
    fn test_crlf_line_endings() -> Result<()> {
        let post = parse_post_str("crlf", &SIMPLE.replace('\n', "\r\n"))?;
        assert_eq!(
            "## Hello\n\nToday is the first day of the year.",
            post.content
        );
        Ok(())
    }

    #[test]
    fn test_missing_fences() {
        match parse_post_str("x", "id: p\n") {
            Err(Error::FrontmatterMissingStartFence) => {}
            other => panic!("wanted missing start fence; found {:?}", other),
        }
        match parse_post_str("x", "---\nid: p\n") {
            Err(Error::FrontmatterMissingEndFence) => {}
            other => panic!("wanted missing end fence; found {:?}", other),
        }
    }

    #[test]
    fn test_parse_posts() -> Result<()> {
        let posts = Parser::new(Path::new("./content/blog")).parse_posts()?;
        assert!(!posts.is_empty());
        assert_eq!(Ok(()), validate(&posts));

        let post = &posts[0];
        assert_eq!("context-engineering-knowledge-layer", post.slug);
        assert_eq!("George Moon", post.author.name);
        assert!(post.content.starts_with("Context engineering is the term"));
        Ok(())
    }

    #[test]
    fn test_parse_posts_sorted_by_date() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let write = |name: &str, date: &str| {
            std::fs::write(
                dir.path().join(name),
                format!(
                    "---\nid: {}\ntitle: T\ndate: {}\nauthor: A\nexcerpt: E\n---\nBody text\n",
                    name, date
                ),
            )
        };
        write("a.md", "2025-01-01")?;
        write("b.md", "2026-03-01")?;
        write("c.md", "2025-06-01")?;
        std::fs::write(dir.path().join("notes.txt"), "not a post")?;

        let posts = Parser::new(dir.path()).parse_posts()?;
        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(vec!["b", "c", "a"], slugs);
        Ok(())
    }
}
