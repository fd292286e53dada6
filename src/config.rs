//! Loads the project configuration from an optional `forkzero.yaml` file.

use log::info;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// The name of the project file searched for by [`Config::from_directory`].
pub const PROJECT_FILE: &str = "forkzero.yaml";

const DEFAULT_SITE_URL: &str = "https://forkzero.ai/";

/// The mount point of the interactive bundle in the built template.
pub const DEFAULT_MOUNT_POINT: &str = r#"<div id="root"></div>"#;

#[derive(Deserialize, Default)]
struct Project {
    #[serde(default)]
    site_url: Option<Url>,

    #[serde(default)]
    site_name: Option<String>,

    #[serde(default)]
    site_description: Option<String>,

    #[serde(default)]
    blog_title: Option<String>,

    #[serde(default)]
    blog_description: Option<String>,

    #[serde(default)]
    posts_directory: Option<PathBuf>,

    #[serde(default)]
    dist_directory: Option<PathBuf>,

    #[serde(default)]
    mount_point: Option<String>,
}

/// The site-wide metadata used for titles, canonical URLs and the feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Site {
    /// The site root, e.g. `https://forkzero.ai/`. Route paths are joined
    /// onto it to form canonical URLs.
    pub url: Url,

    /// Appended to page titles, e.g. `Blog — Forkzero`.
    pub name: String,

    pub description: String,

    pub blog_title: String,

    pub blog_description: String,
}

impl Site {
    /// Constructs a site rooted at `url` with the default names and
    /// descriptions.
    pub fn with_url(url: Url) -> Site {
        Site {
            url,
            name: String::from("Forkzero"),
            description: String::from(
                "Forkzero builds developer tools where AI agents are first-class users.",
            ),
            blog_title: String::from("Blog"),
            blog_description: String::from(
                "Technical writing on knowledge coordination, context \
                 engineering, and AI-first developer tooling.",
            ),
        }
    }
}

/// The resolved configuration for a build. All paths are absolute or relative
/// to the working directory (project-relative paths from the project file are
/// joined onto the project directory).
#[derive(Clone, Debug)]
pub struct Config {
    pub site: Site,

    /// The directory holding the post source files.
    pub posts_directory: PathBuf,

    /// The directory holding the built interactive bundle. Its `index.html`
    /// is the template for every pre-rendered page.
    pub dist_directory: PathBuf,

    /// The markup the noscript fallback is inserted after.
    pub mount_point: String,
}

impl Config {
    /// Searches `dir` and its ancestors for a [`PROJECT_FILE`] and loads the
    /// first one found. If there is none, the defaults are used with `dir` as
    /// the project directory.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        for candidate in dir.ancestors() {
            let path = candidate.join(PROJECT_FILE);
            if path.is_file() {
                info!("Using project file {}", path.display());
                return Config::from_project_file(&path);
            }
        }
        info!(
            "No `{}` found; using defaults for {}",
            PROJECT_FILE,
            dir.display()
        );
        Config::from_project(Project::default(), dir)
    }

    /// Loads the configuration from the project file at `path`. Relative
    /// directories in the file are relative to the file's directory.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path).map_err(|err| Error::Io {
            path: path.to_owned(),
            err,
        })?;
        // serde_yaml reports an empty document as end-of-stream, even into an
        // `Option`.
        let project = if contents.trim().is_empty() {
            Project::default()
        } else {
            let project: Option<Project> =
                serde_yaml::from_str(&contents).map_err(|err| Error::Yaml {
                    path: path.to_owned(),
                    err,
                })?;
            project.unwrap_or_default()
        };
        let root = path.parent().unwrap_or_else(|| Path::new("."));
        Config::from_project(project, root)
    }

    /// Overrides the dist directory, e.g. from a command-line flag.
    pub fn with_dist_directory(mut self, dist_directory: PathBuf) -> Config {
        self.dist_directory = dist_directory;
        self
    }

    /// The built bundle's entry document, used as the page template.
    pub fn template_path(&self) -> PathBuf {
        self.dist_directory.join("index.html")
    }

    fn from_project(project: Project, root: &Path) -> Result<Config> {
        let mut url = match project.site_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_SITE_URL)?,
        };
        // Route paths are joined onto the site URL, which drops a last path
        // segment unless it ends in `/`.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        let defaults = Site::with_url(url);
        Ok(Config {
            site: Site {
                url: defaults.url,
                name: project.site_name.unwrap_or(defaults.name),
                description: project
                    .site_description
                    .unwrap_or(defaults.description),
                blog_title: project.blog_title.unwrap_or(defaults.blog_title),
                blog_description: project
                    .blog_description
                    .unwrap_or(defaults.blog_description),
            },
            posts_directory: root.join(
                project
                    .posts_directory
                    .unwrap_or_else(|| PathBuf::from("content/blog")),
            ),
            dist_directory: root.join(
                project
                    .dist_directory
                    .unwrap_or_else(|| PathBuf::from("dist")),
            ),
            mount_point: project
                .mount_point
                .unwrap_or_else(|| DEFAULT_MOUNT_POINT.to_owned()),
        })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Returned when a project file can't be read or parsed.
#[derive(Debug)]
pub enum Error {
    Io { path: PathBuf, err: std::io::Error },
    Yaml { path: PathBuf, err: serde_yaml::Error },
    Url(url::ParseError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io { path, err } => {
                write!(f, "Opening project file '{}': {}", path.display(), err)
            }
            Error::Yaml { path, err } => {
                write!(f, "Loading project file '{}': {}", path.display(), err)
            }
            Error::Url(err) => write!(f, "Invalid site URL: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { err, .. } => Some(err),
            Error::Yaml { err, .. } => Some(err),
            Error::Url(err) => Some(err),
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Error {
        Error::Url(err)
    }
}
