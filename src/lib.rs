//! The library code for the Forkzero site's blog engine. Post content is
//! written in a small markdown-like dialect that is rendered two ways from the
//! same parse:
//!
//! 1. Live, as a tree of UI nodes for the interactive runtime
//!    ([`crate::view`])
//! 2. Statically, as SEO-complete HTML pages for crawlers plus an Atom feed
//!    ([`crate::write`], [`crate::feed`])
//!
//! Both start from the same pieces. [`crate::parser`] loads the posts from
//! disk, [`crate::block`] and [`crate::inline`] parse their content, and
//! [`crate::route`] and [`crate::page`] decide which page a path shows and
//! what its head metadata is. [`crate::build::build_site`] runs the static
//! half end to end.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod block;
pub mod build;
pub mod config;
pub mod diagram;
pub mod feed;
pub mod html;
pub mod inline;
pub mod page;
pub mod parser;
pub mod post;
pub mod route;
pub mod template;
pub mod view;
pub mod write;

mod value;
