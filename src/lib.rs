//! litepage - register pages once, then build them to a static tree or serve
//! them from a dev server that answers exactly the same URLs.
//!
//! Every page has one canonical path such as `/blog/index.html`. From it the
//! build derives the output file, the dev server derives every URL that
//! reaches the page (`/blog/index.html`, `/blog/index`, `/blog`, `/blog/`) and
//! the sitemap derives the canonical URL (`https://{domain}/blog/`).

pub mod logger;

pub mod build;
pub mod cli;
pub mod config;
mod embed;
pub mod generator;
pub mod page;
pub mod route;
pub mod serve;
mod site;
mod utils;
pub mod validate;

pub use build::{BuildError, BuildReport};
pub use cli::{Mode, RunArgs};
pub use config::{ConfigError, SiteConfig};
pub use page::{Page, RegistryError, Render, renderer};
pub use serve::{Router, ServeError};
pub use site::Site;
pub use validate::ValidationError;
