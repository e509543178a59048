//! Generated documents.
//!
//! - **Sitemap**: canonical URLs of every HTML page (`sitemap.xml`)
//! - **Robots**: crawler rules (`robots.txt`)
//!
//! Both are plain strings, computed once from the registry and then either
//! written by the build or served verbatim by the dev server.

pub mod robots;
pub mod sitemap;

pub use robots::{ROBOTS_FILE, build_robots};
pub use sitemap::{SITEMAP_FILE, build_sitemap};

use crate::route::document_route;

/// Absolute URL of the sitemap, e.g. `https://example.com/docs/sitemap.xml`.
pub fn sitemap_url(domain: &str, base_path: &str) -> String {
    format!("https://{domain}{}", document_route(base_path, SITEMAP_FILE))
}
