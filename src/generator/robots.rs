//! robots.txt generation.

use crate::embed::build::{ROBOTS_TXT, RobotsVars};

/// File name of the generated robots.txt, relative to the site root.
pub const ROBOTS_FILE: &str = "robots.txt";

/// Build a robots.txt that allows every crawler, pointing at the sitemap when
/// one is generated.
pub fn build_robots(sitemap_url: Option<&str>) -> String {
    ROBOTS_TXT.render(&RobotsVars { sitemap_url })
}
