//! Route resolution: one canonical page path, three derived representations.
//!
//! A page registered at `/nested/index.html` under base path `/docs` becomes:
//!
//! | Representation | Value                                                     |
//! |----------------|-----------------------------------------------------------|
//! | build file     | `/docs/nested/index.html`                                 |
//! | serve aliases  | `/docs/nested/index.html`, `/docs/nested/index`, `/docs/nested`, `/docs/nested/` |
//! | sitemap URL    | `https://{domain}/docs/nested/`                           |
//!
//! Build, serve and sitemap all go through [`PageRoutes::resolve`], so the
//! three can never disagree.

use crate::validate::extension_of;

/// Extensions that get extensionless and index-folded aliases.
pub const HTML_EXTENSIONS: [&str; 2] = ["html", "htm"];

/// Check whether a page path is an HTML document.
pub fn is_html(path: &str) -> bool {
    extension_of(path).is_some_and(|ext| HTML_EXTENSIONS.contains(&ext))
}

/// Routes derived from a single page path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRoutes {
    /// File path relative to the output directory (`base_path + path`)
    pub file: String,
    /// Every request path that serves this page, canonical form first
    pub aliases: Vec<String>,
    /// Whether this page answers at the site root (`base_path + "/"`)
    pub root: bool,
    /// Canonical URL path for the sitemap; `None` for non-HTML pages
    pub sitemap_path: Option<String>,
}

impl PageRoutes {
    /// Resolve a validated page path under an optional base path.
    ///
    /// `base_path` is either empty or a validated prefix like `/docs`.
    pub fn resolve(path: &str, base_path: &str) -> Self {
        let full = format!("{base_path}{path}");
        let mut routes = Self {
            file: full.clone(),
            aliases: vec![full.clone()],
            root: false,
            sitemap_path: None,
        };

        let Some(ext) = extension_of(path).filter(|ext| HTML_EXTENSIONS.contains(ext)) else {
            return routes;
        };

        let without_ext = &full[..full.len() - ext.len() - 1];
        routes.aliases.push(without_ext.to_string());

        if let Some(folded) = without_ext.strip_suffix("/index") {
            if folded == base_path {
                routes.root = true;
                routes.aliases.push(root_alias(base_path));
            } else {
                routes.aliases.push(folded.to_string());
                routes.aliases.push(format!("{folded}/"));
            }
        }

        routes.sitemap_path = Some(sitemap_path(without_ext));
        routes
    }

    /// Absolute sitemap URL, e.g. `https://example.com/docs/nested/`.
    pub fn sitemap_url(&self, domain: &str) -> Option<String> {
        self.sitemap_path
            .as_deref()
            .map(|path| format!("https://{domain}{path}"))
    }
}

/// Request path that serves the root page (`/` or `/docs/`).
pub fn root_alias(base_path: &str) -> String {
    format!("{base_path}/")
}

/// Route of a generated document (sitemap, robots.txt) under the base path.
pub fn document_route(base_path: &str, name: &str) -> String {
    format!("{base_path}/{name}")
}

/// Fold a trailing `/index` segment into a directory URL.
///
/// `/docs/index` -> `/docs/`, `/docs/foo` -> `/docs/foo`, `/myindex` -> `/myindex`
fn sitemap_path(without_ext: &str) -> String {
    match without_ext.strip_suffix("index") {
        Some(dir) if dir.ends_with('/') => dir.to_string(),
        _ => without_ext.to_string(),
    }
}
