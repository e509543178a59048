//! Sitemap generation.
//!
//! Lists the canonical URL of every HTML page, sorted by URL so the document is
//! byte-identical across runs regardless of registration order:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"><url><loc>https://example.com/</loc></url></urlset>
//! ```

use std::borrow::Cow;

use crate::page::Page;

pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// File name of the generated sitemap, relative to the site root.
pub const SITEMAP_FILE: &str = "sitemap.xml";

/// Build the sitemap document for `pages`.
pub fn build_sitemap<'a>(
    domain: &str,
    base_path: &str,
    pages: impl IntoIterator<Item = &'a Page>,
) -> String {
    Sitemap::build(domain, base_path, pages).into_xml()
}

struct Sitemap {
    urls: Vec<UrlEntry>,
}

struct UrlEntry {
    loc: String,
}

impl Sitemap {
    fn build<'a>(
        domain: &str,
        base_path: &str,
        pages: impl IntoIterator<Item = &'a Page>,
    ) -> Self {
        let mut urls: Vec<UrlEntry> = pages
            .into_iter()
            .filter_map(|page| page.routes(base_path).sitemap_url(domain))
            .map(|loc| UrlEntry { loc })
            .collect();

        urls.sort_unstable_by(|a, b| a.loc.as_bytes().cmp(b.loc.as_bytes()));
        Self { urls }
    }

    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(128 + self.urls.len() * 64);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push_str("<urlset xmlns=\"");
        xml.push_str(SITEMAP_NS);
        xml.push_str("\">");

        for entry in self.urls {
            xml.push_str("<url><loc>");
            xml.push_str(&escape_xml(&entry.loc));
            xml.push_str("</loc></url>");
        }

        xml.push_str("</urlset>");
        xml
    }
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}
