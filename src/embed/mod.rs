//! Embedded templates.
//!
//! - `template` - Template types for typed variable injection
//! - `build` - Build-time templates (robots.txt)
//! - `serve` - Dev server templates (404 page)

mod template;

pub use template::{Template, TemplateVars};

pub mod build {
    use super::{Template, TemplateVars};

    /// Variables for robots.txt.
    pub struct RobotsVars<'a> {
        /// Absolute sitemap URL, when a sitemap is generated
        pub sitemap_url: Option<&'a str>,
    }

    impl TemplateVars for RobotsVars<'_> {
        fn apply(&self, content: &str) -> String {
            let line = self
                .sitemap_url
                .map(|url| format!("\nSitemap: {url}\n"))
                .unwrap_or_default();
            content.replace("__SITEMAP_LINE__\n", &line)
        }
    }

    /// robots.txt allowing every crawler.
    pub const ROBOTS_TXT: Template<RobotsVars<'static>> =
        Template::new(include_str!("build/robots.txt"));
}

pub mod serve {
    use super::{Template, TemplateVars};
    use crate::utils::html::escape;

    /// Variables for not_found.html.
    pub struct NotFoundVars<'a> {
        /// Request path that matched nothing
        pub path: &'a str,
        /// Base path the request fell outside of, if that is why it failed
        pub outside_base: Option<&'a str>,
    }

    impl TemplateVars for NotFoundVars<'_> {
        fn apply(&self, content: &str) -> String {
            let notice = match self.outside_base {
                Some(base_path) => {
                    let base_path = escape(base_path);
                    format!(
                        "<p class=\"notice\">This request is outside the configured base path \
                         <code>{base_path}</code>. Every page and asset of this site is served \
                         under <code>{base_path}/</code>, for example \
                         <a href=\"{base_path}/\">{base_path}/</a>. Check links and asset \
                         references that start with <code>/</code> but omit the base path.</p>"
                    )
                }
                None => String::new(),
            };
            content
                .replace("__REQUEST_PATH__", &escape(self.path))
                .replace("__BASE_PATH_NOTICE__", &notice)
        }
    }

    /// Custom 404 page.
    pub const NOT_FOUND_HTML: Template<NotFoundVars<'static>> =
        Template::new(include_str!("serve/not_found.html"));
}
