//! Site configuration.
//!
//! A [`SiteConfig`] can be built in code with the `with_*` helpers or loaded
//! from a `litepage.toml`:
//!
//! ```toml
//! domain = "catpics.com"
//! output_dir = "dist"
//! assets_dir = "public"
//! base_path = "/blog"
//! sitemap = true
//! robots_txt = false
//! ```
//!
//! | Field        | Default  | Meaning                                       |
//! |--------------|----------|-----------------------------------------------|
//! | `domain`     | required | bare host used for sitemap URLs               |
//! | `output_dir` | `dist`   | where `build` writes the static tree          |
//! | `assets_dir` | `public` | static files copied on build, served on serve |
//! | `base_path`  | empty    | mount prefix such as `/blog`                  |
//! | `sitemap`    | `true`   | generate `sitemap.xml`                        |
//! | `robots_txt` | `false`  | generate `robots.txt`                         |

mod error;

pub use error::ConfigError;

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::logger::log;
use crate::validate::{validate_base_path, validate_domain};

/// Default config file name looked up by the CLI.
pub const CONFIG_FILE: &str = "litepage.toml";

/// Process-wide site configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Bare host, e.g. `catpics.com`
    pub domain: String,

    /// Output directory for static builds
    pub output_dir: PathBuf,

    /// Directory of static assets
    pub assets_dir: PathBuf,

    /// Mount prefix (empty, or `/prefix` without trailing slash)
    pub base_path: String,

    /// Generate `sitemap.xml`
    pub sitemap: bool,

    /// Generate `robots.txt`
    pub robots_txt: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            output_dir: "dist".into(),
            assets_dir: "public".into(),
            base_path: String::new(),
            sitemap: true,
            robots_txt: false,
        }
    }
}

impl SiteConfig {
    /// Configuration for `domain` with every other field at its default.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Self::default()
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = dir.into();
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn without_sitemap(mut self) -> Self {
        self.sitemap = false;
        self
    }

    pub fn with_robots_txt(mut self) -> Self {
        self.robots_txt = true;
        self
    }

    /// Check domain and base path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_domain(&self.domain).map_err(ConfigError::Domain)?;

        if !self.base_path.is_empty() {
            validate_base_path(&self.base_path).map_err(|source| ConfigError::BasePath {
                base_path: self.base_path.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Directory that corresponds to `base_path + "/"` in the built tree.
    ///
    /// `dist` with base path `/blog` -> `dist/blog`
    pub fn site_root(&self) -> PathBuf {
        let prefix = self.base_path.trim_start_matches('/');
        if prefix.is_empty() {
            self.output_dir.clone()
        } else {
            self.output_dir.join(prefix)
        }
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(Self::parse_with_ignored(content)?.0)
    }

    /// Load configuration from a file, warning about unknown fields.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }
}
