//! Static preview of a built output directory.
//!
//! Answers the way a plain static host would: files by name, directories by
//! their `index.html`, and extensionless requests by the matching `.html` or
//! `.htm` file, so a built tree answers the same URLs as the dev server.

use std::fs;
use std::path::PathBuf;

use super::Responder;
use super::path::{decode, resolve_asset, strip_query};
use super::response::Reply;
use crate::logger::log;
use crate::route::HTML_EXTENSIONS;
use crate::utils::mime;

/// Serves files from a built site.
#[derive(Debug, Clone)]
pub struct Preview {
    root: PathBuf,
    base_path: String,
}

impl Preview {
    /// Serve `output_dir` (the whole build output, base path included).
    pub fn new(output_dir: impl Into<PathBuf>, base_path: impl Into<String>) -> Self {
        Self {
            root: output_dir.into(),
            base_path: base_path.into(),
        }
    }

    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let decoded = decode(path)?;
        if let Some(file) = resolve_asset(&decoded, &self.root) {
            return Some(file);
        }
        if decoded.ends_with('/') {
            return None;
        }
        HTML_EXTENSIONS
            .iter()
            .find_map(|ext| resolve_asset(&format!("{decoded}.{ext}"), &self.root))
    }
}

impl Responder for Preview {
    fn respond(&self, url: &str) -> Reply {
        let path = strip_query(url);
        let outside_base = !self.base_path.is_empty()
            && path
                .strip_prefix(self.base_path.as_str())
                .is_none_or(|rest| !(rest.is_empty() || rest.starts_with('/')));
        if outside_base {
            return Reply::not_found(path, Some(&self.base_path));
        }

        let Some(file) = self.resolve(path) else {
            return Reply::not_found(path, None);
        };
        match fs::read(&file) {
            Ok(body) => Reply::ok(mime::from_path(&file), body),
            Err(err) => {
                log!("error"; "failed to read {}: {}", file.display(), err);
                Reply::server_error(path, &err)
            }
        }
    }
}
