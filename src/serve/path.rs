//! Request path to asset file resolution.

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

/// Strip query string and fragment from a request target.
pub fn strip_query(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

/// Percent-decode a request path, `None` if it is not valid UTF-8.
pub fn decode(path: &str) -> Option<String> {
    percent_decode_str(path)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

/// Resolve a decoded, base-stripped request path to a file under `root`.
///
/// Directories resolve to their `index.html`. Anything that escapes `root`,
/// through `..` or a symlink, resolves to nothing.
pub fn resolve_asset(path: &str, root: &Path) -> Option<PathBuf> {
    let clean = path.trim_matches('/');
    if clean.split('/').any(|segment| segment == "..") || clean.contains('\\') {
        return None;
    }

    let canonical = root.join(clean).canonicalize().ok()?;
    let root_canonical = root.canonicalize().ok()?;
    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    if canonical.is_file() {
        return Some(canonical);
    }

    if canonical.is_dir() {
        let index = canonical.join("index.html");
        if index.is_file() {
            return Some(index);
        }
    }

    None
}
