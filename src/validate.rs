//! Syntactic validation for domains, page paths and base paths.
//!
//! All checks are pure and run when a site is configured or a page is
//! registered. Nothing that fails here ever reaches route resolution.

use std::path::Path;

use thiserror::Error;
use url::Url;

/// Why a domain, page path or base path was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("domain cannot be empty, provide a domain like 'catpics.com'")]
    DomainEmpty,

    #[error("domain is invalid, check it does not include a scheme, path, spaces or illegal characters")]
    DomainInvalid,

    #[error("path must start with '/'")]
    PathMustStartWithSlash,

    #[error("path contains invalid characters")]
    PathInvalidCharacters,

    #[error("path contains illegal '..' for directory traversal")]
    PathDirTraversal,

    #[error("path must end with a file extension e.g. '.html'")]
    PathMissingExtension,

    #[error("base path is invalid, check it does not include spaces or illegal characters")]
    BasePathInvalid,

    #[error("base path should not have a trailing slash '/'")]
    BasePathTrailingSlash,
}

/// Check that `domain` is a bare host such as `example.com`.
///
/// The domain is parsed as the host of `https://{domain}/` and must come
/// back unchanged, so schemes, paths, ports, queries, spaces and anything the
/// URL parser would normalize (uppercase, IDN) are rejected.
pub fn validate_domain(domain: &str) -> Result<(), ValidationError> {
    if domain.is_empty() {
        return Err(ValidationError::DomainEmpty);
    }

    let expected = format!("https://{domain}/");
    match Url::parse(&expected) {
        Ok(url) if url.as_str() == expected && url.host_str() == Some(domain) => Ok(()),
        _ => Err(ValidationError::DomainInvalid),
    }
}

/// Check that `path` is a canonical page path such as `/blog/index.html`.
pub fn validate_page_path(path: &str) -> Result<(), ValidationError> {
    check_url_path(path).map_err(|err| match err {
        PathFault::NoLeadingSlash => ValidationError::PathMustStartWithSlash,
        PathFault::Traversal => ValidationError::PathDirTraversal,
        PathFault::Characters => ValidationError::PathInvalidCharacters,
    })?;

    match extension_of(path) {
        Some(_) => Ok(()),
        None => Err(ValidationError::PathMissingExtension),
    }
}

/// Check that `base_path` is a mount prefix such as `/docs`.
///
/// An empty base path means "mounted at the root" and is handled by the
/// configuration layer without calling this function.
pub fn validate_base_path(base_path: &str) -> Result<(), ValidationError> {
    check_url_path(base_path).map_err(|err| match err {
        PathFault::NoLeadingSlash => ValidationError::PathMustStartWithSlash,
        PathFault::Traversal => ValidationError::PathDirTraversal,
        PathFault::Characters => ValidationError::BasePathInvalid,
    })?;

    if base_path.ends_with('/') {
        return Err(ValidationError::BasePathTrailingSlash);
    }
    Ok(())
}

/// Non-empty file extension of the last path segment, without the dot.
///
/// `/a/index.html` -> `Some("html")`, `/a/index` -> `None`, `/a/.env` -> `None`
pub(crate) fn extension_of(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next().unwrap_or(path);
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
}

// ============================================================================
// Shared URL path rules
// ============================================================================

enum PathFault {
    NoLeadingSlash,
    Traversal,
    Characters,
}

fn check_url_path(path: &str) -> Result<(), PathFault> {
    if !path.starts_with('/') {
        return Err(PathFault::NoLeadingSlash);
    }
    if path.split('/').any(|segment| segment == "..") {
        return Err(PathFault::Traversal);
    }
    if !has_valid_escapes(path) || !survives_url_round_trip(path) {
        return Err(PathFault::Characters);
    }
    Ok(())
}

/// Join the path onto a dummy origin and require the parser to keep it as-is.
fn survives_url_round_trip(path: &str) -> bool {
    let Ok(base) = Url::parse("http://localhost/") else {
        return false;
    };
    match base.join(path) {
        Ok(url) => {
            url.host_str() == Some("localhost")
                && url.path() == path
                && url.query().is_none()
                && url.fragment().is_none()
        }
        Err(_) => false,
    }
}

/// Every `%` must start a two-digit hex escape.
fn has_valid_escapes(path: &str) -> bool {
    let bytes = path.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}
