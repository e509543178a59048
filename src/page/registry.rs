//! Insertion-ordered page registry.
//!
//! Pages live in a `Vec` (registration order, used for build output and
//! logging) next to a set of their paths for O(1) duplicate checks. An alias
//! index maps every serve alias to the page that claims it, so two pages can
//! never answer the same request path.

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use super::{Page, Render};
use crate::validate::{ValidationError, validate_page_path};

/// Why a page registration was rejected.
///
/// A rejected registration leaves the registry untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("could not add page '{path}': {source}")]
    InvalidPath {
        path: String,
        source: ValidationError,
    },

    #[error("could not add page '{0}', it already exists")]
    Duplicate(String),

    #[error("could not add page '{path}', '{alias}' is already served by '{existing}'")]
    AliasConflict {
        path: String,
        alias: String,
        existing: String,
    },

    #[error("could not add page '{path}', '{route}' is reserved for a generated file")]
    ReservedRoute { path: String, route: String },
}

impl RegistryError {
    /// The validation failure behind an invalid path, if any.
    pub fn validation(&self) -> Option<ValidationError> {
        match self {
            Self::InvalidPath { source, .. } => Some(*source),
            _ => None,
        }
    }
}

/// Ordered collection of registered pages.
#[derive(Debug, Default)]
pub struct PageRegistry {
    base_path: String,
    /// Routes owned by generated documents (sitemap, robots.txt)
    reserved: Vec<String>,
    pages: Vec<Page>,
    paths: FxHashSet<String>,
    /// Serve alias -> index into `pages`
    aliases: FxHashMap<String, usize>,
}

impl PageRegistry {
    /// Create an empty registry for a site mounted at `base_path`.
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            ..Self::default()
        }
    }

    /// Reserve a route for a generated document.
    pub fn reserve(&mut self, route: impl Into<String>) {
        self.reserved.push(route.into());
    }

    /// Validate and append a page.
    pub fn register(&mut self, path: &str, render: Render) -> Result<(), RegistryError> {
        validate_page_path(path).map_err(|source| RegistryError::InvalidPath {
            path: path.to_string(),
            source,
        })?;

        if self.paths.contains(path) {
            return Err(RegistryError::Duplicate(path.to_string()));
        }

        let routes = crate::route::PageRoutes::resolve(path, &self.base_path);
        for alias in &routes.aliases {
            if let Some(route) = self.reserved.iter().find(|r| *r == alias) {
                return Err(RegistryError::ReservedRoute {
                    path: path.to_string(),
                    route: route.clone(),
                });
            }
            if let Some(&owner) = self.aliases.get(alias) {
                return Err(RegistryError::AliasConflict {
                    path: path.to_string(),
                    alias: alias.clone(),
                    existing: self.pages[owner].path.clone(),
                });
            }
        }

        let index = self.pages.len();
        for alias in routes.aliases {
            self.aliases.insert(alias, index);
        }
        self.paths.insert(path.to_string());
        self.pages.push(Page::new(path.to_string(), render));
        Ok(())
    }

    /// Pages in registration order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
