//! Pages: a canonical path plus the capability that renders it.

mod registry;

pub use registry::{PageRegistry, RegistryError};

use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use crate::route::PageRoutes;

/// Render capability: writes the page body into any sink.
///
/// Shared between the registry and the dev-server route table, so it must be
/// callable from several request threads at once.
pub type Render = Arc<dyn Fn(&mut dyn Write) -> io::Result<()> + Send + Sync>;

/// Wrap a closure as a [`Render`] capability.
pub fn renderer<F>(f: F) -> Render
where
    F: Fn(&mut dyn Write) -> io::Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A registered page.
#[derive(Clone)]
pub struct Page {
    path: String,
    render: Render,
}

impl Page {
    pub(crate) fn new(path: String, render: Render) -> Self {
        Self { path, render }
    }

    /// Canonical page path, e.g. `/blog/index.html`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Render the page into `sink`.
    pub fn render(&self, sink: &mut dyn Write) -> io::Result<()> {
        (self.render)(sink)
    }

    /// Render the page into a fresh buffer.
    pub fn render_to_vec(&self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.render(&mut buf)?;
        Ok(buf)
    }

    /// Build file, serve aliases and sitemap URL for this page.
    pub fn routes(&self, base_path: &str) -> PageRoutes {
        PageRoutes::resolve(&self.path, base_path)
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page").field("path", &self.path).finish_non_exhaustive()
    }
}
