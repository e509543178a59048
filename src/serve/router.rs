//! Dev server route table.
//!
//! Built once from the registry and never mutated afterwards, so request
//! workers share it through an `Arc` without locking. Dispatch order:
//!
//! 1. `base_path + "/"` answers with the root page, if one exists
//! 2. requests outside a non-empty base path get the 404 page
//! 3. exact alias or generated document match
//! 4. static file from the assets directory (base path stripped), else 404

use std::fs;
use std::path::PathBuf;

use rustc_hash::FxHashMap;

use super::Responder;
use super::path::{decode, resolve_asset, strip_query};
use super::response::Reply;
use crate::config::SiteConfig;
use crate::generator::{
    ROBOTS_FILE, SITEMAP_FILE, build_robots, build_sitemap, sitemap_url,
};
use crate::logger::{debug, log};
use crate::page::{Page, PageRegistry};
use crate::route::document_route;
use crate::utils::mime::{self, types};

/// A document generated once at construction and served verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub content_type: &'static str,
    pub body: String,
}

/// Where a request path leads.
#[derive(Debug)]
pub enum Dispatch<'a> {
    Page(&'a Page),
    Document(&'a Document),
    Asset(PathBuf),
    NotFound { outside_base: bool },
}

/// Immutable route table for one site.
#[derive(Debug)]
pub struct Router {
    base_path: String,
    assets_dir: PathBuf,
    pages: Vec<Page>,
    /// Serve alias -> index into `pages`
    routes: FxHashMap<String, usize>,
    root: Option<usize>,
    documents: FxHashMap<String, Document>,
}

impl Router {
    pub fn new(config: &SiteConfig, registry: &PageRegistry) -> Self {
        let base_path = config.base_path.clone();
        let pages = registry.pages().to_vec();

        let mut routes = FxHashMap::default();
        let mut root = None;
        for (index, page) in pages.iter().enumerate() {
            let resolved = page.routes(&base_path);
            if resolved.root {
                root = Some(index);
            }
            debug!("page"; "{} -> {}", page.path(), resolved.aliases.join(", "));
            for alias in resolved.aliases {
                routes.insert(alias, index);
            }
        }

        let mut documents = FxHashMap::default();
        if config.sitemap {
            documents.insert(
                document_route(&base_path, SITEMAP_FILE),
                Document {
                    content_type: types::XML,
                    body: build_sitemap(&config.domain, &base_path, &pages),
                },
            );
        }
        if config.robots_txt {
            let sitemap = config
                .sitemap
                .then(|| sitemap_url(&config.domain, &base_path));
            documents.insert(
                document_route(&base_path, ROBOTS_FILE),
                Document {
                    content_type: types::PLAIN,
                    body: build_robots(sitemap.as_deref()),
                },
            );
        }

        Self {
            base_path,
            assets_dir: config.assets_dir.clone(),
            pages,
            routes,
            root,
            documents,
        }
    }

    /// Resolve a request target (query and fragment allowed) to its handler.
    pub fn dispatch(&self, url: &str) -> Dispatch<'_> {
        let path = strip_query(url);

        if let Some(root) = self.root
            && path.strip_prefix(self.base_path.as_str()) == Some("/")
        {
            return Dispatch::Page(&self.pages[root]);
        }

        let Some(rest) = self.strip_base(path) else {
            return Dispatch::NotFound { outside_base: true };
        };

        if let Some(found) = self.lookup(path) {
            return found;
        }

        let Some(decoded) = decode(rest) else {
            return Dispatch::NotFound {
                outside_base: false,
            };
        };
        if decoded != rest
            && let Some(found) = self.lookup(&format!("{}{decoded}", self.base_path))
        {
            return found;
        }

        match resolve_asset(&decoded, &self.assets_dir) {
            Some(file) => Dispatch::Asset(file),
            None => Dispatch::NotFound {
                outside_base: false,
            },
        }
    }

    /// Dispatch and materialize the response body.
    pub fn respond(&self, url: &str) -> Reply {
        let path = strip_query(url);
        match self.dispatch(url) {
            Dispatch::Page(page) => match page.render_to_vec() {
                Ok(body) => Reply::ok(mime::from_url_path(page.path()), body),
                Err(err) => {
                    log!("error"; "failed to render {}: {}", page.path(), err);
                    Reply::server_error(page.path(), &err)
                }
            },
            Dispatch::Document(doc) => Reply::ok(doc.content_type, doc.body.clone().into_bytes()),
            Dispatch::Asset(file) => match fs::read(&file) {
                Ok(body) => Reply::ok(mime::from_path(&file), body),
                Err(err) => {
                    log!("error"; "failed to read {}: {}", file.display(), err);
                    Reply::server_error(path, &err)
                }
            },
            Dispatch::NotFound { outside_base } => {
                Reply::not_found(path, outside_base.then_some(self.base_path.as_str()))
            }
        }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Number of distinct request paths that reach a page.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Path relative to the base path, or `None` when outside it.
    ///
    /// `/docs` and `/docs/...` are inside `/docs`; `/docsite` is not.
    fn strip_base<'p>(&self, path: &'p str) -> Option<&'p str> {
        if self.base_path.is_empty() {
            return Some(path);
        }
        let rest = path.strip_prefix(self.base_path.as_str())?;
        (rest.is_empty() || rest.starts_with('/')).then_some(rest)
    }

    fn lookup(&self, path: &str) -> Option<Dispatch<'_>> {
        if let Some(&index) = self.routes.get(path) {
            return Some(Dispatch::Page(&self.pages[index]));
        }
        self.documents.get(path).map(Dispatch::Document)
    }
}

impl Responder for Router {
    fn respond(&self, url: &str) -> Reply {
        Router::respond(self, url)
    }
}
