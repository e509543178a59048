//! The `Site` facade: register pages once, then build or serve them.
//!
//! ```no_run
//! use std::io::Write;
//! use litepage::{Site, SiteConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut site = Site::new(SiteConfig::new("catpics.com"))?;
//!     site.page("/index.html", |w| write!(w, "<h1>Cats</h1>"))?;
//!     site.run()
//! }
//! ```

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;

use crate::build::{BuildError, BuildReport, Builder};
use crate::cli::{self, Mode, RunArgs};
use crate::config::{ConfigError, SiteConfig};
use crate::generator::{ROBOTS_FILE, SITEMAP_FILE};
use crate::logger::log;
use crate::page::{Page, PageRegistry, RegistryError, renderer};
use crate::route::document_route;
use crate::serve::{self, DEFAULT_PORT, Router, ServeError};

/// A validated configuration plus its registered pages.
#[derive(Debug)]
pub struct Site {
    config: SiteConfig,
    registry: PageRegistry,
}

impl Site {
    /// Validate `config` and create an empty site.
    pub fn new(config: SiteConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut registry = PageRegistry::new(config.base_path.clone());
        if config.sitemap {
            registry.reserve(document_route(&config.base_path, SITEMAP_FILE));
        }
        if config.robots_txt {
            registry.reserve(document_route(&config.base_path, ROBOTS_FILE));
        }

        Ok(Self { config, registry })
    }

    /// Register a page rendered by `render`.
    ///
    /// A rejected page leaves earlier registrations untouched.
    pub fn page<F>(&mut self, path: &str, render: F) -> Result<(), RegistryError>
    where
        F: Fn(&mut dyn Write) -> io::Result<()> + Send + Sync + 'static,
    {
        self.registry.register(path, renderer(render))
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Registered pages in registration order.
    pub fn pages(&self) -> &[Page] {
        self.registry.pages()
    }

    /// Write every page, the assets and the generated documents to disk.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        Builder::new(&self.config, &self.registry).build()
    }

    /// Route table for the dev server.
    pub fn router(&self) -> Router {
        Router::new(&self.config, &self.registry)
    }

    /// Serve on `localhost:{port}` (default 3000) until interrupted.
    pub fn serve(&self, port: Option<u16>) -> Result<(), ServeError> {
        let addr = format!("localhost:{}", port.unwrap_or(DEFAULT_PORT));
        let server = serve::bind(&addr, self.router())?;

        log!("serve"; "http://{}{}/", addr, self.config.base_path);
        for page in self.pages() {
            log!("serve"; "- {}", page.path());
        }
        server.run()
    }

    /// Build or serve, with mode and port already resolved.
    pub fn build_or_serve(&self, mode: Mode, port: Option<u16>) -> Result<()> {
        match mode {
            Mode::Build => {
                self.build().context("build failed")?;
                Ok(())
            }
            Mode::Serve => self.serve(port).context("dev server failed"),
        }
    }

    /// Build or serve as selected by `--lp-serve`/`--lp-port` or
    /// `LP_MODE`/`LP_PORT`.
    pub fn run(&self) -> Result<()> {
        self.run_with(RunArgs::parse())
    }

    /// Like [`Site::run`], with the serve and port flags renamed, e.g.
    /// `run_with_flags("serve", "port")` for `--serve --port 8080`.
    pub fn run_with_flags(&self, serve_flag: &str, port_flag: &str) -> Result<()> {
        self.run_with(RunArgs::parse_with_flags(serve_flag, port_flag))
    }

    pub fn run_with(&self, args: RunArgs) -> Result<()> {
        cli::apply_output_flags(args.color, args.verbose);
        self.build_or_serve(args.mode(), args.port)
    }
}
