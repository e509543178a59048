//! Static build.
//!
//! Phases, each aborting the whole build on failure:
//! - **Clean** - remove the previous output directory
//! - **Assets** - mirror the assets directory into the site root
//! - **Pages** - render every page, in registration order, to its build file
//! - **Documents** - write `sitemap.xml` and `robots.txt` when enabled
//!
//! The site root is `output_dir + base_path`, so the built tree answers the
//! same URLs as the dev server. Partial output is left on disk after a failure.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use jwalk::WalkDir;
use rayon::prelude::*;
use thiserror::Error;

use crate::config::SiteConfig;
use crate::generator::{ROBOTS_FILE, SITEMAP_FILE, build_robots, build_sitemap, sitemap_url};
use crate::logger::{debug, log};
use crate::page::{Page, PageRegistry};
use crate::utils::plural_count;

/// Build failure, tagged with the phase that failed.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("could not remove output directory `{}`", .path.display())]
    Clean {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not copy assets from `{}`", .path.display())]
    CopyAssets {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not create page '{path}'")]
    CreatePage {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("could not write sitemap")]
    WriteSitemap(#[source] io::Error),

    #[error("could not write robots.txt")]
    WriteRobots(#[source] io::Error),
}

/// What a successful build wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub pages: usize,
    pub assets: usize,
    pub sitemap: bool,
    pub robots: bool,
}

/// Materializes a registry as a static file tree.
pub struct Builder<'a> {
    config: &'a SiteConfig,
    registry: &'a PageRegistry,
}

impl<'a> Builder<'a> {
    pub fn new(config: &'a SiteConfig, registry: &'a PageRegistry) -> Self {
        Self { config, registry }
    }

    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let output_dir = &self.config.output_dir;
        let site_root = self.config.site_root();

        clean_output(output_dir)?;

        let assets = copy_assets(&self.config.assets_dir, &site_root).map_err(|source| {
            BuildError::CopyAssets {
                path: self.config.assets_dir.clone(),
                source,
            }
        })?;
        log!("assets"; "copied {}", plural_count(assets, "file"));

        for page in self.registry.pages() {
            write_page(output_dir, self.registry.base_path(), page)?;
        }
        log!("page"; "wrote {}", plural_count(self.registry.len(), "page"));

        let mut report = BuildReport {
            pages: self.registry.len(),
            assets,
            ..BuildReport::default()
        };

        if self.config.sitemap {
            let xml = build_sitemap(
                &self.config.domain,
                &self.config.base_path,
                self.registry.pages(),
            );
            let path = site_root.join(SITEMAP_FILE);
            fs::write(&path, xml).map_err(BuildError::WriteSitemap)?;
            log!("sitemap"; "{}", path.display());
            report.sitemap = true;
        }

        if self.config.robots_txt {
            let sitemap = self
                .config
                .sitemap
                .then(|| sitemap_url(&self.config.domain, &self.config.base_path));
            let path = site_root.join(ROBOTS_FILE);
            fs::write(&path, build_robots(sitemap.as_deref())).map_err(BuildError::WriteRobots)?;
            log!("robots"; "{}", path.display());
            report.robots = true;
        }

        log!("build"; "done, output in {}", output_dir.display());
        Ok(report)
    }
}

/// Remove the output directory, succeeding if it does not exist.
fn clean_output(output_dir: &Path) -> Result<(), BuildError> {
    match fs::remove_dir_all(output_dir) {
        Ok(()) => {
            debug!("build"; "removed {}", output_dir.display());
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(BuildError::Clean {
            path: output_dir.to_path_buf(),
            source,
        }),
    }
}

/// Mirror `assets_dir` into `site_root`, returning the number of files copied.
fn copy_assets(assets_dir: &Path, site_root: &Path) -> io::Result<usize> {
    if !assets_dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("assets directory `{}` does not exist", assets_dir.display()),
        ));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(assets_dir).skip_hidden(false).sort(true) {
        let entry = entry.map_err(io::Error::other)?;
        let source = entry.path();
        let rel = source.strip_prefix(assets_dir).map_err(io::Error::other)?;
        let dest = site_root.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else {
            files.push((source, dest));
        }
    }

    files.par_iter().try_for_each(|(source, dest)| {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source, dest).map(|_| ())
    })?;

    Ok(files.len())
}

/// Render one page to `output_dir + base_path + path`.
fn write_page(output_dir: &Path, base_path: &str, page: &Page) -> Result<(), BuildError> {
    let routes = page.routes(base_path);
    let dest = output_dir.join(routes.file.trim_start_matches('/'));

    render_to_file(page, &dest).map_err(|source| BuildError::CreatePage {
        path: page.path().to_string(),
        source,
    })?;
    debug!("page"; "{} -> {}", page.path(), dest.display());
    Ok(())
}

fn render_to_file(page: &Page, dest: &Path) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(dest)?);
    page.render(&mut writer)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{Render, renderer};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn text(body: &'static str) -> Render {
        renderer(move |w| w.write_all(body.as_bytes()))
    }

    struct Fixture {
        dir: TempDir,
        config: SiteConfig,
    }

    impl Fixture {
        fn new(base_path: &str) -> Self {
            let dir = TempDir::new().unwrap();
            let assets = dir.path().join("public");
            fs::create_dir_all(assets.join("css")).unwrap();
            fs::write(assets.join("testfile.txt"), "Hello from static text file").unwrap();
            fs::write(assets.join("css/site.css"), "body{}").unwrap();

            let config = SiteConfig::new("test.com")
                .with_output_dir(dir.path().join("dist"))
                .with_assets_dir(assets)
                .with_base_path(base_path);
            Self { dir, config }
        }

        fn dist(&self) -> PathBuf {
            self.dir.path().join("dist")
        }

        fn registry(&self) -> PageRegistry {
            let mut registry = PageRegistry::new(self.config.base_path.clone());
            registry.register("/index.html", text("<h1>Index</h1>")).unwrap();
            registry.register("/foo.htm", text("<h1>Foo</h1>")).unwrap();
            registry
                .register("/nested/nested/index.html", text("<h1>Nested</h1>"))
                .unwrap();
            registry.register("/data.txt", text("plain")).unwrap();
            registry
        }
    }

    /// Every file under `root`, relative path -> contents.
    fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
        WalkDir::new(root)
            .skip_hidden(false)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                let path = e.path();
                let rel = path.strip_prefix(root).unwrap().to_path_buf();
                (rel, fs::read(&path).unwrap())
            })
            .collect()
    }

    #[test]
    fn test_build_writes_pages_assets_and_sitemap() {
        let fixture = Fixture::new("");
        let registry = fixture.registry();
        let report = Builder::new(&fixture.config, &registry).build().unwrap();

        assert_eq!(
            report,
            BuildReport {
                pages: 4,
                assets: 2,
                sitemap: true,
                robots: false,
            }
        );

        let dist = fixture.dist();
        assert_eq!(fs::read_to_string(dist.join("index.html")).unwrap(), "<h1>Index</h1>");
        assert_eq!(fs::read_to_string(dist.join("foo.htm")).unwrap(), "<h1>Foo</h1>");
        assert_eq!(
            fs::read_to_string(dist.join("nested/nested/index.html")).unwrap(),
            "<h1>Nested</h1>"
        );
        assert_eq!(fs::read_to_string(dist.join("data.txt")).unwrap(), "plain");
        assert_eq!(
            fs::read_to_string(dist.join("testfile.txt")).unwrap(),
            "Hello from static text file"
        );
        assert!(dist.join("css/site.css").is_file());

        let sitemap = fs::read_to_string(dist.join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("<loc>https://test.com/</loc>"));
        assert!(sitemap.contains("<loc>https://test.com/nested/nested/</loc>"));
        assert!(!sitemap.contains("data"));
        assert!(!dist.join("robots.txt").exists());
    }

    #[test]
    fn test_build_is_idempotent() {
        let fixture = Fixture::new("");
        let registry = fixture.registry();
        let builder = Builder::new(&fixture.config, &registry);

        builder.build().unwrap();
        let first = snapshot(&fixture.dist());

        // stale files from a previous build must not survive
        fs::write(fixture.dist().join("stale.html"), "old").unwrap();

        builder.build().unwrap();
        let second = snapshot(&fixture.dist());

        assert_eq!(first, second);
    }

    #[test]
    fn test_build_with_base_path() {
        let fixture = Fixture::new("/docs");
        let config = fixture.config.clone().with_robots_txt();
        let registry = fixture.registry();
        Builder::new(&config, &registry).build().unwrap();

        let root = fixture.dist().join("docs");
        assert!(root.join("index.html").is_file());
        assert!(root.join("testfile.txt").is_file());
        assert!(!fixture.dist().join("index.html").exists());

        let sitemap = fs::read_to_string(root.join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("<loc>https://test.com/docs/</loc>"));
        assert!(sitemap.contains("<loc>https://test.com/docs/foo</loc>"));

        let robots = fs::read_to_string(root.join("robots.txt")).unwrap();
        assert!(robots.contains("Sitemap: https://test.com/docs/sitemap.xml"));
    }

    #[test]
    fn test_build_without_sitemap() {
        let fixture = Fixture::new("");
        let config = fixture.config.clone().without_sitemap().with_robots_txt();
        let registry = fixture.registry();
        let report = Builder::new(&config, &registry).build().unwrap();

        assert!(!report.sitemap);
        assert!(!fixture.dist().join("sitemap.xml").exists());
        let robots = fs::read_to_string(fixture.dist().join("robots.txt")).unwrap();
        assert!(!robots.contains("Sitemap"));
    }

    #[test]
    fn test_missing_assets_dir_fails() {
        let fixture = Fixture::new("");
        let config = fixture
            .config
            .clone()
            .with_assets_dir(fixture.dir.path().join("missing"));
        let registry = fixture.registry();

        let err = Builder::new(&config, &registry).build().unwrap_err();
        assert!(matches!(err, BuildError::CopyAssets { .. }));
        assert!(!fixture.dist().join("index.html").exists());
    }

    #[test]
    fn test_render_failure_aborts_build() {
        let fixture = Fixture::new("");
        let mut registry = PageRegistry::new("");
        registry.register("/ok.html", text("ok")).unwrap();
        registry
            .register(
                "/broken.html",
                renderer(|_| Err(io::Error::other("template exploded"))),
            )
            .unwrap();
        registry.register("/after.html", text("after")).unwrap();

        let err = Builder::new(&fixture.config, &registry).build().unwrap_err();
        match err {
            BuildError::CreatePage { path, source } => {
                assert_eq!(path, "/broken.html");
                assert_eq!(source.to_string(), "template exploded");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(fixture.dist().join("ok.html").is_file());
        assert!(!fixture.dist().join("after.html").exists());
        assert!(!fixture.dist().join("sitemap.xml").exists());
    }

    #[test]
    fn test_clean_missing_output_is_ok() {
        let dir = TempDir::new().unwrap();
        assert!(clean_output(&dir.path().join("nope")).is_ok());
    }
}
