//! `litepage check`: validate a config file and resolve page paths.

use std::path::Path;

use anyhow::{Context, Result, bail};
use owo_colors::{OwoColorize, Stream};

use crate::config::SiteConfig;
use crate::logger::log;
use crate::route::PageRoutes;
use crate::utils::plural_count;
use crate::validate::validate_page_path;

pub fn run_check(config_path: &Path, paths: &[String]) -> Result<()> {
    let config = SiteConfig::from_path(config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config in {}", config_path.display()))?;

    log!("check"; "{} is valid", config_path.display());
    log!(
        "check";
        "domain {}, output {}, assets {}, base path '{}'",
        config.domain,
        config.output_dir.display(),
        config.assets_dir.display(),
        config.base_path
    );

    let mut invalid = 0;
    for path in paths {
        match validate_page_path(path) {
            Ok(()) => print_routes(&PageRoutes::resolve(path, &config.base_path), &config),
            Err(err) => {
                invalid += 1;
                log!("error"; "{}: {}", path, err);
            }
        }
    }

    if invalid > 0 {
        bail!("{} rejected", plural_count(invalid, "page path"));
    }
    Ok(())
}

fn print_routes(routes: &PageRoutes, config: &SiteConfig) {
    println!(
        "{}",
        routes.file.if_supports_color(Stream::Stdout, |f| f.bold())
    );
    for alias in &routes.aliases {
        println!("  serve    {alias}");
    }
    if let Some(url) = routes.sitemap_url(&config.domain) {
        println!(
            "  sitemap  {}",
            url.if_supports_color(Stream::Stdout, |u| u.dimmed())
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(content: &str) -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("litepage.toml");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_check_valid_config() {
        let (_dir, path) = write_config("domain = \"catpics.com\"\nbase_path = \"/blog\"\n");
        run_check(&path, &["/index.html".to_string(), "/feed.xml".to_string()]).unwrap();
    }

    #[test]
    fn test_check_rejects_bad_domain() {
        let (_dir, path) = write_config("domain = \"not a domain\"\n");
        let err = run_check(&path, &[]).unwrap_err();
        assert!(format!("{err:#}").contains("domain"));
    }

    #[test]
    fn test_check_reports_bad_paths() {
        let (_dir, path) = write_config("domain = \"catpics.com\"\n");
        let err = run_check(&path, &["/ok.html".to_string(), "/noext".to_string()]).unwrap_err();
        assert!(err.to_string().contains("1 page path rejected"));
    }
}
