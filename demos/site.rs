//! Demo site: one homepage and one page per cat, fed from JSON.
//!
//! ```sh
//! cargo run --example site                 # build into dist/
//! LP_MODE=serve cargo run --example site   # dev server on :3000
//! cargo run --example site -- --lp-serve --lp-port 8080
//! ```

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use litepage::{Site, SiteConfig};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Homepage {
    title: String,
    header: String,
    subheader: String,
    cats: Vec<Cat>,
}

#[derive(Debug, Clone, Deserialize)]
struct Cat {
    slug: String,
    name: String,
    bio: String,
}

fn main() -> Result<()> {
    let content: Homepage = serde_json::from_str(include_str!("content/homepage.json"))
        .context("could not parse homepage.json")?;
    let content = Arc::new(content);

    let config = SiteConfig::new("example.dev")
        .with_assets_dir("demos/public")
        .with_robots_txt();
    let mut site = Site::new(config)?;

    let home = Arc::clone(&content);
    site.page("/index.html", move |w| {
        writeln!(w, "<!DOCTYPE html><link rel=\"stylesheet\" href=\"/style.css\">")?;
        writeln!(w, "<title>{}</title>", home.title)?;
        writeln!(w, "<h1>{}</h1><p>{}</p><ul>", home.header, home.subheader)?;
        for cat in &home.cats {
            writeln!(w, "<li><a href=\"/cats/{}\">{}</a></li>", cat.slug, cat.name)?;
        }
        write!(w, "</ul>")
    })?;

    for cat in &content.cats {
        let cat = cat.clone();
        site.page(&format!("/cats/{}.html", cat.slug), move |w| {
            write!(w, "<h1>{}</h1><p>{}</p><a href=\"/\">back</a>", cat.name, cat.bio)
        })?;
    }

    let names: Vec<String> = content.cats.iter().map(|cat| cat.name.clone()).collect();
    site.page("/cats.txt", move |w| writeln!(w, "{}", names.join("\n")))?;

    site.run()
}
