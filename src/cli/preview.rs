//! `litepage preview`: serve a built output directory.

use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::logger::log;
use crate::serve::{self, DEFAULT_PORT, Preview};
use crate::validate::validate_base_path;

pub fn run_preview(dir: &Path, port: Option<u16>, base_path: &str) -> Result<()> {
    if !dir.is_dir() {
        bail!("output directory `{}` does not exist, build the site first", dir.display());
    }
    if !base_path.is_empty() {
        validate_base_path(base_path)
            .with_context(|| format!("invalid base path '{base_path}'"))?;
    }

    let addr = format!("localhost:{}", port.unwrap_or(DEFAULT_PORT));
    let server = serve::bind(&addr, Preview::new(dir, base_path))?;

    log!("serve"; "previewing {} at http://{}{}/", dir.display(), addr, base_path);
    server.run()?;
    Ok(())
}
