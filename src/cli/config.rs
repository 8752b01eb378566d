//! `socv3 config`: show the effective configuration or write a starter file

use crate::config::SocConfig;
use crate::Result;
use anyhow::Context;
use colored::Colorize;
use std::path::{Path, PathBuf};

fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
    path.map(Path::to_path_buf)
        .or_else(SocConfig::default_path)
        .context("Could not find a config directory; pass --config")
}

/// Write the default configuration to `path` (or the default location).
/// An existing file is left alone unless `force` is set.
pub fn init(path: Option<&Path>, force: bool) -> Result<PathBuf> {
    let path = resolve_path(path)?;
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    SocConfig::default().save(&path)?;
    Ok(path)
}

pub fn run(config: &SocConfig, path: Option<&Path>, write: bool, force: bool) -> Result<()> {
    if write {
        let path = init(path, force)?;
        println!("{}", format!("✓ Wrote {}", path.display()).green());
        return Ok(());
    }

    let path = resolve_path(path)?;
    let state = if path.exists() { "" } else { " (not created, defaults)" };
    println!("{}", format!("# {}{}", path.display(), state).bright_black());
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
