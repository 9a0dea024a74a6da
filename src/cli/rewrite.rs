//! Single-document rewriting.
//!
//! Reads one HTML document from a file or stdin, runs the plugin lifecycle
//! over it and writes the result to a file or stdout.

use crate::{
    config::LazyloadConfig,
    debug,
    pipeline::RewriteStats,
    plugin::{LazyLoadPlugin, PageHost},
};
use anyhow::{Context, Result};
use std::{
    fs,
    io::{self, Read, Write},
    path::Path,
};

/// Rewrite `input` (stdin when `None` or `-`) into `output` (stdout when `None`).
pub fn rewrite_document(
    input: Option<&Path>,
    output: Option<&Path>,
    config: &LazyloadConfig,
) -> Result<()> {
    let html = read_input(input)?;
    let plugin = LazyLoadPlugin::from_config(&config.lazyload);

    let (html, stats) = rewrite_text(html, &plugin)?;
    debug!(
        "rewrite";
        "{} images, {} rewritten, {} skipped",
        stats.images,
        stats.rewritten,
        stats.skipped
    );

    match output {
        Some(path) => {
            fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Run the full page lifecycle over a site-facing HTML document.
fn rewrite_text(html: String, plugin: &LazyLoadPlugin) -> Result<(String, RewriteStats)> {
    let mut host = PageHost::new(html);
    let stats = host.render(plugin)?.unwrap_or_default();
    Ok((host.into_body(), stats))
}

/// Invalid UTF-8 sequences are replaced rather than rejected.
fn read_input(input: Option<&Path>) -> Result<String> {
    let mut bytes = Vec::new();
    match input {
        Some(path) if path != Path::new("-") => {
            bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        }
        _ => {
            io::stdin()
                .lock()
                .read_to_end(&mut bytes)
                .context("failed to read stdin")?;
        }
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
