//! Whole-site rewriting.
//!
//! Walks a built site, runs the plugin lifecycle over every HTML page in
//! parallel and writes results back in place. Pages are classified by their
//! site-relative path, so pages under `[site] admin` are left untouched.
//!
//! Pages that already end with the loader init script were processed by an
//! earlier run and are skipped, which makes the command safe to repeat.

use crate::{
    config::LazyloadConfig,
    debug, log,
    logger::ProgressLine,
    pipeline::{RewriteStats, has_init_script},
    plugin::{DocumentKind, LazyLoadPlugin, PageHost},
    utils::plural_count,
};
use anyhow::{Context, Result, bail};
use jwalk::WalkDir;
use parking_lot::Mutex;
use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// What happened to one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageOutcome {
    Rewritten(RewriteStats),
    /// Already carries the init script.
    AlreadyDone,
    /// Admin page.
    Ineligible,
}

/// Totals over a site run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SiteSummary {
    pub pages: usize,
    pub rewritten: usize,
    pub already_done: usize,
    pub ineligible: usize,
    pub images: usize,
    pub images_rewritten: usize,
}

impl SiteSummary {
    fn record(&mut self, outcome: PageOutcome) {
        self.pages += 1;
        match outcome {
            PageOutcome::Rewritten(stats) => {
                self.rewritten += 1;
                self.images += stats.images;
                self.images_rewritten += stats.rewritten;
            }
            PageOutcome::AlreadyDone => self.already_done += 1,
            PageOutcome::Ineligible => self.ineligible += 1,
        }
    }
}

/// Rewrite every HTML page under `dir`.
///
/// Failing pages are logged and the run continues; the command fails at the
/// end if any page failed.
pub fn rewrite_site(dir: &Path, config: &LazyloadConfig, dry: bool) -> Result<SiteSummary> {
    if !dir.is_dir() {
        bail!("site directory `{}` does not exist", dir.display());
    }

    let pages = collect_pages(dir);
    log!("site"; "found {} in {}", plural_count(pages.len(), "page"), dir.display());

    let plugin = LazyLoadPlugin::from_config(&config.lazyload);
    let progress = (!pages.is_empty()).then(|| ProgressLine::new("site", &[("pages", pages.len())]));
    let failures = Mutex::new(Vec::new());

    let outcomes: Vec<PageOutcome> = pages
        .par_iter()
        .filter_map(|path| {
            let result = process_page(dir, path, &plugin, config, dry);
            if let Some(p) = &progress {
                p.inc("pages");
            }
            match result {
                Ok(outcome) => Some(outcome),
                Err(err) => {
                    failures.lock().push((path.clone(), err));
                    None
                }
            }
        })
        .collect();

    if let Some(p) = progress {
        p.finish();
    }

    let mut summary = SiteSummary::default();
    for outcome in outcomes {
        summary.record(outcome);
    }
    log_summary(&summary, dry);

    let failures = failures.into_inner();
    if !failures.is_empty() {
        for (path, err) in &failures {
            log!("error"; "{}: {:#}", path.display(), err);
        }
        bail!("failed to rewrite {}", plural_count(failures.len(), "page"));
    }

    Ok(summary)
}

/// Collect all HTML files under `dir`.
fn collect_pages(dir: &Path) -> Vec<PathBuf> {
    let mut pages: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|path| DocumentKind::from_path(path) == DocumentKind::Html)
        .collect();
    pages.sort();
    pages
}

fn process_page(
    root: &Path,
    path: &Path,
    plugin: &LazyLoadPlugin,
    config: &LazyloadConfig,
    dry: bool,
) -> Result<PageOutcome> {
    let body = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let body = String::from_utf8_lossy(&body).into_owned();

    if has_init_script(&body) {
        debug!("site"; "already processed: {}", path.display());
        return Ok(PageOutcome::AlreadyDone);
    }

    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut host = PageHost::for_site_path(relative, body, &config.site.admin);

    let Some(stats) = host.render(plugin)? else {
        debug!("site"; "admin page: {}", relative.display());
        return Ok(PageOutcome::Ineligible);
    };

    if !dry {
        fs::write(path, host.into_body())
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(PageOutcome::Rewritten(stats))
}

fn log_summary(summary: &SiteSummary, dry: bool) {
    let verb = if dry { "would rewrite" } else { "rewrote" };
    log!(
        "site";
        "{} {} ({} of {})",
        verb,
        plural_count(summary.rewritten, "page"),
        summary.images_rewritten,
        plural_count(summary.images, "image")
    );
    if summary.already_done > 0 {
        log!("site"; "{} already processed", plural_count(summary.already_done, "page"));
    }
    if summary.ineligible > 0 {
        log!("site"; "{} left untouched", plural_count(summary.ineligible, "admin page"));
    }
}
