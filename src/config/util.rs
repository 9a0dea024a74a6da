//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
///
/// # Example
/// ```text
/// /srv/site/public/blog/   ← cwd
/// /srv/site/lazyload.toml  ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_from(&cwd, config_name)
}

/// Upward search starting at `start`.
pub fn find_config_from(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

/// Check that `value` is usable as an `src` reference.
///
/// Accepts absolute URLs (`https://cdn/x.js`) and relative references
/// (`/images/loading.gif`, `img/x.gif`). Uses the `url` crate for absolute
/// forms, so malformed hosts or ports are rejected.
pub fn check_url_reference(value: &str) -> Result<(), String> {
    if value.chars().any(char::is_whitespace) {
        return Err("must not contain whitespace".to_string());
    }
    if value.contains(['"', '<', '>']) {
        return Err("must not contain quotes or angle brackets".to_string());
    }

    match url::Url::parse(value) {
        Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) => Ok(()),
        Err(err) => Err(format!("invalid URL: {err}")),
    }
}

// ============================================================================
// tests
// ============================================================================
