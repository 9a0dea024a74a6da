//! Config file initialization.

use crate::{config::LazyloadConfig, log};
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Write a starter config to `path`.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn write_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "`{}` already exists, pass --force to overwrite",
            path.display()
        );
    }

    let content = LazyloadConfig::template().to_toml()?;
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;

    log!("init"; "wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_config_creates_valid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lazyload.toml");
        write_config(&path, false).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let config = LazyloadConfig::from_str(&content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.lazyload, LazyloadConfig::template().lazyload);
    }

    #[test]
    fn test_write_config_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lazyload.toml");
        fs::write(&path, "# mine").unwrap();

        let err = write_config(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "# mine");
    }

    #[test]
    fn test_write_config_force_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lazyload.toml");
        fs::write(&path, "# mine").unwrap();

        write_config(&path, true).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("[lazyload]"));
    }
}
