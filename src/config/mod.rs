//! Configuration for `lazyload.toml`.
//!
//! # Sections
//!
//! | Section      | Purpose                                        |
//! |--------------|------------------------------------------------|
//! | `[lazyload]` | Placeholder image and client script URLs       |
//! | `[site]`     | Built-site layout (admin area prefixes)        |
//!
//! A missing config file is not an error: defaults apply and every value can
//! be given on the command line instead.

mod error;
mod util;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};

use crate::cli::{Cli, UrlArgs};
use crate::{debug, log};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Component, Path, PathBuf},
};
use util::{check_url_reference, find_config_file};

/// Default location of the admin area in a built site.
const DEFAULT_ADMIN_DIR: &str = "administrator";

// ============================================================================
// sections
// ============================================================================

/// `[lazyload]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LazyloadSection {
    /// Image shown until the real source is loaded.
    pub placeholder_url: String,

    /// URL of the lazy-load client library.
    pub script_url: String,
}

/// `[site]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    /// Site-relative directories whose pages belong to the admin area.
    pub admin: Vec<PathBuf>,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            admin: vec![PathBuf::from(DEFAULT_ADMIN_DIR)],
        }
    }
}

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing lazyload.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LazyloadConfig {
    /// Absolute path to the config file, empty when none was found
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub lazyload: LazyloadSection,

    #[serde(default)]
    pub site: SiteSection,
}

impl LazyloadConfig {
    /// Load configuration for a rewrite or site command.
    ///
    /// Searches upward from cwd for the config file, then applies URL
    /// overrides from the command line and validates the result.
    pub fn load(cli: &Cli, overrides: &UrlArgs) -> Result<Self, ConfigError> {
        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                debug!("config"; "using {}", path.display());
                let mut config = Self::from_path(&path)?;
                config.config_path = path;
                config
            }
            None => {
                debug!("config"; "{} not found, using defaults", cli.config.display());
                Self::default()
            }
        };

        config.apply_url_args(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    /// Starter configuration written by `lazyload init`.
    pub fn template() -> Self {
        Self {
            config_path: PathBuf::new(),
            lazyload: LazyloadSection {
                placeholder_url: "/images/loading.gif".to_string(),
                script_url: "https://cdn.jsdelivr.net/npm/vanilla-lazyload@19.1.3/dist/lazyload.min.js"
                    .to_string(),
            },
            site: SiteSection::default(),
        }
    }

    /// Serialize as pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Command-line URLs win over the file.
    pub fn apply_url_args(&mut self, args: &UrlArgs) {
        Self::update_option(&mut self.lazyload.placeholder_url, args.placeholder.as_ref());
        Self::update_option(&mut self.lazyload.script_url, args.script_url.as_ref());
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate the merged configuration.
    ///
    /// Collects all errors and reports them at once; warnings are printed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let diag = self.diagnostics();
        diag.print_warnings();
        diag.into_result().map_err(ConfigError::Diagnostics)
    }

    fn diagnostics(&self) -> ConfigDiagnostics {
        let mut diag = ConfigDiagnostics::new();
        let section = &self.lazyload;

        if section.script_url.trim().is_empty() {
            diag.error_with_hint(
                "lazyload.script_url",
                "is required",
                "set it in lazyload.toml or pass --script-url",
            );
        } else if let Err(reason) = check_url_reference(&section.script_url) {
            diag.error("lazyload.script_url", reason);
        }

        if section.placeholder_url.is_empty() {
            diag.warn(
                "lazyload.placeholder_url",
                "is empty, images render blank until loaded",
            );
        } else if let Err(reason) = check_url_reference(&section.placeholder_url) {
            diag.error("lazyload.placeholder_url", reason);
        }

        for dir in &self.site.admin {
            if dir.is_absolute() {
                diag.error_with_hint(
                    "site.admin",
                    format!("`{}` must be relative to the site root", dir.display()),
                    format!("use `{}`", DEFAULT_ADMIN_DIR),
                );
            } else if dir.components().all(|c| matches!(c, Component::CurDir)) {
                diag.error(
                    "site.admin",
                    format!("`{}` would mark every page as admin", dir.display()),
                );
            }
        }

        diag
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> LazyloadConfig {
        LazyloadConfig::from_str(
            "[lazyload]\nplaceholder_url = \"/loading.gif\"\nscript_url = \"/js/lazyload.min.js\"",
        )
        .unwrap()
    }

    #[test]
    fn test_from_str_invalid_toml() {
        let result = LazyloadConfig::from_str("[lazyload\nscript_url = \"x\"");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_defaults() {
        let config = LazyloadConfig::from_str("").unwrap();
        assert_eq!(config.lazyload, LazyloadSection::default());
        assert_eq!(config.site.admin, vec![PathBuf::from("administrator")]);
        assert_eq!(config.config_path, PathBuf::new());
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config = LazyloadConfig::from_str("[lazyload]\nscript_url = \"/x.js\"").unwrap();
        assert_eq!(config.lazyload.script_url, "/x.js");
        assert_eq!(config.lazyload.placeholder_url, "");
        assert_eq!(config.site, SiteSection::default());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[lazyload]\nscript_url = \"/x.js\"\nthreshold = 300\n[unknown_section]\nfield = 1";
        let (config, ignored) = LazyloadConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.lazyload.script_url, "/x.js");
        assert!(ignored.iter().any(|f| f.contains("threshold")));
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let content = "[lazyload]\nscript_url = \"/x.js\"\n[site]\nadmin = [\"admin\"]";
        let (_, ignored) = LazyloadConfig::parse_with_ignored(content).unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_url_args_override_file() {
        let mut config = valid();
        config.apply_url_args(&UrlArgs {
            placeholder: None,
            script_url: Some("https://cdn.example.com/lazyload.js".to_string()),
        });
        assert_eq!(config.lazyload.placeholder_url, "/loading.gif");
        assert_eq!(config.lazyload.script_url, "https://cdn.example.com/lazyload.js");
    }

    #[test]
    fn test_validate_ok() {
        assert!(valid().validate().is_ok());
        assert!(LazyloadConfig::template().validate().is_ok());
    }

    #[test]
    fn test_validate_missing_script_url() {
        let config = LazyloadConfig::from_str("[lazyload]\nplaceholder_url = \"/l.gif\"").unwrap();
        let diag = config.diagnostics();
        assert_eq!(diag.errors().len(), 1);
        assert_eq!(diag.errors()[0].field, "lazyload.script_url");
        assert!(diag.errors()[0].hint.is_some());
        assert!(matches!(config.validate(), Err(ConfigError::Diagnostics(_))));
    }

    #[test]
    fn test_validate_empty_placeholder_is_warning() {
        let config = LazyloadConfig::from_str("[lazyload]\nscript_url = \"/x.js\"").unwrap();
        let diag = config.diagnostics();
        assert!(!diag.has_errors());
        assert_eq!(diag.warnings().len(), 1);
        assert_eq!(diag.warnings()[0].field, "lazyload.placeholder_url");
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let config = LazyloadConfig::from_str(
            "[lazyload]\nplaceholder_url = \"/load ing.gif\"\nscript_url = \"https://exa mple.com/x.js\"\n[site]\nadmin = [\"/abs/admin\", \"ok\"]",
        )
        .unwrap();
        let fields: Vec<_> = config.diagnostics().errors().iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["lazyload.script_url", "lazyload.placeholder_url", "site.admin"]
        );
    }

    #[test]
    fn test_validate_admin_entries() {
        let config = LazyloadConfig::from_str(
            "[lazyload]\nscript_url = \"/x.js\"\n[site]\nadmin = [\"./administrator\", \".\", \"\"]",
        )
        .unwrap();
        let errors = config.diagnostics();
        let messages: Vec<_> = errors.errors().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages.len(), 2, "{messages:?}");
        assert!(messages.iter().all(|m| m.contains("every page")));
    }

    #[test]
    fn test_template_round_trips_through_toml() {
        let text = LazyloadConfig::template().to_toml().unwrap();
        assert!(text.contains("[lazyload]"));
        assert!(text.contains("[site]"));
        assert!(!text.contains("config_path"));

        let parsed = LazyloadConfig::from_str(&text).unwrap();
        assert_eq!(parsed.lazyload, LazyloadConfig::template().lazyload);
        assert_eq!(parsed.site, SiteSection::default());
    }
}
