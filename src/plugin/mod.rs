//! Lazy-load plugin.
//!
//! Hooks two host lifecycle events:
//! - `on_before_compile_head`: registers the external lazy-load client script
//! - `on_after_render`: rewrites `<img>` elements in the rendered page
//!
//! The host is reached only through two narrow traits, `DocumentTextSource`
//! and `ScriptAssetRegistrar`, so the plugin carries no framework types.
//! `PageHost` is the in-memory host used by the CLI.

mod error;
mod host;

use std::path::Path;

use crate::config::LazyloadSection;
use crate::pipeline::{RewriteStats, rewrite_with_stats};

pub use error::PluginError;
pub use host::{PageHost, ScriptAsset};

/// Asset name under which the client script is registered.
pub const SCRIPT_ASSET_NAME: &str = "plg-lazyload-js";

// =============================================================================
// Host collaborators
// =============================================================================

/// Application area a document is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Client {
    /// Public, site-facing pages.
    Site,
    /// Administration area. Never transformed.
    Admin,
}

/// Content kind of the rendered response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Html,
    Other,
}

impl DocumentKind {
    /// Detect document kind from file extension.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" => Self::Html,
            _ => Self::Other,
        }
    }

    /// Detect document kind from file path.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map_or(Self::Other, Self::from_extension)
    }
}

/// Read access to the rendered document, plus write-back of the result.
pub trait DocumentTextSource {
    fn client(&self) -> Client;

    fn document_kind(&self) -> DocumentKind;

    /// Current response body.
    fn body(&self) -> &str;

    /// Replace the response body.
    fn set_body(&mut self, body: String);

    /// Only site-facing HTML documents are transformed.
    fn is_eligible(&self) -> bool {
        self.client() == Client::Site && self.document_kind() == DocumentKind::Html
    }
}

/// Host facility that references script assets from the page head.
pub trait ScriptAssetRegistrar {
    fn register_script(&mut self, name: &str, url: &str);
}

// =============================================================================
// Plugin
// =============================================================================

/// Lazy-load plugin configured with placeholder and client script URLs
#[derive(Debug, Clone, Default)]
pub struct LazyLoadPlugin {
    placeholder_url: String,
    script_url: String,
}

impl LazyLoadPlugin {
    pub fn new(placeholder_url: impl Into<String>, script_url: impl Into<String>) -> Self {
        Self {
            placeholder_url: placeholder_url.into(),
            script_url: script_url.into(),
        }
    }

    pub fn from_config(section: &LazyloadSection) -> Self {
        Self::new(&section.placeholder_url, &section.script_url)
    }

    /// Register the lazy-load client script.
    ///
    /// Returns `Ok(false)` when the document is not eligible.
    pub fn on_before_compile_head<H>(&self, host: &mut H) -> Result<bool, PluginError>
    where
        H: DocumentTextSource + ScriptAssetRegistrar,
    {
        if !host.is_eligible() {
            return Ok(false);
        }
        if self.script_url.trim().is_empty() {
            return Err(PluginError::InvalidArgument { name: "script_url" });
        }

        host.register_script(SCRIPT_ASSET_NAME, &self.script_url);
        Ok(true)
    }

    /// Rewrite images in the rendered body and hand the result back.
    ///
    /// Returns `None` when the document is not eligible.
    pub fn on_after_render<H: DocumentTextSource>(&self, host: &mut H) -> Option<RewriteStats> {
        if !host.is_eligible() {
            return None;
        }

        let output = rewrite_with_stats(host.body(), &self.placeholder_url);
        host.set_body(output.html);
        Some(output.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::INIT_SCRIPT;

    /// Minimal host recording every call.
    struct MockHost {
        client: Client,
        kind: DocumentKind,
        body: String,
        registered: Vec<(String, String)>,
        writes: usize,
    }

    impl MockHost {
        fn new(client: Client, kind: DocumentKind, body: &str) -> Self {
            Self {
                client,
                kind,
                body: body.to_string(),
                registered: Vec::new(),
                writes: 0,
            }
        }
    }

    impl DocumentTextSource for MockHost {
        fn client(&self) -> Client {
            self.client
        }
        fn document_kind(&self) -> DocumentKind {
            self.kind
        }
        fn body(&self) -> &str {
            &self.body
        }
        fn set_body(&mut self, body: String) {
            self.body = body;
            self.writes += 1;
        }
    }

    impl ScriptAssetRegistrar for MockHost {
        fn register_script(&mut self, name: &str, url: &str) {
            self.registered.push((name.to_string(), url.to_string()));
        }
    }

    fn plugin() -> LazyLoadPlugin {
        LazyLoadPlugin::new("/loading.gif", "https://cdn.example.com/lazyload.min.js")
    }

    #[test]
    fn test_document_kind_from_path() {
        assert_eq!(DocumentKind::from_path(Path::new("a/index.html")), DocumentKind::Html);
        assert_eq!(DocumentKind::from_path(Path::new("PAGE.HTM")), DocumentKind::Html);
        assert_eq!(DocumentKind::from_path(Path::new("feed.xml")), DocumentKind::Other);
        assert_eq!(DocumentKind::from_path(Path::new("README")), DocumentKind::Other);
    }

    #[test]
    fn test_register_script_for_site_html() {
        let mut host = MockHost::new(Client::Site, DocumentKind::Html, "");
        assert_eq!(plugin().on_before_compile_head(&mut host), Ok(true));
        assert_eq!(
            host.registered,
            vec![(
                SCRIPT_ASSET_NAME.to_string(),
                "https://cdn.example.com/lazyload.min.js".to_string()
            )]
        );
    }

    #[test]
    fn test_register_script_skipped_for_admin_and_non_html() {
        let mut admin = MockHost::new(Client::Admin, DocumentKind::Html, "");
        let mut json = MockHost::new(Client::Site, DocumentKind::Other, "{}");
        assert_eq!(plugin().on_before_compile_head(&mut admin), Ok(false));
        assert_eq!(plugin().on_before_compile_head(&mut json), Ok(false));
        assert!(admin.registered.is_empty());
        assert!(json.registered.is_empty());
    }

    #[test]
    fn test_register_script_rejects_empty_url() {
        let mut host = MockHost::new(Client::Site, DocumentKind::Html, "");
        let plugin = LazyLoadPlugin::new("/loading.gif", "  ");
        assert_eq!(
            plugin.on_before_compile_head(&mut host),
            Err(PluginError::InvalidArgument { name: "script_url" })
        );
        assert!(host.registered.is_empty());
    }

    #[test]
    fn test_after_render_rewrites_body() {
        let mut host = MockHost::new(
            Client::Site,
            DocumentKind::Html,
            r#"<img src="a.png"><img src="b.png" class="logo-img">"#,
        );
        let stats = plugin().on_after_render(&mut host).unwrap();

        assert_eq!(stats.rewritten, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(host.writes, 1);
        assert!(host.body.contains(r#"src="/loading.gif""#));
        assert!(host.body.contains(r#"data-src="a.png""#));
        assert!(host.body.contains(INIT_SCRIPT));
    }

    #[test]
    fn test_after_render_leaves_ineligible_body_alone() {
        let body = r#"<img src="a.png">"#;
        let mut admin = MockHost::new(Client::Admin, DocumentKind::Html, body);
        let mut other = MockHost::new(Client::Site, DocumentKind::Other, body);

        assert!(plugin().on_after_render(&mut admin).is_none());
        assert!(plugin().on_after_render(&mut other).is_none());
        assert_eq!(admin.body, body);
        assert_eq!(other.body, body);
        assert_eq!(admin.writes + other.writes, 0);
    }

    #[test]
    fn test_after_render_with_empty_placeholder() {
        let mut host = MockHost::new(Client::Site, DocumentKind::Html, r#"<img src="a.png">"#);
        let plugin = LazyLoadPlugin::new("", "https://cdn.example.com/lazyload.min.js");
        plugin.on_after_render(&mut host).unwrap();
        assert!(host.body.contains(r#"<img src="" class="lazy" data-src="a.png">"#));
    }
}
