//! In-memory host for a single rendered page.
//!
//! Plays the host role around the plugin: it owns the response body, knows
//! whether the page is a site-facing HTML document, collects registered
//! script assets and places them in `<head>` when the head is compiled.

use std::path::{Component, Path, PathBuf};

use super::{
    Client, DocumentKind, DocumentTextSource, LazyLoadPlugin, PluginError, ScriptAssetRegistrar,
};
use crate::pipeline::{RewriteStats, inject_head_scripts};

/// A registered script asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptAsset {
    pub name: String,
    pub url: String,
}

/// Host state for one page
#[derive(Debug, Clone)]
pub struct PageHost {
    client: Client,
    kind: DocumentKind,
    body: String,
    scripts: Vec<ScriptAsset>,
}

impl PageHost {
    /// A site-facing HTML page.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            client: Client::Site,
            kind: DocumentKind::Html,
            body: body.into(),
            scripts: Vec::new(),
        }
    }

    /// A page of a built site, classified by its site-relative path.
    ///
    /// Paths under any `admin` prefix belong to the admin client. `.`
    /// components are ignored on both sides, so `./administrator` matches.
    pub fn for_site_path(relative: &Path, body: impl Into<String>, admin: &[PathBuf]) -> Self {
        let page = without_cur_dir(relative);
        let client = if admin
            .iter()
            .any(|prefix| page.starts_with(without_cur_dir(prefix)))
        {
            Client::Admin
        } else {
            Client::Site
        };

        Self::new(body)
            .with_client(client)
            .with_kind(DocumentKind::from_path(relative))
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_kind(mut self, kind: DocumentKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn scripts(&self) -> &[ScriptAsset] {
        &self.scripts
    }

    /// Reference registered scripts from `<head>`.
    pub fn compile_head(&mut self) {
        if self.scripts.is_empty() {
            return;
        }
        let sources: Vec<String> = self.scripts.iter().map(|s| s.url.clone()).collect();
        self.body = inject_head_scripts(&self.body, &sources);
    }

    /// Run the full page lifecycle: register head assets, compile the head,
    /// then post-process the rendered body.
    pub fn render(&mut self, plugin: &LazyLoadPlugin) -> Result<Option<RewriteStats>, PluginError> {
        plugin.on_before_compile_head(self)?;
        self.compile_head();
        Ok(plugin.on_after_render(self))
    }

    pub fn into_body(self) -> String {
        self.body
    }
}

fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

impl DocumentTextSource for PageHost {
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
    }
}

impl ScriptAssetRegistrar for PageHost {
    /// Registering a name twice replaces the earlier URL.
    fn register_script(&mut self, name: &str, url: &str) {
        match self.scripts.iter_mut().find(|s| s.name == name) {
            Some(asset) => asset.url = url.to_string(),
            None => self.scripts.push(ScriptAsset {
                name: name.to_string(),
                url: url.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::INIT_SCRIPT;

    const LIB: &str = "https://cdn.example.com/lazyload.min.js";

    fn plugin() -> LazyLoadPlugin {
        LazyLoadPlugin::new("/loading.gif", LIB)
    }

    #[test]
    fn test_for_site_path_classification() {
        let admin = vec![PathBuf::from("administrator")];

        let page = PageHost::for_site_path(Path::new("blog/index.html"), "", &admin);
        assert_eq!(page.client(), Client::Site);
        assert_eq!(page.document_kind(), DocumentKind::Html);

        let page = PageHost::for_site_path(Path::new("administrator/index.html"), "", &admin);
        assert_eq!(page.client(), Client::Admin);

        // Component-wise prefix, not string prefix.
        let page = PageHost::for_site_path(Path::new("administrators/index.html"), "", &admin);
        assert_eq!(page.client(), Client::Site);

        let page = PageHost::for_site_path(Path::new("feed.xml"), "", &admin);
        assert_eq!(page.document_kind(), DocumentKind::Other);
    }

    #[test]
    fn test_for_site_path_ignores_cur_dir() {
        let admin = vec![PathBuf::from("./administrator")];
        let page = PageHost::for_site_path(Path::new("administrator/index.html"), "", &admin);
        assert_eq!(page.client(), Client::Admin);

        let admin = vec![PathBuf::from("administrator")];
        let page = PageHost::for_site_path(Path::new("./administrator/users.html"), "", &admin);
        assert_eq!(page.client(), Client::Admin);

        let page = PageHost::for_site_path(Path::new("./blog/index.html"), "", &admin);
        assert_eq!(page.client(), Client::Site);
    }

    #[test]
    fn test_register_script_replaces_by_name() {
        let mut host = PageHost::new("");
        host.register_script("lib", "/a.js");
        host.register_script("lib", "/b.js");
        host.register_script("other", "/c.js");
        assert_eq!(
            host.scripts(),
            &[
                ScriptAsset {
                    name: "lib".into(),
                    url: "/b.js".into()
                },
                ScriptAsset {
                    name: "other".into(),
                    url: "/c.js".into()
                },
            ]
        );
    }

    #[test]
    fn test_compile_head_without_scripts_keeps_body() {
        let mut host = PageHost::new("<p>untouched</p>");
        host.compile_head();
        assert_eq!(host.body(), "<p>untouched</p>");
    }

    #[test]
    fn test_render_full_lifecycle() {
        let mut host = PageHost::new(
            r#"<!DOCTYPE html><html><head><title>t</title></head><body><img src="a.png" class="hero"></body></html>"#,
        );
        let stats = host.render(&plugin()).unwrap().unwrap();
        assert_eq!(stats.rewritten, 1);

        let html = host.into_body();
        let head_end = html.find("</head>").unwrap();
        let script_at = html.find(&format!(r#"<script src="{LIB}"></script>"#)).unwrap();
        assert!(script_at < head_end);
        assert!(html.contains(r#"<img src="/loading.gif" class="hero lazy" data-src="a.png">"#));
        assert!(html.trim_end().ends_with(&format!("<script>{INIT_SCRIPT}</script>")));
    }

    #[test]
    fn test_render_admin_page_is_untouched() {
        let body = r#"<html><head></head><body><img src="a.png"></body></html>"#;
        let mut host = PageHost::new(body).with_client(Client::Admin);
        assert_eq!(host.render(&plugin()), Ok(None));
        assert!(host.scripts().is_empty());
        assert_eq!(host.into_body(), body);
    }

    #[test]
    fn test_render_propagates_invalid_argument() {
        let mut host = PageHost::new("<p></p>");
        let plugin = LazyLoadPlugin::new("/loading.gif", "");
        assert_eq!(
            host.render(&plugin),
            Err(PluginError::InvalidArgument { name: "script_url" })
        );
    }
}
