//! Loader initialization script appender.
//!
//! Appends the lazy-load runtime bootstrap after all other content so the
//! client scans the finished DOM for `data-src` images.

use super::Transform;
use crate::pipeline::dom::{self, Document};

/// Bootstrap call for the external lazy-load client.
pub const INIT_SCRIPT: &str = "var lazyLoadInstance = new LazyLoad();";

/// Appends the initialization `<script>` as the last node of the document
#[derive(Debug, Default, Clone, Copy)]
pub struct InitScriptAppender;

impl InitScriptAppender {
    pub const fn new() -> Self {
        Self
    }
}

impl Transform for InitScriptAppender {
    fn transform(self, doc: Document) -> Document {
        let script = dom::new_element("script", Vec::new());
        dom::append_child(&script, dom::new_text(INIT_SCRIPT));
        doc.append_to_root(script);
        doc
    }
}

/// Whether `html` ends with the script `InitScriptAppender` adds.
///
/// The snippet appearing elsewhere (e.g. quoted in a `<pre>`) does not count.
pub fn has_init_script(html: &str) -> bool {
    html.trim_end()
        .strip_suffix("</script>")
        .and_then(|rest| rest.strip_suffix(INIT_SCRIPT))
        .is_some_and(|rest| rest.ends_with("<script>"))
}
