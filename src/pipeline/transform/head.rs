//! Head script injector.
//!
//! Appends `<script src="...">` elements to `<head>` for registered script
//! assets. A source already referenced from `<head>` is not added again.

use markup5ever_rcdom::Handle;

use super::Transform;
use crate::pipeline::dom::{self, Document};

/// Injects external scripts into `<head>`
pub struct HeadScriptInjector<'a> {
    sources: &'a [String],
}

impl<'a> HeadScriptInjector<'a> {
    pub fn new(sources: &'a [String]) -> Self {
        Self { sources }
    }

    /// Append a script element for each source not yet in `head`.
    fn populate_head(&self, head: &Handle) {
        for src in self.sources {
            if has_script(head, src) {
                continue;
            }
            let script = dom::new_element("script", vec![dom::attribute("src", src)]);
            dom::append_child(head, script);
        }
    }
}

impl Transform for HeadScriptInjector<'_> {
    fn transform(self, doc: Document) -> Document {
        if let Some(head) = doc.find_element("head") {
            self.populate_head(&head);
        }
        doc
    }
}

fn has_script(head: &Handle, src: &str) -> bool {
    dom::elements_by_tag(head, "script")
        .iter()
        .any(|script| dom::get_attr(script, "src").as_deref() == Some(src))
}
