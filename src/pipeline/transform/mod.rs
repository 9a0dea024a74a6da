//! Document transforms.
//!
//! Each transform consumes a `Document` and returns it, enabling composition
//! via `Pipeline`.
//!
//! # Modules
//!
//! - `head`: Injects registered `<script src>` assets into `<head>`
//! - `lazy`: Converts `<img>` elements to deferred-loading form
//! - `script`: Appends the lazy-load initialization script

mod head;
mod lazy;
mod script;

use super::dom::Document;

pub use head::HeadScriptInjector;
pub use lazy::{LazyImageTransform, RewriteStats};
pub use script::{INIT_SCRIPT, InitScriptAppender, has_init_script};

/// A single document transformation step.
pub trait Transform {
    fn transform(self, doc: Document) -> Document;
}
