//! HTML rewriting pipeline.
//!
//! Parses a rendered page into a `Document`, runs transforms over it and
//! serializes the result. This module knows nothing about hosts, files or
//! configuration.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                 rewrite (after render)               │
//! │  parse -> LazyImageTransform -> InitScriptAppender   │
//! │        -> serialize                                  │
//! └──────────────────────────────────────────────────────┘
//!
//! ┌──────────────────────────────────────────────────────┐
//! │              inject_head_scripts (host)              │
//! │  parse -> HeadScriptInjector -> serialize            │
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod dom;
pub mod transform;

pub use dom::Document;
pub use transform::{
    HeadScriptInjector, INIT_SCRIPT, InitScriptAppender, LazyImageTransform, RewriteStats,
    Transform, has_init_script,
};

// =============================================================================
// Pipeline
// =============================================================================

/// Chains transforms over a single document.
pub struct Pipeline {
    doc: Document,
}

impl Pipeline {
    pub fn new(doc: Document) -> Self {
        Self { doc }
    }

    /// Run a transform.
    #[inline]
    pub fn pipe<T: Transform>(self, transform: T) -> Self {
        Self {
            doc: transform.transform(self.doc),
        }
    }

    pub fn into_inner(self) -> Document {
        self.doc
    }
}

// =============================================================================
// Rewrite
// =============================================================================

/// Result of a lazy-load rewrite
#[derive(Debug, Clone)]
pub struct RewriteOutput {
    pub html: String,
    pub stats: RewriteStats,
}

/// Rewrite images for lazy loading and append the loader script.
///
/// Never fails: malformed markup is recovered on a best-effort basis.
pub fn rewrite(html: &str, placeholder_url: &str) -> String {
    rewrite_with_stats(html, placeholder_url).html
}

/// Like [`rewrite`], also reporting how many images were changed.
pub fn rewrite_with_stats(html: &str, placeholder_url: &str) -> RewriteOutput {
    let mut stats = RewriteStats::default();
    let doc = Pipeline::new(Document::parse(html))
        .pipe(LazyImageTransform::new(placeholder_url, &mut stats))
        .pipe(InitScriptAppender::new())
        .into_inner();

    RewriteOutput {
        html: doc.to_html(),
        stats,
    }
}

/// Add `<script src>` elements for `sources` to the page head.
pub fn inject_head_scripts(html: &str, sources: &[String]) -> String {
    Pipeline::new(Document::parse(html))
        .pipe(HeadScriptInjector::new(sources))
        .into_inner()
        .to_html()
}

// =============================================================================
// Tests
// =============================================================================
