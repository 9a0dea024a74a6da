//! Lazy image transform.
//!
//! Converts `<img>` elements to deferred-loading form:
//! - real source moved to `data-src`
//! - `src` replaced by the placeholder image
//! - `lazy` class token appended
//!
//! Images are skipped when `class` is exactly `logo-img` or when they carry
//! `data-lazyload-ignore`.

use markup5ever_rcdom::Handle;

use super::Transform;
use crate::pipeline::dom::{self, Document};

const TAG_IMG: &str = "img";
const CLASS_LAZY: &str = "lazy";
/// Exact `class` value that opts an image out. Not a class-list match.
const CLASS_LOGO: &str = "logo-img";
const ATTR_IGNORE: &str = "data-lazyload-ignore";
const ATTR_DATA_SRC: &str = "data-src";

/// Counters reported by `LazyImageTransform`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RewriteStats {
    /// `img` elements found in the snapshot.
    pub images: usize,
    /// Images converted to deferred-loading form.
    pub rewritten: usize,
    /// Images left untouched by the exclusion policy.
    pub skipped: usize,
}

/// Rewrites image elements for client-side lazy loading
///
/// Counts are added to the borrowed `RewriteStats`.
pub struct LazyImageTransform<'a> {
    placeholder_url: &'a str,
    stats: &'a mut RewriteStats,
}

impl<'a> LazyImageTransform<'a> {
    pub fn new(placeholder_url: &'a str, stats: &'a mut RewriteStats) -> Self {
        Self {
            placeholder_url,
            stats,
        }
    }

    /// Build the deferred-loading replacement for `img`.
    ///
    /// Keeps every attribute in its original order and takes over the
    /// original's children.
    fn lazy_replacement(&self, img: &Handle) -> Handle {
        let class = dom::get_attr(img, "class").unwrap_or_default();
        let src = dom::get_attr(img, "src").unwrap_or_default();

        let attrs = dom::attrs_of(img)
            .iter()
            .map(|(name, value)| dom::attribute(name, value))
            .collect();
        let replacement = dom::new_element(TAG_IMG, attrs);
        dom::move_children(img, &replacement);

        dom::set_attr(&replacement, "class", &merge_class(&class));
        dom::set_attr(&replacement, ATTR_DATA_SRC, &src);
        dom::set_attr(&replacement, "src", self.placeholder_url);
        replacement
    }
}

impl Transform for LazyImageTransform<'_> {
    fn transform(self, doc: Document) -> Document {
        // Snapshot first: replacing nodes while walking would shift siblings.
        let images = dom::elements_by_tag(doc.root(), TAG_IMG);
        self.stats.images += images.len();

        for img in &images {
            if is_excluded(img) {
                self.stats.skipped += 1;
                continue;
            }

            let replacement = self.lazy_replacement(img);
            if dom::replace_node(img, replacement) {
                self.stats.rewritten += 1;
            }
        }

        doc
    }
}

/// Exclusion policy for a single image.
fn is_excluded(img: &Handle) -> bool {
    dom::get_attr(img, "class").as_deref() == Some(CLASS_LOGO) || dom::has_attr(img, ATTR_IGNORE)
}

/// Append the `lazy` token to an existing class attribute value.
fn merge_class(class: &str) -> String {
    let existing = class.trim_end();
    if existing.trim_start().is_empty() {
        CLASS_LAZY.to_string()
    } else {
        format!("{existing} {CLASS_LAZY}")
    }
}
