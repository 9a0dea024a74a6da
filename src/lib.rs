//! Lazy-loading rewriter for rendered HTML pages.
//!
//! Rewrites `<img>` elements so browsers defer fetching their sources until a
//! client-side loader swaps them in, and wires that loader into the page.
//!
//! - [`pipeline`]: HTML parsing, transforms and serialization
//! - [`plugin`]: host lifecycle hooks and the host collaborator traits
//! - [`config`]: `lazyload.toml` loading and validation
//! - [`cli`]: `rewrite`, `site` and `init` commands

pub mod cli;
pub mod config;
pub mod logger;
pub mod pipeline;
pub mod plugin;
pub mod utils;

pub use pipeline::{RewriteStats, rewrite, rewrite_with_stats};
pub use plugin::{DocumentTextSource, LazyLoadPlugin, PageHost, ScriptAssetRegistrar};
