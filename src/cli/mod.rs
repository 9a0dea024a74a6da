//! Command-line interface module.

mod args;
pub mod init;
pub mod rewrite;
pub mod site;

pub use args::{Cli, Commands, UrlArgs};
