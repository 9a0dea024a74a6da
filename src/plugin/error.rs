//! Plugin error types.

use thiserror::Error;

/// Errors raised by the lifecycle hooks
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PluginError {
    /// A required option was passed empty.
    #[error("invalid argument: `{name}` must not be empty")]
    InvalidArgument { name: &'static str },
}
