//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// A `$ref` points at a node that does not exist in the document.
    #[from(ignore)]
    #[display(
        "Reference not found: {pointer}{}",
        referrer.as_ref().map(|r| format!(" (referenced from {r})")).unwrap_or_default()
    )]
    RefNotFound {
        /// The offending JSON Pointer.
        pointer: String,
        /// The pointer that contained the reference, when known.
        referrer: Option<String>,
    },

    /// An `allOf` composition contains members that cannot merge into an object.
    /// We ignore this for `From<String>` to avoid conflict with General.
    #[from(ignore)]
    #[display("Cannot merge allOf members: {_0}")]
    MergeConflict(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
