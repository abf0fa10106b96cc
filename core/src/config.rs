#![deny(missing_docs)]

//! # Generation Configuration
//!
//! The caller-facing knobs consumed by the normalization pass. Operation
//! filtering is applied by the reachability stage; the rename hook is
//! stored here for downstream emitters and never consulted by the core.

use std::fmt;

type OperationFilter = Box<dyn Fn(&str) -> bool + Send + Sync>;
type OperationRename = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Configuration for one generation pass.
///
/// The default configuration keeps every operation and renames nothing.
#[derive(Default)]
pub struct GenerationConfig {
    filter: Option<OperationFilter>,
    rename: Option<OperationRename>,
}

impl GenerationConfig {
    /// Creates the default configuration (keep all, rename nothing).
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs an operation filter predicate over `operationId` values.
    pub fn with_operation_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Installs a rename hook for downstream emitters.
    pub fn with_operation_rename<F>(mut self, rename: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.rename = Some(Box::new(rename));
        self
    }

    /// Returns whether the operation with the given id should be kept.
    pub fn include_operation(&self, id: &str) -> bool {
        match &self.filter {
            Some(filter) => filter(id),
            None => true,
        }
    }

    /// Returns the emitter-visible name for an operation id.
    ///
    /// The core never calls this; it is exposed for the emission backend.
    pub fn rename_operation(&self, id: &str) -> String {
        match &self.rename {
            Some(rename) => rename(id),
            None => id.to_string(),
        }
    }
}

// Manual Debug implementation since boxed closures are not debuggable.
impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("filter", &self.filter.as_ref().map(|_| "Some(Fn)"))
            .field("rename", &self.rename.as_ref().map(|_| "Some(Fn)"))
            .finish()
    }
}
