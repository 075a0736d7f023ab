//! Error types for the diff crate.

/// Errors that can occur during a comparison.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    /// A root argument was absent, or old and new have different types.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A declared field could not be read.
    #[error("error accessing field: {field} of {type_name}")]
    FieldInaccessible {
        type_name: &'static str,
        field: &'static str,
    },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
