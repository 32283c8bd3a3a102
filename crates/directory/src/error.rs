use hierarchy::HierarchyError;

/// Unified error type for the directory crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    /// Invalid input provided by the caller.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// No employee with the requested id.
    #[error("employee not found: {0}")]
    NotFound(String),
    /// A uniqueness constraint would be violated.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
    /// A bulk import stopped at entry `index` (0-based).
    #[error("import entry {index}: {source}")]
    Import {
        index: usize,
        source: Box<DirectoryError>,
    },
}

impl From<HierarchyError> for DirectoryError {
    fn from(error: HierarchyError) -> Self {
        DirectoryError::InvalidInput(error.to_string())
    }
}

/// Result type alias using [`DirectoryError`].
pub type DirectoryResult<T> = Result<T, DirectoryError>;
