//! Path resolution errors

/// Errors raised when a dotted path does not resolve as expected.
///
/// Like [`SchemaError`](super::SchemaError) these are programmer errors
/// in the integrating layer, not user-facing validation state.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PathError {
    /// No node exists at the path.
    #[error("no node at path '{path}'")]
    NotFound {
        /// The unresolved path.
        path: String,
    },

    /// The node exists but is not a field.
    #[error("path '{path}' is not a field")]
    NotAField {
        /// The offending path.
        path: String,
    },

    /// The node exists but is not a group.
    #[error("path '{path}' is not a group")]
    NotAGroup {
        /// The offending path.
        path: String,
    },

    /// The node exists but is not a list.
    #[error("path '{path}' is not a list")]
    NotAList {
        /// The offending path.
        path: String,
    },
}

impl PathError {
    pub(crate) fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub(crate) fn not_a_field(path: impl Into<String>) -> Self {
        Self::NotAField { path: path.into() }
    }

    pub(crate) fn not_a_group(path: impl Into<String>) -> Self {
        Self::NotAGroup { path: path.into() }
    }

    pub(crate) fn not_a_list(path: impl Into<String>) -> Self {
        Self::NotAList { path: path.into() }
    }
}
