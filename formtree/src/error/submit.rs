//! Submission refusal

use crate::model::ErrorKind;

/// One invalid node in a refused submission.
#[derive(Debug, Clone)]
pub struct FieldIssue {
    /// Path of the invalid node.
    pub path: String,
    /// Active error kinds, in rule order.
    pub kinds: Vec<ErrorKind>,
}

impl std::fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kinds: Vec<&str> = self.kinds.iter().map(|k| k.as_str()).collect();
        write!(f, "{}: {}", self.path, kinds.join(", "))
    }
}

/// A submission was refused because the tree is invalid.
///
/// Carries one issue per invalid node, sorted by path. This is the only
/// way validation state crosses into the error channel; everything else
/// stays queryable state.
#[derive(Debug, Clone, thiserror::Error)]
#[error("submission refused: {} invalid node(s)", issues.len())]
pub struct SubmitError {
    /// The invalid nodes, sorted by path.
    pub issues: Vec<FieldIssue>,
}
