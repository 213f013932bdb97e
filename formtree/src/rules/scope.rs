//! Sibling access for cross-field rules

use crate::model::Value;

/// Read-only view of the fields surrounding the node under evaluation.
///
/// Cross-field rules resolve their operands through this instead of
/// reaching into the tree, which keeps every rule a pure function of its
/// inputs.
pub trait Scope {
    /// Resolve a sibling field by key: its current value and whether it
    /// is still pristine. `None` when no field with that key exists.
    fn sibling(&self, key: &str) -> Option<(&Value, bool)>;
}

/// A scope with no siblings.
///
/// Evaluation context for rules checked against a detached value, e.g.
/// in tests.
pub struct EmptyScope;

impl Scope for EmptyScope {
    fn sibling(&self, _key: &str) -> Option<(&Value, bool)> {
        None
    }
}
