//! Human-readable messages for validation errors
//!
//! Error sets are state; messages are presentation. A catalog maps error
//! kinds to display strings, and resolution stays empty until the field
//! has been touched or dirtied, so untouched inputs never flash errors.

use crate::engine::FormEngine;
use crate::error::PathError;
use crate::model::ErrorKind;

/// Insertion-ordered mapping from error kind to display message.
///
/// # Example
///
/// ```
/// use formtree::{ErrorKind, MessageCatalog};
///
/// let catalog = MessageCatalog::new()
///     .with(ErrorKind::Required, "Please enter your email address.")
///     .with(ErrorKind::Email, "Please enter a valid email address.");
/// assert_eq!(catalog.message(ErrorKind::Email), Some("Please enter a valid email address."));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    entries: Vec<(ErrorKind, String)>,
}

impl MessageCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the message for a kind.
    pub fn with(mut self, kind: ErrorKind, message: impl Into<String>) -> Self {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == kind) {
            entry.1 = message.into();
        } else {
            self.entries.push((kind, message.into()));
        }
        self
    }

    /// The message for a kind, if one is registered.
    pub fn message(&self, kind: ErrorKind) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, m)| m.as_str())
    }

    /// Builds the displayable message for the node at `path`.
    ///
    /// Empty until the node is touched or dirty (for groups and lists:
    /// until any descendant field is), regardless of underlying
    /// validity. Afterwards, the messages for every active error kind
    /// are concatenated in error-set order (= rule insertion order),
    /// space-separated; kinds with no catalog entry are skipped.
    pub fn resolve(&self, engine: &FormEngine, path: &str) -> Result<String, PathError> {
        let flags = engine.flags_at(path)?;
        if !flags.is_touched() && !flags.is_dirty() {
            return Ok(String::new());
        }

        let errors = engine.errors_for(path)?;
        let parts: Vec<&str> = errors
            .iter()
            .filter_map(|violation| self.message(violation.kind))
            .collect();
        Ok(parts.join(" "))
    }
}
