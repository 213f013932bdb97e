//! Violations and per-node error sets

use serde::Serialize;

/// Stable identifier for a class of validation failure.
///
/// The lowercase serde/message key (`required`, `minlength`, ...) is what
/// message catalogs and submission reports use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Value is null or a blank string.
    Required,
    /// String is shorter than the configured minimum.
    MinLength,
    /// String is longer than the configured maximum.
    MaxLength,
    /// String is not a syntactically valid email address.
    Email,
    /// String does not match the configured pattern.
    Pattern,
    /// Value is non-numeric or outside the configured bounds.
    Range,
    /// Two sibling fields do not hold the same value.
    Match,
}

impl ErrorKind {
    /// The stable lowercase key for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Required => "required",
            ErrorKind::MinLength => "minlength",
            ErrorKind::MaxLength => "maxlength",
            ErrorKind::Email => "email",
            ErrorKind::Pattern => "pattern",
            ErrorKind::Range => "range",
            ErrorKind::Match => "match",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rule failure on a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// What class of failure this is.
    pub kind: ErrorKind,
    /// What the rule expected, when it can say (e.g. `1..=5`).
    pub expected: Option<String>,
    /// What the rule saw, when it can say.
    pub actual: Option<String>,
}

impl Violation {
    /// Creates a violation with no detail.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            expected: None,
            actual: None,
        }
    }

    /// Creates a violation carrying expected/actual detail.
    pub fn detailed(kind: ErrorKind, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            kind,
            expected: Some(expected.into()),
            actual: Some(actual.into()),
        }
    }
}

/// The current error state of a node.
///
/// Insertion-ordered: violations appear in the order of the rules that
/// produced them, which is also the order message resolution follows.
/// An empty set means the node is valid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorSet(Vec<Violation>);

impl ErrorSet {
    pub(crate) const EMPTY: &'static ErrorSet = &ErrorSet(Vec::new());

    pub(crate) fn from_violations(violations: Vec<Violation>) -> Self {
        Self(violations)
    }

    /// No active violations.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of active violations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether a violation of the given kind is active.
    pub fn has(&self, kind: ErrorKind) -> bool {
        self.0.iter().any(|v| v.kind == kind)
    }

    /// Violations in rule order.
    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    /// Active kinds in rule order.
    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.0.iter().map(|v| v.kind).collect()
    }
}

impl<'a> IntoIterator for &'a ErrorSet {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
