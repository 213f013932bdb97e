//! The validation rule set

use regex::Regex;

use super::scope::Scope;
use crate::error::SchemaError;
use crate::model::{ErrorKind, Value, Violation};

/// A declarative validation rule.
///
/// Every variant is a pure function of the current value and the
/// surrounding [`Scope`]: it reads, never mutates, and either passes or
/// produces a single [`Violation`]. Rules are dispatched uniformly by the
/// engine, so a field's error set is always exactly the union of its
/// rules' current results.
///
/// Presence and shape are separate concerns: the length, email, and
/// pattern rules all pass on null/empty values, so pair them with
/// [`Rule::Required`] when the field must also be filled in.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Value must be present: non-null, and not a blank string.
    Required,
    /// Minimum character count for string values.
    MinLength(usize),
    /// Maximum character count for string values.
    MaxLength(usize),
    /// Syntactic email address check.
    Email,
    /// Regex match for string values. Construct via [`Rule::pattern`].
    Pattern(Regex),
    /// Inclusive numeric bounds. Null passes; non-numeric values fail.
    Range {
        /// Lower bound, inclusive.
        min: f64,
        /// Upper bound, inclusive.
        max: f64,
    },
    /// Group-level equality check between two sibling fields.
    ///
    /// Treated as valid while either side is still pristine, so the pair
    /// is not flagged before the user has interacted with both fields.
    /// Comparison is exact: case-sensitive, no normalization.
    MatchFields {
        /// Key of the first sibling.
        left: String,
        /// Key of the second sibling.
        right: String,
    },
}

impl Rule {
    /// Builds a [`Rule::Pattern`], failing on an invalid regex.
    pub fn pattern(src: &str) -> Result<Self, SchemaError> {
        Regex::new(src)
            .map(Rule::Pattern)
            .map_err(|source| SchemaError::InvalidPattern {
                pattern: src.to_string(),
                source,
            })
    }

    /// Builds a [`Rule::Range`] with inclusive bounds.
    pub fn range(min: f64, max: f64) -> Self {
        Rule::Range { min, max }
    }

    /// Builds a [`Rule::MatchFields`] over two sibling keys.
    pub fn match_fields(left: impl Into<String>, right: impl Into<String>) -> Self {
        Rule::MatchFields {
            left: left.into(),
            right: right.into(),
        }
    }

    /// The error kind this rule produces when it fails.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Rule::Required => ErrorKind::Required,
            Rule::MinLength(_) => ErrorKind::MinLength,
            Rule::MaxLength(_) => ErrorKind::MaxLength,
            Rule::Email => ErrorKind::Email,
            Rule::Pattern(_) => ErrorKind::Pattern,
            Rule::Range { .. } => ErrorKind::Range,
            Rule::MatchFields { .. } => ErrorKind::Match,
        }
    }

    /// Sibling keys this rule reads, for schema-time existence checks.
    pub(crate) fn sibling_refs(&self) -> Vec<&str> {
        match self {
            Rule::MatchFields { left, right } => vec![left.as_str(), right.as_str()],
            _ => Vec::new(),
        }
    }

    /// Evaluates this rule against a value and its surrounding scope.
    ///
    /// `None` means the rule passes.
    pub fn evaluate(&self, value: &Value, scope: &dyn Scope) -> Option<Violation> {
        match self {
            Rule::Required => match value {
                Value::Null => Some(Violation::new(ErrorKind::Required)),
                Value::String(s) if s.trim().is_empty() => {
                    Some(Violation::new(ErrorKind::Required))
                }
                _ => None,
            },

            Rule::MinLength(min) => match value.as_str() {
                Some(s) if !s.is_empty() && s.chars().count() < *min => Some(Violation::detailed(
                    ErrorKind::MinLength,
                    min.to_string(),
                    s.chars().count().to_string(),
                )),
                _ => None,
            },

            Rule::MaxLength(max) => match value.as_str() {
                Some(s) if s.chars().count() > *max => Some(Violation::detailed(
                    ErrorKind::MaxLength,
                    max.to_string(),
                    s.chars().count().to_string(),
                )),
                _ => None,
            },

            Rule::Email => match value.as_str() {
                Some(s) if !s.is_empty() && !email_address::EmailAddress::is_valid(s) => {
                    Some(Violation::new(ErrorKind::Email))
                }
                _ => None,
            },

            Rule::Pattern(re) => match value.as_str() {
                Some(s) if !s.is_empty() && !re.is_match(s) => Some(Violation::detailed(
                    ErrorKind::Pattern,
                    re.as_str().to_string(),
                    s.to_string(),
                )),
                _ => None,
            },

            Rule::Range { min, max } => {
                if value.is_null() {
                    return None;
                }
                let bounds = format!("{min}..={max}");
                match value.as_number() {
                    Some(n) if n < *min || n > *max => {
                        Some(Violation::detailed(ErrorKind::Range, bounds, n.to_string()))
                    }
                    Some(_) => None,
                    None => Some(Violation::detailed(
                        ErrorKind::Range,
                        bounds,
                        value.type_name(),
                    )),
                }
            }

            Rule::MatchFields { left, right } => {
                let (left_value, left_pristine) = scope.sibling(left)?;
                let (right_value, right_pristine) = scope.sibling(right)?;
                if left_pristine || right_pristine {
                    return None;
                }
                if left_value == right_value {
                    None
                } else {
                    Some(Violation::new(ErrorKind::Match))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::EmptyScope;

    fn eval(rule: &Rule, value: Value) -> Option<Violation> {
        rule.evaluate(&value, &EmptyScope)
    }

    #[test]
    fn required_rejects_null_and_blank() {
        assert!(eval(&Rule::Required, Value::Null).is_some());
        assert!(eval(&Rule::Required, Value::from("")).is_some());
        assert!(eval(&Rule::Required, Value::from("   ")).is_some());
        assert!(eval(&Rule::Required, Value::from("x")).is_none());
        assert!(eval(&Rule::Required, Value::from(false)).is_none());
    }

    #[test]
    fn length_rules_skip_empty() {
        assert!(eval(&Rule::MinLength(3), Value::from("")).is_none());
        assert!(eval(&Rule::MinLength(3), Value::from("ab")).is_some());
        assert!(eval(&Rule::MinLength(3), Value::from("abc")).is_none());
        assert!(eval(&Rule::MaxLength(2), Value::from("abc")).is_some());
        assert!(eval(&Rule::MaxLength(2), Value::from("ab")).is_none());
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let rule = Rule::range(1.0, 5.0);
        assert!(eval(&rule, Value::Null).is_none());
        assert!(eval(&rule, Value::from(1i64)).is_none());
        assert!(eval(&rule, Value::from(5i64)).is_none());
        assert!(eval(&rule, Value::from(0i64)).is_some());
        assert!(eval(&rule, Value::from(6i64)).is_some());
        assert!(eval(&rule, Value::from(-1i64)).is_some());
        assert!(eval(&rule, Value::from("abc")).is_some());
    }

    #[test]
    fn email_accepts_empty_and_valid() {
        assert!(eval(&Rule::Email, Value::from("")).is_none());
        assert!(eval(&Rule::Email, Value::from("a@example.com")).is_none());
        assert!(eval(&Rule::Email, Value::from("not-an-email")).is_some());
    }

    #[test]
    fn pattern_compiles_or_fails_at_construction() {
        let rule = Rule::pattern(r"^\d{5}$").unwrap();
        assert!(eval(&rule, Value::from("12345")).is_none());
        assert!(eval(&rule, Value::from("1234")).is_some());
        assert!(Rule::pattern("(unclosed").is_err());
    }

    #[test]
    fn match_fields_passes_without_siblings() {
        let rule = Rule::match_fields("a", "b");
        assert!(eval(&rule, Value::Null).is_none());
    }
}
