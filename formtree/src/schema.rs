//! Declarative form schemas

use crate::model::Value;
use crate::rules::Rule;

/// Declarative description of a form tree.
///
/// A schema is pure data: initial values, child layout, and rule lists.
/// [`FormEngine::build`](crate::FormEngine::build) turns it into a live
/// tree and reports structural mistakes as
/// [`SchemaError`](crate::SchemaError)s.
///
/// # Example
///
/// ```
/// use formtree::{Rule, Schema};
///
/// let schema = Schema::group()
///     .child("name", Schema::field("").rules([Rule::Required, Rule::MinLength(3)]))
///     .child("rating", Schema::field(formtree::Value::Null).rule(Rule::range(1.0, 5.0)));
/// ```
#[derive(Debug, Clone)]
pub enum Schema {
    /// Leaf field: an initial value plus its static rule list.
    Field {
        /// Value the field starts with.
        initial: Value,
        /// Rules evaluated against the field's value.
        rules: Vec<Rule>,
    },
    /// Composite group; children keep insertion order.
    Group {
        /// Named children in insertion order.
        children: Vec<(String, Schema)>,
        /// Group-level (cross-field) rules.
        rules: Vec<Rule>,
    },
    /// Growable list seeded with zero or more group entries.
    List {
        /// Initial entries; each must be a group schema.
        entries: Vec<Schema>,
    },
}

impl Schema {
    /// A leaf field with the given initial value and no rules.
    pub fn field(initial: impl Into<Value>) -> Self {
        Self::Field {
            initial: initial.into(),
            rules: Vec::new(),
        }
    }

    /// An empty group.
    pub fn group() -> Self {
        Self::Group {
            children: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// An empty list.
    pub fn list() -> Self {
        Self::List {
            entries: Vec::new(),
        }
    }

    /// Appends rules to a field or group schema.
    ///
    /// # Panics
    ///
    /// Panics when called on a list schema; lists carry no rules.
    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        match &mut self {
            Self::Field { rules: own, .. } | Self::Group { rules: own, .. } => own.extend(rules),
            Self::List { .. } => panic!("rules() called on a list schema"),
        }
        self
    }

    /// Appends a single rule; see [`Schema::rules`].
    pub fn rule(self, rule: Rule) -> Self {
        self.rules([rule])
    }

    /// Appends a named child to a group schema.
    ///
    /// # Panics
    ///
    /// Panics when called on a field or list schema.
    pub fn child(mut self, key: impl Into<String>, schema: Schema) -> Self {
        match &mut self {
            Self::Group { children, .. } => children.push((key.into(), schema)),
            _ => panic!("child() called on a non-group schema"),
        }
        self
    }

    /// Appends an initial entry to a list schema.
    ///
    /// # Panics
    ///
    /// Panics when called on a field or group schema.
    pub fn entry(mut self, template: Schema) -> Self {
        match &mut self {
            Self::List { entries } => entries.push(template),
            _ => panic!("entry() called on a non-list schema"),
        }
        self
    }
}
