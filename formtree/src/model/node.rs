//! Nodes of the arena field tree

use crate::model::{ErrorSet, Flags, Value};
use crate::rules::Rule;

/// A single leaf value with its own validity state.
#[derive(Debug, Clone)]
pub struct Field {
    pub(crate) value: Value,
    pub(crate) initial: Value,
    pub(crate) flags: Flags,
    pub(crate) rules: Vec<Rule>,
    pub(crate) errors: ErrorSet,
}

impl Field {
    pub(crate) fn new(initial: Value, rules: Vec<Rule>) -> Self {
        Self {
            value: initial.clone(),
            initial,
            flags: Flags::new(),
            rules,
            errors: ErrorSet::default(),
        }
    }

    /// Current value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Value the field was initialized with.
    pub fn initial(&self) -> &Value {
        &self.initial
    }

    /// Current interaction flags.
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Currently attached rules, in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Current error state.
    pub fn errors(&self) -> &ErrorSet {
        &self.errors
    }
}

/// A named composite of fields and subgroups.
#[derive(Debug, Clone)]
pub struct Group {
    pub(crate) children: Vec<String>,
    pub(crate) rules: Vec<Rule>,
    pub(crate) errors: ErrorSet,
}

impl Group {
    /// Child keys in insertion order.
    pub fn keys(&self) -> &[String] {
        &self.children
    }

    /// Group-level (cross-field) rules, in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Current error state of the group's own rules.
    pub fn errors(&self) -> &ErrorSet {
        &self.errors
    }
}

/// An ordered, appendable sequence of group entries.
///
/// Entries are addressed by numeric path segments (`addresses.0`). The
/// observed scope has no removal, so entries only ever grow.
#[derive(Debug, Clone)]
pub struct List {
    pub(crate) len: usize,
}

impl List {
    /// Number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Any node of the field tree.
#[derive(Debug, Clone)]
pub enum Node {
    /// Leaf field.
    Field(Field),
    /// Composite group.
    Group(Group),
    /// Growable list of group entries.
    List(List),
}

impl Node {
    /// Current error state; lists carry none of their own.
    pub fn errors(&self) -> &ErrorSet {
        match self {
            Node::Field(field) => &field.errors,
            Node::Group(group) => &group.errors,
            Node::List(_) => ErrorSet::EMPTY,
        }
    }
}
