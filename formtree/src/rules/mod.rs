//! Declarative validation rules.
//!
//! A [`Rule`] is a pure function of a node's current value and a sibling
//! accessor ([`Scope`]): it either passes or names a single violation.
//! The engine attaches rule lists to fields and groups, re-evaluates them
//! on every relevant change, and stores the results as the node's error
//! set. Rules can also be swapped at runtime, which is how conditional
//! requirement works.

mod rule;
mod scope;

pub use rule::Rule;
pub use scope::{EmptyScope, Scope};
