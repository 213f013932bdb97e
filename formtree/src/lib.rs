//! Field-tree form validation engine
//!
//! `formtree` owns a tree of named fields, groups, and growable lists,
//! evaluates declarative validation rules synchronously on every change,
//! tracks pristine/dirty/touched state per field, and exposes validity,
//! error sets, change subscriptions (with trailing-edge debounce), and
//! message resolution to a presentation layer. Rendering, persistence,
//! and transport live elsewhere.

pub mod engine;
pub mod error;
pub mod messages;
pub mod model;
pub mod observe;
pub mod rules;
pub mod schema;

mod paths;

pub use engine::FormEngine;
pub use error::{FieldIssue, FormError, PathError, SchemaError, SubmitError};
pub use messages::MessageCatalog;
pub use model::{ErrorKind, ErrorSet, Field, Flags, Group, List, Node, Value, Violation};
pub use observe::{DEFAULT_DEBOUNCE, Subscription};
pub use rules::{EmptyScope, Rule, Scope};
pub use schema::Schema;
