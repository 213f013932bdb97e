//! Schema construction errors

/// Errors raised while building a form tree from a schema.
///
/// These indicate a misconfigured schema, which is a bug in the
/// integrating layer: fail fast, do not retry, do not surface to users.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SchemaError {
    /// The root of a schema must be a group.
    #[error("root schema must be a group")]
    RootNotGroup,

    /// Two children of the same group share a key.
    #[error("duplicate key '{key}' in group '{group}'")]
    DuplicateKey {
        /// Path of the offending group.
        group: String,
        /// The repeated key.
        key: String,
    },

    /// A cross-field rule names a sibling that does not exist.
    #[error("rule on '{owner}' references unknown sibling '{target}'")]
    UnknownRuleTarget {
        /// Path of the node carrying the rule.
        owner: String,
        /// The missing sibling key.
        target: String,
    },

    /// List entries must be instantiated from group templates.
    #[error("list entry under '{list}' is not a group template")]
    EntryNotGroup {
        /// Path of the offending list.
        list: String,
    },

    /// A pattern rule was given an invalid regex.
    #[error("invalid pattern '{pattern}'")]
    InvalidPattern {
        /// The rejected pattern source.
        pattern: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },
}
