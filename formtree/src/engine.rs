//! The form engine: arena field tree, evaluation, and queries

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::error::{FieldIssue, FormError, PathError, SchemaError, SubmitError};
use crate::model::{ErrorSet, Field, Flags, Group, List, Node, Value, Violation};
use crate::observe::{Observers, Subscription};
use crate::paths;
use crate::rules::{Rule, Scope};
use crate::schema::Schema;

/// The form validation engine.
///
/// Owns an arena of nodes addressed by stable dotted paths (the root
/// group lives at the empty path), evaluates rules synchronously on
/// every change, tracks per-field interaction flags, and notifies
/// registered observers of value changes.
///
/// All evaluation runs to completion on the mutating call, so observers
/// and queries never see a half-updated tree.
///
/// # Example
///
/// ```
/// use formtree::{FormEngine, Rule, Schema};
///
/// let schema = Schema::group()
///     .child("name", Schema::field("").rule(Rule::Required));
/// let mut engine = FormEngine::build(schema).unwrap();
///
/// assert!(!engine.is_valid());
/// engine.set_value("name", "Ada").unwrap();
/// assert!(engine.is_valid());
/// ```
pub struct FormEngine {
    nodes: HashMap<String, Node>,
    observers: Observers,
}

impl std::fmt::Debug for FormEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormEngine")
            .field("nodes", &self.nodes.len())
            .finish_non_exhaustive()
    }
}

impl FormEngine {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Builds a live tree from a schema and evaluates every node once,
    /// so validity is accurate from the start.
    pub fn build(schema: Schema) -> Result<Self, SchemaError> {
        if !matches!(schema, Schema::Group { .. }) {
            return Err(SchemaError::RootNotGroup);
        }
        let mut nodes = HashMap::new();
        insert_schema(&mut nodes, String::new(), schema)?;

        let mut engine = Self {
            nodes,
            observers: Observers::default(),
        };
        let all: Vec<String> = engine.nodes.keys().cloned().collect();
        for path in &all {
            engine.evaluate_node(path);
        }
        log::debug!("built form tree with {} node(s)", engine.nodes.len());
        Ok(engine)
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Resolves a path to its node. The empty path is the root group.
    pub fn get(&self, path: &str) -> Result<&Node, PathError> {
        self.nodes
            .get(path)
            .ok_or_else(|| PathError::not_found(path))
    }

    /// Resolves a path to a field.
    pub fn field(&self, path: &str) -> Result<&Field, PathError> {
        match self.get(path)? {
            Node::Field(field) => Ok(field),
            _ => Err(PathError::not_a_field(path)),
        }
    }

    /// Resolves a path to a group.
    pub fn group(&self, path: &str) -> Result<&Group, PathError> {
        match self.get(path)? {
            Node::Group(group) => Ok(group),
            _ => Err(PathError::not_a_group(path)),
        }
    }

    /// Resolves a path to a list.
    pub fn list(&self, path: &str) -> Result<&List, PathError> {
        match self.get(path)? {
            Node::List(list) => Ok(list),
            _ => Err(PathError::not_a_list(path)),
        }
    }

    fn field_mut(&mut self, path: &str) -> Result<&mut Field, PathError> {
        match self.nodes.get_mut(path) {
            Some(Node::Field(field)) => Ok(field),
            Some(_) => Err(PathError::not_a_field(path)),
            None => Err(PathError::not_found(path)),
        }
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Updates a single field value.
    ///
    /// On a real change the field's pristine flag is cleared (first time
    /// only), dirty is set, and observers of the path are notified.
    /// Either way the field's rules and every ancestor group's rules are
    /// re-evaluated synchronously before this returns. Writing the value
    /// a field already holds does not flip flags or notify.
    pub fn set_value(&mut self, path: &str, value: impl Into<Value>) -> Result<(), PathError> {
        let value = value.into();
        let changed = {
            let field = self.field_mut(path)?;
            if field.value == value {
                false
            } else {
                field.value = value.clone();
                field.flags.mark_changed();
                true
            }
        };

        self.evaluate_node(path);
        self.evaluate_ancestors(path);

        if changed {
            log::trace!("value changed at '{path}'");
            self.observers.notify(path, &value, Instant::now());
        }
        Ok(())
    }

    /// Applies a partial value tree.
    ///
    /// `partial` is a JSON object mirroring the tree shape; only the
    /// leaves it names are updated (with [`set_value`](Self::set_value)
    /// semantics), everything else keeps its value and pristine state.
    /// Unknown keys fail with [`PathError::NotFound`] — partially
    /// applied, so treat a failure as fatal.
    pub fn patch_values(&mut self, partial: serde_json::Value) -> Result<(), PathError> {
        self.patch_at("", partial)
    }

    fn patch_at(&mut self, path: &str, value: serde_json::Value) -> Result<(), PathError> {
        match value {
            serde_json::Value::Object(map) => {
                for (key, child_value) in map {
                    let child = paths::join(path, &key);
                    if !self.nodes.contains_key(&child) {
                        return Err(PathError::not_found(child));
                    }
                    self.patch_at(&child, child_value)?;
                }
                Ok(())
            }
            serde_json::Value::Array(items) => {
                for (index, item) in items.into_iter().enumerate() {
                    let child = paths::join(path, &index.to_string());
                    if !self.nodes.contains_key(&child) {
                        return Err(PathError::not_found(child));
                    }
                    self.patch_at(&child, item)?;
                }
                Ok(())
            }
            leaf => self.set_value(path, json_leaf(leaf)),
        }
    }

    /// Replaces a field's or group's rule list and re-evaluates it
    /// immediately, plus every ancestor group.
    ///
    /// This is how conditional requirement works: attach `Required` when
    /// the condition holds, clear the rules when it stops holding, and
    /// the error state follows suit at once.
    pub fn set_validators(
        &mut self,
        path: &str,
        rules: impl IntoIterator<Item = Rule>,
    ) -> Result<(), PathError> {
        let rules: Vec<Rule> = rules.into_iter().collect();
        match self.nodes.get_mut(path) {
            Some(Node::Field(field)) => field.rules = rules,
            Some(Node::Group(group)) => group.rules = rules,
            Some(Node::List(_)) => return Err(PathError::not_a_field(path)),
            None => return Err(PathError::not_found(path)),
        }
        log::debug!("replaced validators at '{path}'");
        self.evaluate_node(path);
        self.evaluate_ancestors(path);
        Ok(())
    }

    /// Drops all rules from a field or group; a previously invalid node
    /// becomes valid on the spot.
    pub fn clear_validators(&mut self, path: &str) -> Result<(), PathError> {
        self.set_validators(path, [])
    }

    /// Instantiates the group template and appends it to the list at
    /// `path`. Returns the new entry's index.
    ///
    /// The new entry starts pristine with its template defaults and is
    /// evaluated immediately. Entries are independent of one another.
    pub fn append_to_list(&mut self, path: &str, template: Schema) -> Result<usize, FormError> {
        if !matches!(template, Schema::Group { .. }) {
            return Err(SchemaError::EntryNotGroup {
                list: paths::display(path),
            }
            .into());
        }
        let index = match self.nodes.get(path) {
            Some(Node::List(list)) => list.len,
            Some(_) => return Err(PathError::not_a_list(path).into()),
            None => return Err(PathError::not_found(path).into()),
        };

        let entry_path = paths::join(path, &index.to_string());
        insert_schema(&mut self.nodes, entry_path.clone(), template)?;
        if let Some(Node::List(list)) = self.nodes.get_mut(path) {
            list.len = index + 1;
        }

        let subtree: Vec<String> = self
            .nodes
            .keys()
            .filter(|p| paths::in_subtree(p, &entry_path))
            .cloned()
            .collect();
        for node_path in &subtree {
            self.evaluate_node(node_path);
        }
        self.evaluate_ancestors(&entry_path);

        log::debug!("appended entry {index} to list '{path}'");
        Ok(index)
    }

    /// Records that the field lost focus.
    pub fn mark_touched(&mut self, path: &str) -> Result<(), PathError> {
        self.field_mut(path)?.flags.mark_touched();
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The current error set of the node at `path`; empty means valid.
    pub fn errors_for(&self, path: &str) -> Result<&ErrorSet, PathError> {
        Ok(self.get(path)?.errors())
    }

    /// Whether the whole tree is valid.
    pub fn is_valid(&self) -> bool {
        self.nodes.values().all(|node| node.errors().is_empty())
    }

    /// Whether the node at `path` and all its descendants are valid.
    pub fn is_valid_at(&self, path: &str) -> Result<bool, PathError> {
        self.get(path)?;
        Ok(self
            .nodes
            .iter()
            .filter(|(node_path, _)| paths::in_subtree(node_path, path))
            .all(|(_, node)| node.errors().is_empty()))
    }

    /// Interaction flags for `path`.
    ///
    /// For a field, its own flags; for a group or list, the aggregate
    /// over all descendant fields (pristine iff all are, dirty/touched
    /// if any is).
    pub fn flags_at(&self, path: &str) -> Result<Flags, PathError> {
        match self.get(path)? {
            Node::Field(field) => Ok(field.flags()),
            _ => Ok(self
                .nodes
                .iter()
                .filter(|(node_path, _)| paths::in_subtree(node_path, path))
                .filter_map(|(_, node)| match node {
                    Node::Field(field) => Some(field.flags()),
                    _ => None,
                })
                .fold(Flags::new(), Flags::merge)),
        }
    }

    /// Exports the current value tree as JSON: groups become objects,
    /// lists become arrays, leaves become scalars.
    pub fn value(&self) -> serde_json::Value {
        self.value_at("").unwrap_or(serde_json::Value::Null)
    }

    /// Exports the value subtree rooted at `path`.
    pub fn value_at(&self, path: &str) -> Result<serde_json::Value, PathError> {
        match self.get(path)? {
            Node::Field(field) => {
                Ok(serde_json::to_value(&field.value).unwrap_or(serde_json::Value::Null))
            }
            Node::Group(group) => {
                let mut map = serde_json::Map::new();
                for key in group.keys() {
                    map.insert(key.clone(), self.value_at(&paths::join(path, key))?);
                }
                Ok(serde_json::Value::Object(map))
            }
            Node::List(list) => {
                let mut items = Vec::with_capacity(list.len());
                for index in 0..list.len() {
                    items.push(self.value_at(&paths::join(path, &index.to_string()))?);
                }
                Ok(serde_json::Value::Array(items))
            }
        }
    }

    /// Returns the exported value tree when the whole tree is valid;
    /// otherwise refuses with one issue per invalid node.
    pub fn submit(&self) -> Result<serde_json::Value, SubmitError> {
        let mut issues: Vec<FieldIssue> = self
            .nodes
            .iter()
            .filter(|(_, node)| !node.errors().is_empty())
            .map(|(node_path, node)| FieldIssue {
                path: node_path.clone(),
                kinds: node.errors().kinds(),
            })
            .collect();

        if issues.is_empty() {
            Ok(self.value())
        } else {
            issues.sort_by(|a, b| a.path.cmp(&b.path));
            log::debug!("submission refused: {} invalid node(s)", issues.len());
            Err(SubmitError { issues })
        }
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Registers an observer invoked synchronously whenever the field's
    /// value actually changes. Dispose with
    /// [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe(
        &mut self,
        path: &str,
        observer: impl FnMut(&Value) + Send + 'static,
    ) -> Result<Subscription, PathError> {
        self.field(path)?;
        Ok(self
            .observers
            .subscribe(path.to_string(), None, Box::new(observer)))
    }

    /// Registers a trailing-edge debounced observer: it fires no earlier
    /// than `quiet` after the last change to the field, carrying the
    /// last value; newer changes supersede the pending invocation.
    ///
    /// Delivery is pumped by [`tick`](Self::tick);
    /// [`DEFAULT_DEBOUNCE`](crate::DEFAULT_DEBOUNCE) is the conventional
    /// quiet period.
    pub fn subscribe_debounced(
        &mut self,
        path: &str,
        quiet: Duration,
        observer: impl FnMut(&Value) + Send + 'static,
    ) -> Result<Subscription, PathError> {
        self.field(path)?;
        Ok(self
            .observers
            .subscribe(path.to_string(), Some(quiet), Box::new(observer)))
    }

    /// Disposes a subscription; pending debounced invocations are
    /// discarded.
    pub fn unsubscribe(&mut self, sub: Subscription) {
        self.observers.unsubscribe(sub);
    }

    /// Fires every debounced notification whose quiet period has
    /// elapsed as of `now`.
    pub fn tick(&mut self, now: Instant) {
        self.observers.tick(now);
    }

    /// Earliest pending debounce deadline, so an event loop can sleep
    /// until exactly the next delivery.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.observers.next_deadline()
    }

    // =========================================================================
    // Evaluation
    // =========================================================================

    fn evaluate_node(&mut self, path: &str) {
        let violations = match self.nodes.get(path) {
            Some(Node::Field(field)) => {
                let scope = SiblingScope {
                    nodes: &self.nodes,
                    group: paths::parent(path),
                };
                Some(collect_violations(&field.rules, &field.value, &scope))
            }
            Some(Node::Group(group)) => {
                let scope = SiblingScope {
                    nodes: &self.nodes,
                    group: path,
                };
                Some(collect_violations(&group.rules, &Value::Null, &scope))
            }
            _ => None,
        };

        if let Some(violations) = violations {
            match self.nodes.get_mut(path) {
                Some(Node::Field(field)) => field.errors = ErrorSet::from_violations(violations),
                Some(Node::Group(group)) => group.errors = ErrorSet::from_violations(violations),
                _ => {}
            }
        }
    }

    fn evaluate_ancestors(&mut self, path: &str) {
        let mut current = path;
        while !current.is_empty() {
            current = paths::parent(current);
            self.evaluate_node(current);
        }
    }
}

fn collect_violations(rules: &[Rule], value: &Value, scope: &dyn Scope) -> Vec<Violation> {
    rules
        .iter()
        .filter_map(|rule| rule.evaluate(value, scope))
        .collect()
}

/// Sibling accessor backed by the arena, rooted at one group.
struct SiblingScope<'a> {
    nodes: &'a HashMap<String, Node>,
    group: &'a str,
}

impl Scope for SiblingScope<'_> {
    fn sibling(&self, key: &str) -> Option<(&Value, bool)> {
        match self.nodes.get(&paths::join(self.group, key))? {
            Node::Field(field) => Some((&field.value, field.flags.is_pristine())),
            _ => None,
        }
    }
}

fn json_leaf(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        // Objects and arrays are handled structurally before this point.
        other => Value::String(other.to_string()),
    }
}

/// Recursively inserts a schema subtree into the arena.
///
/// Structural checks happen here: duplicate keys, unknown cross-field
/// targets, and non-group list entries are rejected before any node of
/// the offending subtree lands.
pub(crate) fn insert_schema(
    nodes: &mut HashMap<String, Node>,
    path: String,
    schema: Schema,
) -> Result<(), SchemaError> {
    match schema {
        Schema::Field { initial, rules } => {
            nodes.insert(path, Node::Field(Field::new(initial, rules)));
        }
        Schema::Group { children, rules } => {
            let mut keys: Vec<String> = Vec::with_capacity(children.len());
            for (key, _) in &children {
                if keys.contains(key) {
                    return Err(SchemaError::DuplicateKey {
                        group: paths::display(&path),
                        key: key.clone(),
                    });
                }
                keys.push(key.clone());
            }

            check_sibling_refs(&rules, &keys, &paths::display(&path))?;
            for (key, child) in &children {
                if let Schema::Field { rules: child_rules, .. } = child {
                    check_sibling_refs(child_rules, &keys, &paths::join(&path, key))?;
                }
            }

            for (key, child) in children {
                let child_path = paths::join(&path, &key);
                insert_schema(nodes, child_path, child)?;
            }
            nodes.insert(
                path,
                Node::Group(Group {
                    children: keys,
                    rules,
                    errors: ErrorSet::default(),
                }),
            );
        }
        Schema::List { entries } => {
            let len = entries.len();
            for (index, entry) in entries.into_iter().enumerate() {
                if !matches!(entry, Schema::Group { .. }) {
                    return Err(SchemaError::EntryNotGroup {
                        list: paths::display(&path),
                    });
                }
                let entry_path = paths::join(&path, &index.to_string());
                insert_schema(nodes, entry_path, entry)?;
            }
            nodes.insert(path, Node::List(List { len }));
        }
    }
    Ok(())
}

fn check_sibling_refs(rules: &[Rule], keys: &[String], owner: &str) -> Result<(), SchemaError> {
    for rule in rules {
        for target in rule.sibling_refs() {
            if !keys.iter().any(|key| key == target) {
                return Err(SchemaError::UnknownRuleTarget {
                    owner: owner.to_string(),
                    target: target.to_string(),
                });
            }
        }
    }
    Ok(())
}
