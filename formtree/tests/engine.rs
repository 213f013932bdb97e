use formtree::{ErrorKind, FormEngine, Node, PathError, Rule, Schema, SchemaError, Value};

fn sample_schema() -> Schema {
    Schema::group()
        .child("name", Schema::field("").rules([Rule::Required, Rule::MinLength(3)]))
        .child("rating", Schema::field(Value::Null).rule(Rule::range(1.0, 5.0)))
        .child(
            "pair",
            Schema::group()
                .child("email", Schema::field("").rule(Rule::Email))
                .child("confirm", Schema::field(""))
                .rule(Rule::match_fields("email", "confirm")),
        )
        .child("entries", Schema::list())
}

fn entry_template() -> Schema {
    Schema::group()
        .child("kind", Schema::field("home"))
        .child("street", Schema::field(""))
}

// ============================================================================
// Build
// ============================================================================

#[test]
fn build_resolves_paths() {
    let engine = FormEngine::build(sample_schema()).unwrap();

    assert!(matches!(engine.get("").unwrap(), Node::Group(_)));
    assert!(engine.field("pair.email").is_ok());
    assert!(engine.group("pair").is_ok());
    assert!(engine.list("entries").is_ok());
    assert_eq!(engine.group("").unwrap().keys(), ["name", "rating", "pair", "entries"]);
}

#[test]
fn build_evaluates_immediately() {
    let engine = FormEngine::build(sample_schema()).unwrap();

    // `name` is required and empty, so the tree starts invalid.
    assert!(engine.errors_for("name").unwrap().has(ErrorKind::Required));
    assert!(!engine.is_valid());
    assert!(engine.is_valid_at("pair").unwrap());
}

#[test]
fn build_rejects_duplicate_keys() {
    let schema = Schema::group()
        .child("name", Schema::field(""))
        .child("name", Schema::field(""));

    assert!(matches!(
        FormEngine::build(schema),
        Err(SchemaError::DuplicateKey { key, .. }) if key == "name"
    ));
}

#[test]
fn build_rejects_unknown_match_target() {
    let schema = Schema::group().child(
        "pair",
        Schema::group()
            .child("email", Schema::field(""))
            .rule(Rule::match_fields("email", "confirm")),
    );

    assert!(matches!(
        FormEngine::build(schema),
        Err(SchemaError::UnknownRuleTarget { target, .. }) if target == "confirm"
    ));
}

#[test]
fn build_rejects_non_group_root() {
    assert!(matches!(
        FormEngine::build(Schema::field("")),
        Err(SchemaError::RootNotGroup)
    ));
}

#[test]
fn build_rejects_non_group_list_entry() {
    let schema = Schema::group().child("entries", Schema::list().entry(Schema::field("")));

    assert!(matches!(
        FormEngine::build(schema),
        Err(SchemaError::EntryNotGroup { .. })
    ));
}

// ============================================================================
// Values and flags
// ============================================================================

#[test]
fn set_value_flips_flags_once() {
    let mut engine = FormEngine::build(sample_schema()).unwrap();
    let before = engine.flags_at("name").unwrap();
    assert!(before.is_pristine() && !before.is_dirty());

    engine.set_value("name", "Ada").unwrap();
    let after = engine.flags_at("name").unwrap();
    assert!(!after.is_pristine() && after.is_dirty());
    assert_eq!(engine.field("name").unwrap().value(), &Value::from("Ada"));
}

#[test]
fn set_value_with_identical_value_keeps_pristine() {
    let mut engine = FormEngine::build(sample_schema()).unwrap();

    engine.set_value("name", "").unwrap();
    assert!(engine.flags_at("name").unwrap().is_pristine());
}

#[test]
fn set_value_reports_unknown_and_non_field_paths() {
    let mut engine = FormEngine::build(sample_schema()).unwrap();

    assert!(matches!(
        engine.set_value("missing", "x"),
        Err(PathError::NotFound { .. })
    ));
    assert!(matches!(
        engine.set_value("pair", "x"),
        Err(PathError::NotAField { .. })
    ));
}

#[test]
fn set_value_revalidates_synchronously() {
    let mut engine = FormEngine::build(sample_schema()).unwrap();

    engine.set_value("name", "Jo").unwrap();
    assert!(engine.errors_for("name").unwrap().has(ErrorKind::MinLength));

    engine.set_value("name", "Joan").unwrap();
    assert!(engine.errors_for("name").unwrap().is_empty());
}

#[test]
fn mark_touched_is_independent_of_dirty() {
    let mut engine = FormEngine::build(sample_schema()).unwrap();

    engine.mark_touched("name").unwrap();
    let flags = engine.flags_at("name").unwrap();
    assert!(flags.is_touched() && flags.is_pristine() && !flags.is_dirty());
}

// ============================================================================
// Patch
// ============================================================================

#[test]
fn patch_touches_only_named_leaves() {
    let mut engine = FormEngine::build(sample_schema()).unwrap();

    engine
        .patch_values(serde_json::json!({
            "name": "Joan",
            "pair": { "email": "joan@example.com" },
        }))
        .unwrap();

    assert_eq!(engine.field("name").unwrap().value(), &Value::from("Joan"));
    assert!(engine.flags_at("name").unwrap().is_dirty());
    assert_eq!(
        engine.field("pair.email").unwrap().value(),
        &Value::from("joan@example.com")
    );

    // Untouched siblings keep value and pristine state.
    assert!(engine.flags_at("pair.confirm").unwrap().is_pristine());
    assert!(engine.flags_at("rating").unwrap().is_pristine());
    assert_eq!(engine.field("rating").unwrap().value(), &Value::Null);
}

#[test]
fn patch_rejects_unknown_keys() {
    let mut engine = FormEngine::build(sample_schema()).unwrap();

    assert!(matches!(
        engine.patch_values(serde_json::json!({ "nope": 1 })),
        Err(PathError::NotFound { .. })
    ));
}

// ============================================================================
// Dynamic validators
// ============================================================================

#[test]
fn swapping_validators_reevaluates_immediately() {
    let mut engine = FormEngine::build(sample_schema()).unwrap();
    // `pair.confirm` starts with no rules and is valid while empty.
    assert!(engine.errors_for("pair.confirm").unwrap().is_empty());

    engine.set_validators("pair.confirm", [Rule::Required]).unwrap();
    assert!(engine.errors_for("pair.confirm").unwrap().has(ErrorKind::Required));

    engine.clear_validators("pair.confirm").unwrap();
    assert!(engine.errors_for("pair.confirm").unwrap().is_empty());
}

// ============================================================================
// Lists
// ============================================================================

#[test]
fn appended_entries_start_pristine_and_independent() {
    let mut engine = FormEngine::build(sample_schema()).unwrap();
    assert_eq!(engine.list("entries").unwrap().len(), 0);

    assert_eq!(engine.append_to_list("entries", entry_template()).unwrap(), 0);
    assert_eq!(engine.append_to_list("entries", entry_template()).unwrap(), 1);
    assert_eq!(engine.list("entries").unwrap().len(), 2);

    for index in 0..2 {
        let kind = format!("entries.{index}.kind");
        assert_eq!(engine.field(&kind).unwrap().value(), &Value::from("home"));
        assert!(engine.flags_at(&kind).unwrap().is_pristine());
    }

    // Editing one entry never leaks into the other.
    engine.set_value("entries.0.street", "1 Main St").unwrap();
    assert_eq!(engine.field("entries.1.street").unwrap().value(), &Value::from(""));
    assert!(engine.flags_at("entries.1.street").unwrap().is_pristine());
}

#[test]
fn append_rejects_non_group_template() {
    let mut engine = FormEngine::build(sample_schema()).unwrap();

    assert!(engine.append_to_list("entries", Schema::field("")).is_err());
    assert!(engine.append_to_list("name", entry_template()).is_err());
    assert!(engine.append_to_list("missing", entry_template()).is_err());
}

// ============================================================================
// Export and submit
// ============================================================================

#[test]
fn value_export_mirrors_tree_shape() {
    let mut engine = FormEngine::build(sample_schema()).unwrap();
    engine.append_to_list("entries", entry_template()).unwrap();
    engine.set_value("name", "Joan").unwrap();
    engine.set_value("rating", 4i64).unwrap();

    let exported = engine.value();
    assert_eq!(exported["name"], serde_json::json!("Joan"));
    assert_eq!(exported["rating"], serde_json::json!(4));
    assert_eq!(exported["pair"]["email"], serde_json::json!(""));
    assert_eq!(exported["entries"][0]["kind"], serde_json::json!("home"));
}

#[test]
fn submit_refuses_invalid_tree_with_sorted_issues() {
    let mut engine = FormEngine::build(sample_schema()).unwrap();
    engine.set_value("rating", 9i64).unwrap();

    let refusal = engine.submit().unwrap_err();
    let paths: Vec<&str> = refusal.issues.iter().map(|issue| issue.path.as_str()).collect();
    assert_eq!(paths, ["name", "rating"]);
    assert_eq!(refusal.issues[1].kinds, vec![ErrorKind::Range]);
}

#[test]
fn submit_returns_values_when_valid() {
    let mut engine = FormEngine::build(sample_schema()).unwrap();
    engine.set_value("name", "Joan").unwrap();

    let exported = engine.submit().unwrap();
    assert_eq!(exported["name"], serde_json::json!("Joan"));
}
