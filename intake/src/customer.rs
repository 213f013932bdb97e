//! The customer-intake form definition
//!
//! One tree: name pair, email group with confirmation, phone,
//! notification preference, rating, send-catalog flag, and a growable
//! list of postal addresses. The engine does the validating; this module
//! just declares the shape and the intake-specific wiring.

use formtree::{ErrorKind, FormEngine, MessageCatalog, PathError, Rule, Schema, Value};

/// Notification preference that makes `phone` required.
pub const NOTIFY_TEXT: &str = "text";

/// Default notification preference.
pub const NOTIFY_EMAIL: &str = "email";

/// The full customer-intake schema.
///
/// Starts with one blank address block; more are added with
/// [`add_address`].
pub fn customer_schema() -> Schema {
    Schema::group()
        .child(
            "firstName",
            Schema::field("").rules([Rule::Required, Rule::MinLength(3)]),
        )
        .child(
            "lastName",
            Schema::field("").rules([Rule::Required, Rule::MaxLength(50)]),
        )
        .child(
            "emailGroup",
            Schema::group()
                .child("email", Schema::field("").rules([Rule::Required, Rule::Email]))
                .child("confirmEmail", Schema::field("").rule(Rule::Required))
                .rule(Rule::match_fields("email", "confirmEmail")),
        )
        .child("phone", Schema::field(""))
        .child("notification", Schema::field(NOTIFY_EMAIL))
        .child("rating", Schema::field(Value::Null).rule(Rule::range(1.0, 5.0)))
        .child("sendCatalog", Schema::field(true))
        .child("addresses", Schema::list().entry(address_template()))
}

/// Template for one postal-address block.
pub fn address_template() -> Schema {
    Schema::group()
        .child("addressType", Schema::field("home"))
        .child("street1", Schema::field(""))
        .child("street2", Schema::field(""))
        .child("city", Schema::field(""))
        .child("state", Schema::field(""))
        .child("zip", Schema::field(""))
}

/// Applies the notification preference to the phone field.
///
/// Choosing text notifications makes `phone` required; any other
/// preference drops the requirement, so a previously invalid phone is
/// valid again at once. Call this after writing the `notification`
/// value (observers are read-only taps, so the reaction is an explicit
/// call).
pub fn set_notification(engine: &mut FormEngine, via: &str) -> Result<(), PathError> {
    log::debug!("notification preference set to '{via}'");
    if via == NOTIFY_TEXT {
        engine.set_validators("phone", [Rule::Required])
    } else {
        engine.clear_validators("phone")
    }
}

/// Appends one blank address block; returns its index.
pub fn add_address(engine: &mut FormEngine) -> Result<usize, formtree::FormError> {
    engine.append_to_list("addresses", address_template())
}

/// Display messages for the email field.
pub fn email_messages() -> MessageCatalog {
    MessageCatalog::new()
        .with(ErrorKind::Required, "Please enter your email address.")
        .with(ErrorKind::Email, "Please enter a valid email address.")
}

/// Patches a handful of demo values, leaving every other field
/// untouched.
pub fn populate_test_data(engine: &mut FormEngine) -> Result<(), PathError> {
    engine.patch_values(serde_json::json!({
        "firstName": "Jack",
        "lastName": "Harness",
        "sendCatalog": false,
    }))
}
