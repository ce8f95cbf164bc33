use order_dlq::models::{FailureCategory, Order};
use proptest::prelude::*;
use proptest::strategy::Just;
use serde_json::json;

/// Strategy for non-blank identifiers (orderId, userId)
pub fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9_-]{0,31}"
}

/// Strategy for empty or whitespace-only identifiers
pub fn blank_identifier_strategy() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[ \t]{1,4}"]
}

/// Strategy for amounts the validator accepts
pub fn positive_amount_strategy() -> impl Strategy<Value = f64> {
    0.01f64..1_000_000.0
}

/// Strategy for undeclared field names
pub fn extra_field_name_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,8}".prop_filter("must not collide with declared fields", |name| {
        !matches!(name.as_str(), "orderid" | "userid" | "amount")
    })
}

/// Strategy for orders that pass every rule
pub fn valid_order_strategy() -> impl Strategy<Value = Order> {
    (
        identifier_strategy(),
        identifier_strategy(),
        positive_amount_strategy(),
    )
        .prop_map(|(order_id, user_id, amount)| Order::new(order_id, user_id, Some(amount)))
}

/// Strategy for orders missing `orderId` with arbitrary other field states
pub fn order_missing_id_strategy() -> impl Strategy<Value = Order> {
    (
        prop::option::of(blank_identifier_strategy()),
        prop::option::of(prop_oneof![identifier_strategy(), blank_identifier_strategy()]),
        prop::option::of(-100.0f64..100.0),
        prop::collection::vec(extra_field_name_strategy(), 0..3),
    )
        .prop_map(|(order_id, user_id, amount, extras)| {
            let mut order = Order {
                order_id,
                user_id,
                amount,
                ..Order::default()
            };
            for name in extras {
                order.additional_fields.insert(name, json!("x"));
            }
            order
        })
}

/// Strategy for arbitrary reason text, including characters that need escaping
pub fn reason_strategy() -> impl Strategy<Value = String> {
    "[ -~\n\t\"\\\\]{0,64}"
}

/// Strategy for arbitrary payload text, including non-JSON and unicode
pub fn payload_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<String>(),
        Just(r#"{"orderId":"o1","userId":"u1","amount":10}"#.to_string()),
        Just("{not json".to_string()),
    ]
}

pub fn category_strategy() -> impl Strategy<Value = FailureCategory> {
    prop::sample::select(FailureCategory::ALL.to_vec())
}
