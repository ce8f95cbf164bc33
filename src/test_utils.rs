//! # Test Utilities
//!
//! Payload fixtures and environment helpers shared by unit and integration
//! tests.

use std::env;

/// Accepted by the validator
pub const VALID_ORDER: &str = r#"{"orderId":"o1","userId":"u1","amount":10}"#;
/// Fails the `userId` rule
pub const MISSING_USER_ORDER: &str = r#"{"orderId":"o1","amount":10}"#;
/// Fails the unexpected-fields rule
pub const EXTRA_FIELD_ORDER: &str = r#"{"orderId":"o1","userId":"u1","amount":10,"extra":"x"}"#;
/// Fails the positive-amount rule
pub const NEGATIVE_AMOUNT_ORDER: &str = r#"{"orderId":"o1","userId":"u1","amount":-3}"#;
/// Not JSON at all
pub const UNPARSEABLE_PAYLOAD: &str = "this is not json";

/// Build a valid order payload with the given id
pub fn valid_order_json(order_id: &str) -> String {
    serde_json::json!({
        "orderId": order_id,
        "userId": "u1",
        "amount": 10
    })
    .to_string()
}

/// Set `DLQ_ENV=test` unless an environment is already selected
pub fn setup_test_environment() {
    if env::var("DLQ_ENV").is_err() {
        env::set_var("DLQ_ENV", "test");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::OrderValidator;

    #[test]
    fn test_fixtures_classify_as_documented() {
        let validator = OrderValidator::new();
        assert!(validator.classify(VALID_ORDER).is_ok());
        assert!(validator.classify(&valid_order_json("o9")).is_ok());
        assert!(validator.classify(MISSING_USER_ORDER).is_err());
        assert!(validator.classify(EXTRA_FIELD_ORDER).is_err());
        assert!(validator.classify(NEGATIVE_AMOUNT_ORDER).is_err());
        assert!(validator.classify(UNPARSEABLE_PAYLOAD).is_err());
    }
}
