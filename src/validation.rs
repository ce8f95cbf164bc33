//! Order validation for the ingest path
//!
//! Decoding and validation each return a `(reason, category)` pair directly,
//! so the category is never inferred from the reason text downstream.
//!
//! Rules run in a fixed order and the first failure wins. An order missing
//! `orderId` that also carries extra fields is reported as the missing field.

use serde_json::Value;

use crate::constants::reasons;
use crate::models::{FailureCategory, Order};

/// Why a message was rejected, and how it is classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub reason: String,
    pub category: FailureCategory,
}

impl Rejection {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            category: FailureCategory::ValidationError,
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            category: FailureCategory::MalformedError,
        }
    }
}

/// Outcome of running the rule chain over a decoded order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid {
        reason: String,
        category: FailureCategory,
    },
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }
}

impl From<Rejection> for ValidationOutcome {
    fn from(rejection: Rejection) -> Self {
        ValidationOutcome::Invalid {
            reason: rejection.reason,
            category: rejection.category,
        }
    }
}

/// Decode a raw inbound payload into an [`Order`]
///
/// Text that is not a JSON object is malformed. A JSON object whose declared
/// fields carry the wrong types (`"amount": "ten"`) is a validation failure.
pub fn decode_order(raw: &str) -> Result<Order, Rejection> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| Rejection::malformed(format!("{}{e}", reasons::MALFORMED_JSON_PREFIX)))?;

    if !value.is_object() {
        return Err(Rejection::malformed(format!(
            "{}expected a JSON object",
            reasons::MALFORMED_JSON_PREFIX
        )));
    }

    serde_json::from_value(value)
        .map_err(|e| Rejection::validation(format!("{}{e}", reasons::VALIDATION_ERROR_PREFIX)))
}

type Rule = fn(&Order) -> Option<Rejection>;

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, |value| value.trim().is_empty())
}

fn require_order_id(order: &Order) -> Option<Rejection> {
    is_blank(&order.order_id).then(|| Rejection::validation(reasons::MISSING_ORDER_ID))
}

fn require_user_id(order: &Order) -> Option<Rejection> {
    is_blank(&order.user_id).then(|| Rejection::validation(reasons::MISSING_USER_ID))
}

fn require_amount(order: &Order) -> Option<Rejection> {
    order
        .amount
        .is_none()
        .then(|| Rejection::validation(reasons::MISSING_AMOUNT))
}

fn positive_amount(order: &Order) -> Option<Rejection> {
    match order.amount {
        Some(amount) if amount <= 0.0 => Some(Rejection::validation(reasons::INVALID_AMOUNT)),
        _ => None,
    }
}

fn no_unexpected_fields(order: &Order) -> Option<Rejection> {
    order.has_additional_fields().then(|| {
        Rejection::malformed(format!(
            "{} [{}]",
            reasons::UNEXPECTED_FIELDS_PREFIX,
            order.unexpected_field_names().join(", ")
        ))
    })
}

/// Ordered rule chain applied to every decoded order
#[derive(Debug, Clone)]
pub struct OrderValidator {
    rules: Vec<Rule>,
}

impl Default for OrderValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderValidator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                require_order_id,
                require_user_id,
                require_amount,
                positive_amount,
                no_unexpected_fields,
            ],
        }
    }

    pub fn validate(&self, order: &Order) -> ValidationOutcome {
        self.rules
            .iter()
            .find_map(|rule| rule(order))
            .map_or(ValidationOutcome::Valid, ValidationOutcome::from)
    }

    /// Decode then validate a raw payload in one step
    pub fn classify(&self, raw: &str) -> Result<Order, Rejection> {
        let order = decode_order(raw)?;
        match self.validate(&order) {
            ValidationOutcome::Valid => Ok(order),
            ValidationOutcome::Invalid { reason, category } => Err(Rejection { reason, category }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn invalid(outcome: ValidationOutcome) -> (String, FailureCategory) {
        match outcome {
            ValidationOutcome::Invalid { reason, category } => (reason, category),
            ValidationOutcome::Valid => panic!("expected an invalid outcome"),
        }
    }

    #[test]
    fn test_valid_order() {
        let validator = OrderValidator::new();
        assert!(validator.validate(&Order::new("o1", "u1", Some(10.0))).is_valid());
    }

    #[test]
    fn test_blank_order_id_is_missing() {
        let validator = OrderValidator::new();
        let (reason, category) = invalid(validator.validate(&Order::new("   ", "u1", Some(1.0))));
        assert_eq!(reason, "Missing required field: orderId");
        assert_eq!(category, FailureCategory::ValidationError);
    }

    #[test]
    fn test_missing_user_id() {
        let validator = OrderValidator::new();
        let order = Order {
            user_id: None,
            ..Order::new("o1", "", Some(1.0))
        };
        let (reason, _) = invalid(validator.validate(&order));
        assert_eq!(reason, "Missing required field: userId");
    }

    #[test]
    fn test_missing_amount() {
        let validator = OrderValidator::new();
        let (reason, category) = invalid(validator.validate(&Order::new("o1", "u1", None)));
        assert_eq!(reason, "Missing required field: amount");
        assert_eq!(category, FailureCategory::ValidationError);
    }

    #[test]
    fn test_non_positive_amount() {
        let validator = OrderValidator::new();
        for amount in [0.0, -5.0] {
            let (reason, _) = invalid(validator.validate(&Order::new("o1", "u1", Some(amount))));
            assert_eq!(reason, "Invalid amount: must be greater than 0");
        }
    }

    #[test]
    fn test_unexpected_fields_are_malformed_and_named() {
        let validator = OrderValidator::new();
        let order = Order::new("o1", "u1", Some(10.0))
            .with_field("extra", json!("x"))
            .with_field("another", json!(1));

        let (reason, category) = invalid(validator.validate(&order));
        assert_eq!(category, FailureCategory::MalformedError);
        assert_eq!(reason, "Malformed JSON: unexpected fields [another, extra]");
    }

    #[test]
    fn test_missing_order_id_takes_precedence_over_extra_fields() {
        let validator = OrderValidator::new();
        let order = Order {
            order_id: None,
            ..Order::new("", "u1", Some(-1.0)).with_field("extra", json!(true))
        };

        let (reason, category) = invalid(validator.validate(&order));
        assert!(reason.contains("orderId"));
        assert_eq!(category, FailureCategory::ValidationError);
    }

    #[test]
    fn test_decode_unparseable_payload_is_malformed() {
        let rejection = decode_order("not json at all").unwrap_err();
        assert_eq!(rejection.category, FailureCategory::MalformedError);
        assert!(rejection.reason.starts_with("Malformed JSON: "));
    }

    #[test]
    fn test_decode_non_object_is_malformed() {
        let rejection = decode_order("[1, 2, 3]").unwrap_err();
        assert_eq!(rejection.category, FailureCategory::MalformedError);
        assert_eq!(rejection.reason, "Malformed JSON: expected a JSON object");
    }

    #[test]
    fn test_decode_type_mismatch_is_validation_error() {
        let rejection =
            decode_order(r#"{"orderId":"o1","userId":"u1","amount":"ten"}"#).unwrap_err();
        assert_eq!(rejection.category, FailureCategory::ValidationError);
        assert!(rejection.reason.starts_with("Validation error: "));
    }

    #[test]
    fn test_classify_end_to_end() {
        let validator = OrderValidator::new();

        let order = validator
            .classify(r#"{"orderId":"o1","userId":"u1","amount":5}"#)
            .unwrap();
        assert_eq!(order.order_id.as_deref(), Some("o1"));

        let rejection = validator
            .classify(r#"{"orderId":"o1","userId":"u1","amount":5,"extra":"x"}"#)
            .unwrap_err();
        assert_eq!(rejection.category, FailureCategory::MalformedError);
        assert!(rejection.reason.contains("extra"));
    }
}
