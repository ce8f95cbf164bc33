use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Order;

/// An accepted order as recorded by the valid-message store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidMessage {
    pub order_id: String,
    pub user_id: String,
    pub amount: f64,
    pub original_message: String,
    pub processed_at: DateTime<Utc>,
}

impl ValidMessage {
    pub fn new(
        order_id: impl Into<String>,
        user_id: impl Into<String>,
        amount: f64,
        original_message: impl Into<String>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            user_id: user_id.into(),
            amount,
            original_message: original_message.into(),
            processed_at: Utc::now(),
        }
    }

    /// Returns `None` when a required field is absent, which only happens
    /// for orders that did not pass validation.
    pub fn from_order(order: &Order, original_message: impl Into<String>) -> Option<Self> {
        Some(Self::new(
            order.order_id.as_deref()?,
            order.user_id.as_deref()?,
            order.amount?,
            original_message,
        ))
    }
}
