//! # Order
//!
//! The payload shape accepted on the input channel. Fields outside the
//! declared schema are captured rather than rejected at decode time so the
//! validator can report them by name.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: Option<String>,
    pub user_id: Option<String>,
    pub amount: Option<f64>,
    /// Any field not declared above
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

impl Order {
    pub fn new(
        order_id: impl Into<String>,
        user_id: impl Into<String>,
        amount: Option<f64>,
    ) -> Self {
        Self {
            order_id: Some(order_id.into()),
            user_id: Some(user_id.into()),
            amount,
            additional_fields: Map::new(),
        }
    }

    /// Builder-style helper for attaching an undeclared field
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.additional_fields.insert(key.into(), value);
        self
    }

    pub fn has_additional_fields(&self) -> bool {
        !self.additional_fields.is_empty()
    }

    /// Names of undeclared fields, sorted for stable reasons
    pub fn unexpected_field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.additional_fields.keys().cloned().collect();
        names.sort();
        names
    }
}
