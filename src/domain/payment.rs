use crate::utils::error::{RentalError, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;

pub const UNKNOWN_KIND: &str = "unknown";

/// How a contract is settled. `kind` is free-form ("card", "wire", ...);
/// `details` holds scalar values only.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaymentMethod {
    pub kind: String,
    pub details: Map<String, Value>,
}

impl PaymentMethod {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            details: Map::new(),
        }
    }

    /// Adds a detail entry. Arrays and objects are refused.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        let key = key.into();
        let value = value.into();
        if !is_scalar(&value) {
            return Err(RentalError::invalid_argument(
                format!("details.{}", key),
                "payment details only hold scalar values",
            ));
        }
        self.details.insert(key, value);
        Ok(self)
    }

    pub fn to_document(&self) -> Value {
        serde_json::json!({
            "type_mode": self.kind,
            "details": self.details,
        })
    }

    pub fn from_document(doc: &Value) -> Result<Self> {
        let raw = PaymentDocument::deserialize(doc).map_err(|e| RentalError::malformed("", e))?;

        if let Some((key, _)) = raw.details.iter().find(|(_, value)| !is_scalar(value)) {
            return Err(RentalError::malformed(
                format!("details.{}", key),
                "expected a scalar value",
            ));
        }

        Ok(Self {
            kind: raw.kind.unwrap_or_else(|| UNKNOWN_KIND.to_string()),
            details: raw.details,
        })
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.details.is_empty() {
            let details: Vec<String> = self
                .details
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect();
            write!(f, " ({})", details.join(", "))?;
        }
        Ok(())
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

#[derive(Deserialize)]
struct PaymentDocument {
    #[serde(rename = "type_mode", default)]
    kind: Option<String>,
    #[serde(default)]
    details: Map<String, Value>,
}
