use crate::utils::error::{RentalError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Client {
    #[serde(rename = "nom", default)]
    pub last_name: String,
    #[serde(rename = "prenom", default)]
    pub first_name: String,
    #[serde(rename = "telephone", default)]
    pub phone_number: String,
}

impl Client {
    pub fn new(
        last_name: impl Into<String>,
        first_name: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            last_name: last_name.into(),
            first_name: first_name.into(),
            phone_number: phone_number.into(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn describe(&self) -> String {
        self.to_string()
    }

    pub fn to_document(&self) -> Value {
        serde_json::json!({
            "nom": self.last_name,
            "prenom": self.first_name,
            "telephone": self.phone_number,
        })
    }

    /// Missing fields load as empty strings.
    pub fn from_document(doc: &Value) -> Result<Self> {
        Client::deserialize(doc).map_err(|e| RentalError::malformed("", e))
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Client: {} {} - Phone: {}",
            self.first_name, self.last_name, self.phone_number
        )
    }
}
