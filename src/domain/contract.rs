use crate::domain::client::Client;
use crate::domain::payment::PaymentMethod;
use crate::domain::vehicle::Vehicle;
use crate::utils::error::{RentalError, Result};
use crate::utils::validation::validate_positive;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// A rental agreement. The contract keeps its own copies of the client and
/// the vehicle as they were when it was signed; later edits to the catalog
/// entries do not reach it.
#[derive(Debug, Clone, PartialEq)]
pub struct Contract {
    client: Client,
    vehicle: Vehicle,
    duration_days: u32,
    total_price: f64,
    payment_method: Option<PaymentMethod>,
}

impl Contract {
    /// Prices the rental and marks `vehicle` unavailable.
    ///
    /// The vehicle's current availability is not checked: renting a vehicle
    /// that is already out still succeeds. Callers that must prevent double
    /// booking filter beforehand (see [`crate::core::agency::Agency::rent`]).
    pub fn new(client: &Client, vehicle: &mut Vehicle, duration_days: u32) -> Result<Self> {
        if !vehicle.is_available() {
            tracing::warn!(
                "Creating a contract for {} {} although it is already rented out",
                vehicle.brand,
                vehicle.model
            );
        }
        Self::sign(client, vehicle, duration_days)
    }

    fn sign(client: &Client, vehicle: &mut Vehicle, duration_days: u32) -> Result<Self> {
        validate_positive("duration_days", duration_days)?;
        let total_price = vehicle.rental_price(duration_days);
        vehicle.set_available(false);

        Ok(Self {
            client: client.clone(),
            vehicle: vehicle.clone(),
            duration_days,
            total_price,
            payment_method: None,
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }

    pub fn total_price(&self) -> f64 {
        self.total_price
    }

    pub fn payment_method(&self) -> Option<&PaymentMethod> {
        self.payment_method.as_ref()
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = Some(method);
    }

    pub fn describe(&self) -> String {
        self.to_string()
    }

    pub fn to_document(&self) -> Value {
        serde_json::json!({
            "client": self.client.to_document(),
            "vehicule": self.vehicle.to_document(),
            "nb_jours": self.duration_days,
            "montant_total": self.total_price,
            "mode_paiement": self.payment_method.as_ref().map(PaymentMethod::to_document),
        })
    }

    /// Rebuilds the nested client and vehicle, signs a fresh contract over
    /// them, then restores the stored total when the document has one.
    /// Signing always leaves the nested vehicle unavailable.
    pub fn from_document(doc: &Value) -> Result<Self> {
        let raw = ContractDocument::deserialize(doc).map_err(|e| RentalError::malformed("", e))?;

        let client = Client::from_document(&raw.client).map_err(|e| e.within("client"))?;
        let mut vehicle =
            Vehicle::from_document(&raw.vehicle).map_err(|e| e.within("vehicule"))?;
        validate_positive("nb_jours", raw.duration_days).map_err(RentalError::in_document)?;

        let mut contract = Self::sign(&client, &mut vehicle, raw.duration_days)?;

        if let Some(total_price) = raw.total_price {
            contract.total_price = total_price;
        }
        if let Some(method) = raw.payment_method.filter(|m| !m.is_null()) {
            let method =
                PaymentMethod::from_document(&method).map_err(|e| e.within("mode_paiement"))?;
            contract.payment_method = Some(method);
        }

        Ok(contract)
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== Rental contract =====")?;
        writeln!(f, "{}", self.client)?;
        writeln!(f, "{}", self.vehicle)?;
        writeln!(f, "Duration: {} days", self.duration_days)?;
        writeln!(f, "Total: {}", self.total_price)?;
        if let Some(method) = &self.payment_method {
            writeln!(f, "Payment: {}", method)?;
        }
        write!(f, "===========================")
    }
}

#[derive(Deserialize)]
struct ContractDocument {
    client: Value,
    #[serde(rename = "vehicule")]
    vehicle: Value,
    #[serde(rename = "nb_jours")]
    duration_days: u32,
    #[serde(rename = "montant_total", default)]
    total_price: Option<f64>,
    #[serde(rename = "mode_paiement", default)]
    payment_method: Option<Value>,
}
