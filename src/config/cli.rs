use crate::domain::vehicle::{DEFAULT_DISPLACEMENT_CC, DEFAULT_DOOR_COUNT};
use clap::Subcommand;
use serde_json::Value;

/// One desk operation. Vehicle, client and contract numbers are the
/// 1-based positions shown by the listing commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Register a new client
    AddClient {
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        phone: String,
    },
    /// Add a car to the catalog
    AddCar {
        #[arg(long)]
        brand: String,
        #[arg(long)]
        model: String,
        #[arg(long)]
        year: u32,
        #[arg(long)]
        daily_rate: f64,
        #[arg(long, default_value_t = DEFAULT_DOOR_COUNT)]
        doors: u32,
        #[arg(long)]
        registration: Option<String>,
    },
    /// Add a motorcycle to the catalog
    AddMotorcycle {
        #[arg(long)]
        brand: String,
        #[arg(long)]
        model: String,
        #[arg(long)]
        year: u32,
        #[arg(long)]
        daily_rate: f64,
        #[arg(long, default_value_t = DEFAULT_DISPLACEMENT_CC)]
        displacement: u32,
        #[arg(long)]
        registration: Option<String>,
    },
    /// Price a rental without signing it
    Quote {
        #[arg(long)]
        vehicle: usize,
        #[arg(long)]
        days: u32,
    },
    /// Sign a rental contract for an available vehicle
    Rent {
        #[arg(long)]
        client: usize,
        #[arg(long)]
        vehicle: usize,
        #[arg(long)]
        days: u32,
    },
    /// Attach a payment method to a contract
    Pay {
        #[arg(long)]
        contract: usize,
        #[arg(long)]
        kind: String,
        #[arg(long = "detail", value_parser = parse_detail, help = "key=value, repeatable")]
        details: Vec<(String, Value)>,
    },
    /// Set a vehicle's availability flag (true or false)
    Availability {
        #[arg(long)]
        vehicle: usize,
        #[arg(long)]
        state: String,
    },
    /// List vehicles
    Vehicles {
        #[arg(long, help = "Only list vehicles that can be rented")]
        available: bool,
    },
    /// List clients
    Clients,
    /// List contracts
    Contracts,
}

/// Parses `key=value`. The value is read as a JSON scalar when it is one
/// (`3`, `true`, `"x"`), otherwise kept as plain text.
pub fn parse_detail(raw: &str) -> std::result::Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{}'", raw));
    }

    let value = match serde_json::from_str::<Value>(value) {
        Ok(parsed) if !parsed.is_array() && !parsed.is_object() && !parsed.is_null() => parsed,
        _ => Value::String(value.to_string()),
    };
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detail(key: &str, value: Value) -> (String, Value) {
        (key.to_string(), value)
    }

    #[test]
    fn test_parse_detail_scalars() {
        assert_eq!(parse_detail("installments=3").unwrap(), detail("installments", json!(3)));
        assert_eq!(parse_detail("verified=true").unwrap(), detail("verified", json!(true)));
        assert_eq!(parse_detail("bank=CBAO").unwrap(), detail("bank", json!("CBAO")));
        assert_eq!(parse_detail("note=[1]").unwrap(), detail("note", json!("[1]")));
    }

    #[test]
    fn test_parse_detail_requires_key() {
        assert!(parse_detail("no-separator").is_err());
        assert!(parse_detail("=value").is_err());
    }
}
