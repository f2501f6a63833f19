use crate::config::cli::Command;
use crate::core::agency::Agency;
use crate::core::{Client, Result, Vehicle};
use crate::domain::payment::PaymentMethod;
use crate::utils::error::RentalError;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOutcome {
    /// Lines for the user, in display order.
    pub lines: Vec<String>,
    /// Whether the agency must be saved afterwards.
    pub mutated: bool,
}

impl CommandOutcome {
    fn read(lines: Vec<String>) -> Self {
        Self {
            lines,
            mutated: false,
        }
    }

    fn changed(lines: Vec<String>) -> Self {
        Self {
            lines,
            mutated: true,
        }
    }
}

pub fn execute(agency: &mut Agency, command: &Command) -> Result<CommandOutcome> {
    tracing::debug!("Executing {:?}", command);

    match command {
        Command::AddClient {
            last_name,
            first_name,
            phone,
        } => {
            let client = Client::new(last_name.as_str(), first_name.as_str(), phone.as_str());
            let index = agency.add_client(client);
            Ok(CommandOutcome::changed(vec![format!(
                "Client #{} added: {}",
                index + 1,
                agency.clients()[index]
            )]))
        }
        Command::AddCar {
            brand,
            model,
            year,
            daily_rate,
            doors,
            registration,
        } => {
            let vehicle = Vehicle::car(brand.as_str(), model.as_str(), *year, *daily_rate, *doors);
            add_vehicle(agency, vehicle, registration.as_deref())
        }
        Command::AddMotorcycle {
            brand,
            model,
            year,
            daily_rate,
            displacement,
            registration,
        } => {
            let vehicle = Vehicle::motorcycle(
                brand.as_str(),
                model.as_str(),
                *year,
                *daily_rate,
                *displacement,
            );
            add_vehicle(agency, vehicle, registration.as_deref())
        }
        Command::Quote { vehicle, days } => {
            let index = position("vehicle", *vehicle)?;
            let price = agency.quote(index, *days)?;
            Ok(CommandOutcome::read(vec![format!(
                "{} for {} days: {}",
                agency.vehicles()[index],
                days,
                price
            )]))
        }
        Command::Rent {
            client,
            vehicle,
            days,
        } => {
            let client = position("client", *client)?;
            let vehicle = position("vehicle", *vehicle)?;
            let contract = agency.rent(client, vehicle, *days)?;
            let mut lines = vec!["Contract signed".to_string()];
            lines.extend(contract.describe().lines().map(str::to_string));
            let number = agency.contracts().len();
            lines.push(format!("Contract number: {}", number));
            Ok(CommandOutcome::changed(lines))
        }
        Command::Pay {
            contract,
            kind,
            details,
        } => {
            let method = details
                .iter()
                .try_fold(PaymentMethod::new(kind.as_str()), |method, (key, value)| {
                    method.with_detail(key.as_str(), value.clone())
                })?;
            let line = format!("Contract #{} will be paid by {}", contract, method);
            agency.set_payment_method(position("contract", *contract)?, method)?;
            Ok(CommandOutcome::changed(vec![line]))
        }
        Command::Availability { vehicle, state } => {
            let index = position("vehicle", *vehicle)?;
            let value =
                serde_json::from_str(state).unwrap_or_else(|_| Value::String(state.clone()));
            agency.set_vehicle_availability(index, &value)?;
            Ok(CommandOutcome::changed(vec![format!(
                "Vehicle #{} is now {}",
                vehicle,
                availability_label(&agency.vehicles()[index])
            )]))
        }
        Command::Vehicles { available } => {
            let lines: Vec<String> = agency
                .vehicles()
                .iter()
                .enumerate()
                .filter(|(_, v)| !*available || v.is_available())
                .map(|(i, v)| format!("{}. {} [{}]", i + 1, v, availability_label(v)))
                .collect();
            Ok(CommandOutcome::read(or_placeholder(lines, "No vehicles.")))
        }
        Command::Clients => {
            let lines = agency
                .clients()
                .iter()
                .enumerate()
                .map(|(i, c)| format!("{}. {}", i + 1, c))
                .collect();
            Ok(CommandOutcome::read(or_placeholder(lines, "No clients.")))
        }
        Command::Contracts => {
            let mut lines = Vec::new();
            for (i, contract) in agency.contracts().iter().enumerate() {
                lines.push(format!("Contract #{}", i + 1));
                lines.extend(contract.describe().lines().map(str::to_string));
            }
            Ok(CommandOutcome::read(or_placeholder(lines, "No contracts.")))
        }
    }
}

fn add_vehicle(
    agency: &mut Agency,
    vehicle: Vehicle,
    registration: Option<&str>,
) -> Result<CommandOutcome> {
    let vehicle = match registration {
        Some(registration) => vehicle.with_registration(registration),
        None => vehicle,
    };
    let index = agency.add_vehicle(vehicle)?;
    Ok(CommandOutcome::changed(vec![format!(
        "Vehicle #{} added: {}",
        index + 1,
        agency.vehicles()[index]
    )]))
}

/// Converts a 1-based number from the listings into an index.
fn position(what: &str, number: usize) -> Result<usize> {
    number
        .checked_sub(1)
        .ok_or_else(|| RentalError::not_found(what, number))
}

fn availability_label(vehicle: &Vehicle) -> &'static str {
    if vehicle.is_available() {
        "available"
    } else {
        "rented"
    }
}

fn or_placeholder(lines: Vec<String>, placeholder: &str) -> Vec<String> {
    if lines.is_empty() {
        vec![placeholder.to_string()]
    } else {
        lines
    }
}
