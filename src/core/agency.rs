use crate::core::persistence::PersistenceService;
use crate::core::{BlobStore, Client, Contract, Fleet, Result, Vehicle};
use crate::domain::payment::PaymentMethod;
use crate::domain::vehicle::VehicleKind;
use crate::utils::error::RentalError;
use crate::utils::validation::{validate_non_negative_rate, validate_positive};
use serde_json::Value;

/// The rental desk: vehicle catalog, client roster and signed contracts.
/// Entries are only ever appended; indices stay stable for the lifetime
/// of the agency.
#[derive(Debug, Clone, Default)]
pub struct Agency {
    vehicles: Vec<Vehicle>,
    clients: Vec<Client>,
    contracts: Vec<Contract>,
}

impl Agency {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from<S: BlobStore>(service: &PersistenceService<S>) -> Result<Self> {
        Ok(service.load()?.into())
    }

    pub fn save_to<S: BlobStore>(&self, service: &PersistenceService<S>) -> Result<()> {
        service.save(&self.vehicles, &self.clients, &self.contracts)
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn contracts(&self) -> &[Contract] {
        &self.contracts
    }

    pub fn add_client(&mut self, client: Client) -> usize {
        tracing::debug!("Adding client {}", client.full_name());
        self.clients.push(client);
        self.clients.len() - 1
    }

    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> Result<usize> {
        validate_non_negative_rate("daily_rate", vehicle.daily_rate)?;
        if let VehicleKind::Motorcycle {
            engine_displacement_cc,
        } = vehicle.kind
        {
            validate_positive("engine_displacement_cc", engine_displacement_cc)?;
        }

        tracing::debug!("Adding vehicle {}", vehicle);
        self.vehicles.push(vehicle);
        Ok(self.vehicles.len() - 1)
    }

    pub fn available_vehicles(&self) -> impl Iterator<Item = (usize, &Vehicle)> {
        self.vehicles
            .iter()
            .enumerate()
            .filter(|(_, vehicle)| vehicle.is_available())
    }

    pub fn quote(&self, vehicle_index: usize, days: u32) -> Result<f64> {
        validate_positive("days", days)?;
        Ok(self.vehicle(vehicle_index)?.rental_price(days))
    }

    /// Signs a contract for an available vehicle. Unlike [`Contract::new`],
    /// this refuses vehicles that are already rented out.
    pub fn rent(
        &mut self,
        client_index: usize,
        vehicle_index: usize,
        days: u32,
    ) -> Result<&Contract> {
        let client = self
            .clients
            .get(client_index)
            .ok_or_else(|| RentalError::not_found("client", client_index + 1))?;
        let vehicle = self
            .vehicles
            .get_mut(vehicle_index)
            .ok_or_else(|| RentalError::not_found("vehicle", vehicle_index + 1))?;

        if !vehicle.is_available() {
            return Err(RentalError::invalid_argument(
                "vehicle",
                format!("{} {} is already rented out", vehicle.brand, vehicle.model),
            ));
        }

        let contract = Contract::new(client, vehicle, days)?;
        tracing::info!(
            "Signed contract for {} on {} {}: {} days, total {}",
            contract.client().full_name(),
            contract.vehicle().brand,
            contract.vehicle().model,
            contract.duration_days(),
            contract.total_price()
        );

        self.contracts.push(contract);
        Ok(&self.contracts[self.contracts.len() - 1])
    }

    pub fn set_payment_method(
        &mut self,
        contract_index: usize,
        method: PaymentMethod,
    ) -> Result<()> {
        let contract = self
            .contracts
            .get_mut(contract_index)
            .ok_or_else(|| RentalError::not_found("contract", contract_index + 1))?;
        contract.set_payment_method(method);
        Ok(())
    }

    /// Sets availability from loosely-typed input; this is how a returned
    /// vehicle goes back into the catalog.
    pub fn set_vehicle_availability(&mut self, vehicle_index: usize, state: &Value) -> Result<()> {
        self.vehicles
            .get_mut(vehicle_index)
            .ok_or_else(|| RentalError::not_found("vehicle", vehicle_index + 1))?
            .set_availability_value(state)
    }

    fn vehicle(&self, vehicle_index: usize) -> Result<&Vehicle> {
        self.vehicles
            .get(vehicle_index)
            .ok_or_else(|| RentalError::not_found("vehicle", vehicle_index + 1))
    }
}

impl From<Fleet> for Agency {
    fn from(fleet: Fleet) -> Self {
        Self {
            vehicles: fleet.vehicles,
            clients: fleet.clients,
            contracts: fleet.contracts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryBlobStore;
    use serde_json::json;

    fn stocked_agency() -> Agency {
        let mut agency = Agency::new();
        agency.add_client(Client::new("Fall", "Ibrahima", "76"));
        agency
            .add_vehicle(Vehicle::car("Kia", "Picanto", 2020, 20000.0, 5))
            .unwrap();
        agency
            .add_vehicle(Vehicle::motorcycle("KTM", "Duke 790", 2022, 10000.0, 799))
            .unwrap();
        agency
    }

    #[test]
    fn test_rent_marks_catalog_vehicle_unavailable() {
        let mut agency = stocked_agency();
        let total = agency.rent(0, 1, 3).unwrap().total_price();

        assert_eq!(total, 34500.0);
        assert!(!agency.vehicles()[1].is_available());
        let available: Vec<usize> = agency.available_vehicles().map(|(i, _)| i).collect();
        assert_eq!(available, vec![0]);
    }

    #[test]
    fn test_rent_refuses_rented_vehicle() {
        let mut agency = stocked_agency();
        agency.rent(0, 0, 2).unwrap();
        assert!(matches!(
            agency.rent(0, 0, 2),
            Err(RentalError::InvalidArgument { .. })
        ));
        assert_eq!(agency.contracts().len(), 1);
    }

    #[test]
    fn test_unknown_indices_are_not_found() {
        let mut agency = stocked_agency();
        assert!(matches!(agency.rent(5, 0, 2), Err(RentalError::NotFound { .. })));
        assert!(matches!(agency.rent(0, 9, 2), Err(RentalError::NotFound { .. })));
        assert!(agency.set_payment_method(0, PaymentMethod::new("card")).is_err());
    }

    #[test]
    fn test_returned_vehicle_can_be_rented_again() {
        let mut agency = stocked_agency();
        agency.rent(0, 0, 2).unwrap();
        agency.set_vehicle_availability(0, &json!(true)).unwrap();
        agency.rent(0, 0, 9).unwrap();

        assert_eq!(agency.contracts()[1].total_price(), 20000.0 * 9.0 * 0.9);
        assert!(agency.set_vehicle_availability(0, &json!(1)).is_err());
    }

    #[test]
    fn test_catalog_and_contract_copies_diverge() {
        let mut agency = stocked_agency();
        agency.rent(0, 0, 2).unwrap();
        agency.set_vehicle_availability(0, &json!(true)).unwrap();

        assert!(agency.vehicles()[0].is_available());
        assert!(!agency.contracts()[0].vehicle().is_available());
    }

    #[test]
    fn test_add_vehicle_validates_rate() {
        let mut agency = Agency::new();
        assert!(agency
            .add_vehicle(Vehicle::car("Kia", "Rio", 2020, -1.0, 4))
            .is_err());
        assert!(agency
            .add_vehicle(Vehicle::motorcycle("KTM", "Duke", 2020, 1.0, 0))
            .is_err());
        assert!(agency.vehicles().is_empty());
    }

    #[test]
    fn test_quote_does_not_rent() {
        let agency = stocked_agency();
        assert_eq!(agency.quote(0, 8).unwrap(), 144000.0);
        assert!(agency.vehicles()[0].is_available());
        assert!(agency.quote(0, 0).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let service = PersistenceService::new(MemoryBlobStore::new());
        let mut agency = stocked_agency();
        agency.rent(0, 1, 3).unwrap();
        agency.save_to(&service).unwrap();

        let reloaded = Agency::load_from(&service).unwrap();
        assert_eq!(reloaded.vehicles(), agency.vehicles());
        assert_eq!(reloaded.clients(), agency.clients());
        assert_eq!(reloaded.contracts(), agency.contracts());
    }
}
