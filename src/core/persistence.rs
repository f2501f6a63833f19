use crate::core::{BlobStore, Client, Contract, Fleet, Result, Vehicle};
use crate::utils::error::RentalError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Default, Serialize, Deserialize)]
struct FleetDocument {
    #[serde(rename = "vehicules", default)]
    vehicles: Vec<Value>,
    #[serde(default)]
    clients: Vec<Value>,
    #[serde(rename = "contrats", default)]
    contracts: Vec<Value>,
}

/// Reads and writes the whole fleet through a [`BlobStore`].
pub struct PersistenceService<S: BlobStore> {
    storage: S,
}

impl<S: BlobStore> PersistenceService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn save(
        &self,
        vehicles: &[Vehicle],
        clients: &[Client],
        contracts: &[Contract],
    ) -> Result<()> {
        let data = encode(vehicles, clients, contracts)?;

        tracing::debug!(
            "Writing document '{}' ({} bytes)",
            self.storage.name(),
            data.len()
        );
        self.storage.write_blob(&data)?;

        tracing::info!(
            "Saved {} vehicles, {} clients and {} contracts",
            vehicles.len(),
            clients.len(),
            contracts.len()
        );
        Ok(())
    }

    pub fn save_fleet(&self, fleet: &Fleet) -> Result<()> {
        self.save(&fleet.vehicles, &fleet.clients, &fleet.contracts)
    }

    /// Loads the fleet. A store that has never been written to yields an
    /// empty fleet rather than an error.
    pub fn load(&self) -> Result<Fleet> {
        let Some(data) = self.storage.read_blob()? else {
            tracing::info!(
                "No data found in '{}', starting with an empty fleet",
                self.storage.name()
            );
            return Ok(Fleet::default());
        };

        tracing::debug!(
            "Read document '{}' ({} bytes)",
            self.storage.name(),
            data.len()
        );
        let fleet = decode(&data)?;

        tracing::info!(
            "Loaded {} vehicles, {} clients and {} contracts",
            fleet.vehicles.len(),
            fleet.clients.len(),
            fleet.contracts.len()
        );
        Ok(fleet)
    }
}

pub fn encode(
    vehicles: &[Vehicle],
    clients: &[Client],
    contracts: &[Contract],
) -> Result<Vec<u8>> {
    let doc = FleetDocument {
        vehicles: vehicles.iter().map(Vehicle::to_document).collect(),
        clients: clients.iter().map(Client::to_document).collect(),
        contracts: contracts.iter().map(Contract::to_document).collect(),
    };
    Ok(serde_json::to_vec_pretty(&doc)?)
}

/// Any malformed entry fails the whole decode; the error names the
/// section and position of the first bad entry.
pub fn decode(data: &[u8]) -> Result<Fleet> {
    let doc: FleetDocument =
        serde_json::from_slice(data).map_err(|e| RentalError::malformed("", e))?;

    let vehicles = decode_section(&doc.vehicles, "vehicules", Vehicle::from_document)?;
    let clients = decode_section(&doc.clients, "clients", Client::from_document)?;
    let contracts = decode_section(&doc.contracts, "contrats", Contract::from_document)?;

    Ok(Fleet {
        vehicles,
        clients,
        contracts,
    })
}

fn decode_section<T>(
    entries: &[Value],
    section: &str,
    from_document: impl Fn(&Value) -> Result<T>,
) -> Result<Vec<T>> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            from_document(entry).map_err(|e| e.within(&format!("{}[{}]", section, index)))
        })
        .collect()
}
