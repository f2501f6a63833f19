use crate::domain::client::Client;
use crate::domain::contract::Contract;
use crate::domain::vehicle::Vehicle;

/// Everything the persisted document holds, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fleet {
    pub vehicles: Vec<Vehicle>,
    pub clients: Vec<Client>,
    pub contracts: Vec<Contract>,
}

impl Fleet {
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty() && self.clients.is_empty() && self.contracts.is_empty()
    }
}
