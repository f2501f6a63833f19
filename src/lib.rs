pub mod adapters;
#[cfg(feature = "cli")]
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{FileBlobStore, MemoryBlobStore};
pub use config::Settings;
pub use crate::core::{agency::Agency, persistence::PersistenceService};
pub use domain::{
    client::Client, contract::Contract, model::Fleet, payment::PaymentMethod,
    vehicle::{Vehicle, VehicleKind},
};
pub use utils::error::{RentalError, Result};
