pub mod agency;
pub mod persistence;

pub use crate::domain::client::Client;
pub use crate::domain::contract::Contract;
pub use crate::domain::model::Fleet;
pub use crate::domain::ports::{BlobStore, ConfigProvider};
pub use crate::domain::vehicle::Vehicle;
pub use crate::utils::error::Result;
