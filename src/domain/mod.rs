// Domain layer: entities, pricing and document conversion. No I/O here;
// storage is reached only through the ports.

pub mod client;
pub mod contract;
pub mod model;
pub mod payment;
pub mod ports;
pub mod vehicle;
