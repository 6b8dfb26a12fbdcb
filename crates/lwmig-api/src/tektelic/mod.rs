// Tektelic device inventory client
//
// Read-only access to the source network server: device listings per
// application or per customer, with LoRaWAN credentials inline.

pub mod client;
pub mod models;

pub use client::TektelicClient;
pub use models::{DeviceCollection, SourceDevice};
