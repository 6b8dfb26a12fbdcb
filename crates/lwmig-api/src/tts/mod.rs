// The Things Stack client modules
//
// Hand-written client for the three v3 end-device registries (Identity,
// Network and Application Server) used for ABP provisioning.

pub mod client;
pub mod types;

pub use client::TtsClient;
