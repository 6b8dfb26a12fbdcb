// lwmig-api: Async Rust clients for the Tektelic inventory and The Things Stack registries

pub mod error;
pub mod tektelic;
pub mod transport;
pub mod tts;

pub use error::Error;
pub use reqwest;
pub use tektelic::{DeviceCollection, SourceDevice, TektelicClient};
pub use transport::{TlsMode, TransportConfig};
pub use tts::TtsClient;
pub use tts::types as tts_types;
