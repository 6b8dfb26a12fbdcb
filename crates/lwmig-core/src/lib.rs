// lwmig-core: Migration pipeline between lwmig-api and the `lwmig` binary.

pub mod candidate;
pub mod config;
pub mod error;
pub mod filter;
pub mod inventory;
pub mod migrator;
pub mod provision;

// ── Primary re-exports ──────────────────────────────────────────────
pub use candidate::{MigrationCandidate, RequiredField, missing_fields};
pub use config::{LorawanSettings, MigrationConfig, SourceConfig, TargetConfig, TlsVerification};
pub use error::CoreError;
pub use filter::{select_candidates, select_devices};
pub use inventory::Inventory;
pub use migrator::{DeviceOutcome, MigrationReport, Migrator, source_client};
pub use provision::{
    AbpProvisioner, IdentityRegistration, ProvisionError, ProvisionOutcome, ProvisionStep,
    Provisioner,
};

// Source-side types surface through core so consumers never depend on the API crate.
pub use lwmig_api::{DeviceCollection, SourceDevice, TektelicClient, TtsClient};
