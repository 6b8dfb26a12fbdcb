// ── Migration orchestrator ──
//
// fetch → filter → provision each candidate. A device that fails is logged
// and the run moves on; nothing escapes the per-device loop. With
// `concurrency > 1` several devices are in flight at once, but each device
// still runs its three steps in order.

use std::num::NonZeroUsize;
use std::time::Duration;

use futures_util::stream::{self, StreamExt};
use tracing::{debug, error, info, warn};

use lwmig_api::{TektelicClient, TransportConfig, TtsClient, transport::TlsMode};

use crate::candidate::MigrationCandidate;
use crate::config::{MigrationConfig, SourceConfig, TlsVerification};
use crate::error::CoreError;
use crate::filter::select_candidates;
use crate::inventory::Inventory;
use crate::provision::{AbpProvisioner, ProvisionError, ProvisionOutcome, Provisioner};

// ── Report ───────────────────────────────────────────────────────────

/// Per-device result, in candidate order.
#[derive(Debug)]
pub struct DeviceOutcome {
    pub dev_eui: String,
    pub result: Result<ProvisionOutcome, ProvisionError>,
}

/// What a run did. Returned for callers and tests; the run's log lines are
/// the operator-facing report.
#[derive(Debug, Default)]
pub struct MigrationReport {
    /// `totalElements` as reported by the source.
    pub total_elements: u64,
    /// Devices actually received from the source.
    pub fetched: usize,
    /// Devices that passed selection and validation.
    pub candidates: usize,
    pub outcomes: Vec<DeviceOutcome>,
}

impl MigrationReport {
    pub fn provisioned(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }
}

// ── Migrator ─────────────────────────────────────────────────────────

/// Drives one migration run against an inventory and a provisioner.
pub struct Migrator<I, P> {
    inventory: I,
    provisioner: P,
    application_id: String,
    devices: Vec<String>,
    concurrency: NonZeroUsize,
}

impl<I: Inventory, P: Provisioner> Migrator<I, P> {
    /// Sequential migrator over every device of `application_id`.
    pub fn new(inventory: I, provisioner: P, application_id: impl Into<String>) -> Self {
        Self {
            inventory,
            provisioner,
            application_id: application_id.into(),
            devices: Vec::new(),
            concurrency: NonZeroUsize::MIN,
        }
    }

    /// Restrict the run to these device EUIs (empty = all).
    pub fn with_devices(mut self, devices: Vec<String>) -> Self {
        self.devices = devices;
        self
    }

    /// Provision up to `concurrency` devices at once.
    pub fn with_concurrency(mut self, concurrency: NonZeroUsize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Run the whole pipeline. Never fails: every problem is logged and
    /// reflected in the report.
    pub async fn run(&self) -> MigrationReport {
        let application_id = self.application_id.as_str();
        let collection = self
            .inventory
            .fetch_application_devices(application_id)
            .await;

        let mut report = MigrationReport {
            total_elements: collection.total_elements,
            fetched: collection.data.len(),
            ..MigrationReport::default()
        };

        if collection.is_empty() {
            warn!(application_id, "No devices found for application {application_id}");
            return report;
        }
        info!(
            application_id,
            total = collection.total_elements,
            "Found {} devices for application {application_id}",
            collection.data.len()
        );

        let candidates = select_candidates(&collection.data, &self.devices);
        report.candidates = candidates.len();
        if candidates.is_empty() {
            warn!(
                application_id,
                "No devices to be migrated for application {application_id}"
            );
            return report;
        }

        info!(count = candidates.len(), "Devices to be migrated");
        for candidate in &candidates {
            debug!(?candidate, "candidate");
        }

        report.outcomes = stream::iter(&candidates)
            .map(|candidate| self.provision_one(candidate))
            .buffered(self.concurrency.get())
            .collect()
            .await;
        report
    }

    async fn provision_one(&self, candidate: &MigrationCandidate) -> DeviceOutcome {
        let result = self.provisioner.provision(candidate).await;
        match &result {
            Ok(outcome) => info!(
                dev_eui = candidate.dev_eui(),
                device_id = %outcome.device_id,
                "ABP device {} provisioned successfully",
                outcome.device_id
            ),
            Err(e) => error!(
                dev_eui = candidate.dev_eui(),
                device_id = %e.device_id,
                step = %e.step,
                "Failed to provision device {}",
                e.device_id
            ),
        }
        DeviceOutcome {
            dev_eui: candidate.dev_eui().to_owned(),
            result,
        }
    }
}

// ── Construction from configuration ──────────────────────────────────

impl Migrator<TektelicClient, AbpProvisioner> {
    /// Build both HTTP clients and the migrator from a run configuration.
    pub fn from_config(config: &MigrationConfig) -> Result<Self, CoreError> {
        let source = source_client(&config.source, &config.tls, config.timeout)?;
        let target = TtsClient::new(
            config.target.url.as_str(),
            &config.target.token,
            &build_transport(&config.tls, config.timeout),
        )?;
        let provisioner = AbpProvisioner::new(target, &config.target);

        Ok(
            Self::new(source, provisioner, config.source.application_id.clone())
                .with_devices(config.devices.clone())
                .with_concurrency(config.concurrency),
        )
    }
}

/// Build the source inventory client on its own (for read-only inspection).
pub fn source_client(
    source: &SourceConfig,
    tls: &TlsVerification,
    timeout: Duration,
) -> Result<TektelicClient, CoreError> {
    Ok(TektelicClient::new(
        source.url.as_str(),
        &source.token,
        &build_transport(tls, timeout),
    )?)
}

fn build_transport(tls: &TlsVerification, timeout: Duration) -> TransportConfig {
    let tls = match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    };
    TransportConfig { tls, timeout }
}
