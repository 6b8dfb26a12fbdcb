// ── ABP provisioning ──
//
// Registers one candidate on The Things Stack in three ordered steps:
// Identity Server, Network Server, Application Server. Each request is built
// from the candidate alone and names its fields in a field mask, so a re-run
// converges. An identity that already exists (409) is not an error; any other
// failure stops the remaining steps for that device. Nothing is rolled back.

use std::future::Future;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use lwmig_api::TtsClient;
use lwmig_api::tts_types::{
    EndDevice, EndDeviceIdentifiers, FieldMask, ID_PATHS, KeyEnvelope, MacSettings, Session,
    SessionKeys, SetEndDeviceRequest,
};

use crate::candidate::MigrationCandidate;
use crate::config::{LorawanSettings, TargetConfig};

// ── Outcomes ─────────────────────────────────────────────────────────

/// The three registration steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ProvisionStep {
    #[strum(serialize = "identity registration")]
    Identity,
    #[strum(serialize = "network-session registration")]
    NetworkSession,
    #[strum(serialize = "application-session registration")]
    ApplicationSession,
}

/// How step 1 went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityRegistration {
    Created,
    /// The identity was left over from an earlier run.
    AlreadyExists,
}

/// A device that made it through all three steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionOutcome {
    pub device_id: String,
    pub identity: IdentityRegistration,
}

/// A step failed; later steps for the device were not attempted.
#[derive(Debug, Error)]
#[error("{step} failed for device {device_id}: {source}")]
pub struct ProvisionError {
    pub step: ProvisionStep,
    pub device_id: String,
    #[source]
    pub source: lwmig_api::Error,
}

// ── Provisioner seam ─────────────────────────────────────────────────

/// Something that can provision one candidate on the target stack.
pub trait Provisioner {
    fn provision(
        &self,
        candidate: &MigrationCandidate,
    ) -> impl Future<Output = Result<ProvisionOutcome, ProvisionError>> + Send;
}

// ── The Things Stack implementation ──────────────────────────────────

/// ABP provisioner backed by the three Things Stack registries.
pub struct AbpProvisioner {
    client: TtsClient,
    application_id: String,
    host: String,
    lorawan: LorawanSettings,
}

impl AbpProvisioner {
    pub fn new(client: TtsClient, target: &TargetConfig) -> Self {
        Self {
            client,
            application_id: target.application_id.clone(),
            host: target.host.clone(),
            lorawan: target.lorawan.clone(),
        }
    }

    fn ids(&self, device_id: &str, candidate: &MigrationCandidate) -> EndDeviceIdentifiers {
        EndDeviceIdentifiers::new(device_id, &self.application_id, candidate.dev_eui())
    }

    // ── Request builders ─────────────────────────────────────────────

    /// Step 1 body: identity plus the cluster addresses.
    pub fn identity_request(
        &self,
        device_id: &str,
        candidate: &MigrationCandidate,
    ) -> SetEndDeviceRequest {
        let mut device = EndDevice::with_ids(self.ids(device_id, candidate));
        device.name = Some(device_id.to_owned());
        device.description = Some(device_id.to_owned());
        device.network_server_address = Some(self.host.clone());
        device.application_server_address = Some(self.host.clone());

        SetEndDeviceRequest {
            end_device: device,
            field_mask: with_id_paths(&[
                "name",
                "description",
                "network_server_address",
                "application_server_address",
            ]),
        }
    }

    /// Step 2 body: MAC constants and the network session.
    pub fn network_session_request(
        &self,
        device_id: &str,
        candidate: &MigrationCandidate,
    ) -> SetEndDeviceRequest {
        let mut device = EndDevice::with_ids(self.ids(device_id, candidate));
        device.lorawan_version = Some(self.lorawan.lorawan_version.clone());
        device.lorawan_phy_version = Some(self.lorawan.lorawan_phy_version.clone());
        device.frequency_plan_id = Some(self.lorawan.frequency_plan_id.clone());
        device.mac_settings = Some(MacSettings {
            supports_32_bit_f_cnt: true,
        });
        device.session = Some(Session {
            dev_addr: candidate.dev_addr().to_owned(),
            keys: SessionKeys {
                f_nwk_s_int_key: Some(KeyEnvelope {
                    key: candidate.nwk_s_key().to_owned(),
                }),
                ..SessionKeys::default()
            },
        });

        SetEndDeviceRequest {
            end_device: device,
            field_mask: with_id_paths(&[
                "lorawan_version",
                "lorawan_phy_version",
                "frequency_plan_id",
                "mac_settings.supports_32_bit_f_cnt",
                "session.dev_addr",
                "session.keys.f_nwk_s_int_key.key",
            ]),
        }
    }

    /// Step 3 body: the application session.
    pub fn application_session_request(
        &self,
        device_id: &str,
        candidate: &MigrationCandidate,
    ) -> SetEndDeviceRequest {
        let mut device = EndDevice::with_ids(self.ids(device_id, candidate));
        device.session = Some(Session {
            dev_addr: candidate.dev_addr().to_owned(),
            keys: SessionKeys {
                app_s_key: Some(KeyEnvelope {
                    key: candidate.app_s_key().to_owned(),
                }),
                ..SessionKeys::default()
            },
        });

        SetEndDeviceRequest {
            end_device: device,
            field_mask: with_id_paths(&["session.dev_addr", "session.keys.app_s_key.key"]),
        }
    }

    // ── Steps ────────────────────────────────────────────────────────

    async fn register_identity(
        &self,
        device_id: &str,
        candidate: &MigrationCandidate,
    ) -> Result<IdentityRegistration, ProvisionError> {
        let request = self.identity_request(device_id, candidate);
        match self
            .client
            .create_end_device(&self.application_id, &request)
            .await
        {
            Ok(data) => {
                info!(device_id, "IS device created");
                debug!(device_id, response = %data, "IS response");
                Ok(IdentityRegistration::Created)
            }
            Err(e) if e.is_conflict() => {
                warn!(
                    device_id,
                    "device {device_id} already exists on the Identity Server, continuing"
                );
                Ok(IdentityRegistration::AlreadyExists)
            }
            Err(e) => Err(step_failed(ProvisionStep::Identity, device_id, e)),
        }
    }

    async fn register_network_session(
        &self,
        device_id: &str,
        candidate: &MigrationCandidate,
    ) -> Result<(), ProvisionError> {
        let request = self.network_session_request(device_id, candidate);
        let data = self
            .client
            .set_network_server_device(&self.application_id, device_id, &request)
            .await
            .map_err(|e| step_failed(ProvisionStep::NetworkSession, device_id, e))?;
        info!(device_id, "NS device set");
        debug!(device_id, response = %data, "NS response");
        Ok(())
    }

    async fn register_application_session(
        &self,
        device_id: &str,
        candidate: &MigrationCandidate,
    ) -> Result<(), ProvisionError> {
        let request = self.application_session_request(device_id, candidate);
        let data = self
            .client
            .set_application_server_device(&self.application_id, &request)
            .await
            .map_err(|e| step_failed(ProvisionStep::ApplicationSession, device_id, e))?;
        info!(device_id, "AS device set");
        debug!(device_id, response = %data, "AS response");
        Ok(())
    }
}

impl Provisioner for AbpProvisioner {
    async fn provision(
        &self,
        candidate: &MigrationCandidate,
    ) -> Result<ProvisionOutcome, ProvisionError> {
        let device_id = candidate.device_id();

        let identity = self.register_identity(&device_id, candidate).await?;
        self.register_network_session(&device_id, candidate).await?;
        self.register_application_session(&device_id, candidate)
            .await?;

        Ok(ProvisionOutcome {
            device_id,
            identity,
        })
    }
}

fn with_id_paths(paths: &[&str]) -> FieldMask {
    let all: Vec<&str> = ID_PATHS.iter().chain(paths).copied().collect();
    FieldMask::new(&all)
}

/// Log a failed step with whatever the server sent back, then wrap it.
fn step_failed(step: ProvisionStep, device_id: &str, source: lwmig_api::Error) -> ProvisionError {
    match source.status() {
        Some(status) => error!(
            %step,
            device_id,
            status,
            body = source.response_body().unwrap_or_default(),
            "{step} failed"
        ),
        None => error!(%step, device_id, error = %source, "{step} failed"),
    }
    ProvisionError {
        step,
        device_id: device_id.to_owned(),
        source,
    }
}
