// ── Source inventory ──
//
// The migrator only needs one thing from the source platform: the device
// collection of an application. Fetch failures are logged and collapse into
// an empty collection, which the migrator treats as "nothing to migrate".

use std::future::Future;

use tracing::error;

use lwmig_api::{DeviceCollection, TektelicClient};

/// Something that can list the devices of a source application.
pub trait Inventory {
    /// Fetch the full device collection for `application_id`.
    ///
    /// Never fails: transport or server errors yield an empty collection.
    fn fetch_application_devices(
        &self,
        application_id: &str,
    ) -> impl Future<Output = DeviceCollection> + Send;
}

impl Inventory for TektelicClient {
    async fn fetch_application_devices(&self, application_id: &str) -> DeviceCollection {
        match self.application_devices(application_id).await {
            Ok(devices) => devices,
            Err(e) => {
                error!(
                    application_id,
                    status = e.status(),
                    error = %e,
                    "Error fetching devices by app ID"
                );
                DeviceCollection::default()
            }
        }
    }
}
