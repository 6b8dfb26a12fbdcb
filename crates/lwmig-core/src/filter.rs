// ── Migration filter ──
//
// Selection (allow-list or everything) followed by validation. Devices that
// fail validation are logged and dropped; nothing here is an error.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use lwmig_api::SourceDevice;

use crate::candidate::MigrationCandidate;

/// Pick the devices to consider for migration.
///
/// With an empty `allow_list`, every device is selected in inventory order.
/// Otherwise each listed EUI is resolved against the inventory in list order;
/// EUIs with no matching device are skipped. EUIs compare case-insensitively
/// and a repeated EUI is selected once.
pub fn select_devices<'a>(devices: &'a [SourceDevice], allow_list: &[String]) -> Vec<&'a SourceDevice> {
    if allow_list.is_empty() {
        info!(
            "No specific devices configured, will attempt to migrate all {} devices",
            devices.len()
        );
        return devices.iter().collect();
    }

    let mut seen = HashSet::new();
    allow_list
        .iter()
        .filter(|eui| seen.insert(eui.to_ascii_uppercase()))
        .filter_map(|eui| {
            let found = devices.iter().find(|device| {
                device
                    .device_eui
                    .as_deref()
                    .is_some_and(|candidate| candidate.eq_ignore_ascii_case(eui))
            });
            if found.is_none() {
                debug!(dev_eui = %eui, "listed device not present in inventory");
            }
            found
        })
        .collect()
}

/// Select and validate devices, projecting the survivors into candidates.
///
/// Selection order is preserved.
pub fn select_candidates(devices: &[SourceDevice], allow_list: &[String]) -> Vec<MigrationCandidate> {
    select_devices(devices, allow_list)
        .into_iter()
        .filter_map(|device| {
            let eui = device.device_eui.as_deref().unwrap_or("<unknown>");
            info!(dev_eui = eui, "Checking device {eui} for migration");

            match MigrationCandidate::try_from(device) {
                Ok(candidate) => {
                    info!(dev_eui = eui, "Device {eui} is ready to be migrated");
                    Some(candidate)
                }
                Err(missing) => {
                    warn!(
                        dev_eui = eui,
                        "Device {eui} cannot be migrated because it is {missing}"
                    );
                    None
                }
            }
        })
        .collect()
}
