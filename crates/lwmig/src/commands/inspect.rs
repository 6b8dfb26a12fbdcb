//! `lwmig inspect`: read-only view of the source inventory.
//!
//! Unlike a migration run, a failed fetch is an error here: the command
//! exists to check connectivity and data quality before migrating.

use tabled::Tabled;
use tracing::info;

use lwmig_core::{CoreError, SourceDevice, missing_fields, source_client};

use crate::cli::{GlobalOpts, InspectArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "EUI")]
    eui: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "DevAddr")]
    dev_addr: String,
    #[tabled(rename = "Missing")]
    missing: String,
}

impl From<&SourceDevice> for DeviceRow {
    fn from(d: &SourceDevice) -> Self {
        let missing = missing_fields(d);
        Self {
            eui: d.device_eui.clone().unwrap_or_default(),
            name: d.name.clone().unwrap_or_default(),
            dev_addr: d.dev_address.clone().unwrap_or_default(),
            missing: if missing.is_empty() {
                "-".into()
            } else {
                missing
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            },
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: &InspectArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load(global)?;
    let source = lwmig_config::source_config(&cfg)?;
    let client = source_client(
        &source,
        &lwmig_config::tls_verification(&cfg),
        lwmig_config::timeout(&cfg),
    )?;

    let collection = match args.customer.as_deref() {
        Some(customer) => client.customer_devices(customer).await,
        None => client.application_devices(&source.application_id).await,
    }
    .map_err(CoreError::from)?;

    info!(
        total_elements = collection.total_elements,
        fetched = collection.data.len(),
        "Fetched source inventory"
    );

    if args.json {
        let out = if args.first {
            output::render_json(&collection.data.first())?
        } else {
            output::render_json(&collection.data)?
        };
        output::print_output(&out);
        return Ok(());
    }

    let rows: Vec<DeviceRow> = collection.data.iter().map(DeviceRow::from).collect();
    let ready = rows.iter().filter(|r| r.missing == "-").count();
    output::print_output(&output::render_table(&rows));
    output::print_output(&output::readiness_summary(
        ready,
        rows.len(),
        output::should_color(),
    ));
    Ok(())
}
