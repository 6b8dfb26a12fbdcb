//! `lwmig migrate`: one full migration run.
//!
//! Device-level failures are logged by the migrator and never turn into an
//! error here; only configuration and client construction can fail the
//! command.

use tracing::{debug, info};

use lwmig_core::Migrator;

use crate::cli::{GlobalOpts, MigrateArgs};
use crate::config;
use crate::error::CliError;

pub async fn handle(args: &MigrateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let migration = config::migration_config(global, args)?;
    info!(
        source = %migration.source.url,
        source_application = %migration.source.application_id,
        target = %migration.target.url,
        target_application = %migration.target.application_id,
        frequency_plan = %migration.target.lorawan.frequency_plan_id,
        concurrency = migration.concurrency.get(),
        "Starting ABP migration"
    );

    let migrator = Migrator::from_config(&migration)?;
    let report = migrator.run().await;

    debug!(
        total_elements = report.total_elements,
        fetched = report.fetched,
        candidates = report.candidates,
        provisioned = report.provisioned(),
        failed = report.failed(),
        "migration run finished"
    );
    Ok(())
}
