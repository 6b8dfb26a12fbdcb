//! CLI-aware wrappers over `lwmig-config`: load the layered file + env
//! configuration, then apply command-line flags on top.

use lwmig_config::Config;
use lwmig_core::MigrationConfig;

use crate::cli::{GlobalOpts, MigrateArgs};
use crate::error::CliError;

/// Load config from `--config` (or the default path) plus environment,
/// with the global flag overrides applied.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = lwmig_config::load_config(global.config.as_deref())?;
    apply_global(&mut cfg, global);
    Ok(cfg)
}

fn apply_global(cfg: &mut Config, global: &GlobalOpts) {
    if let Some(timeout) = global.timeout {
        cfg.defaults.timeout = timeout;
    }
    if global.insecure {
        cfg.defaults.insecure = true;
    }
}

/// Full run configuration for `migrate`.
pub fn migration_config(
    global: &GlobalOpts,
    args: &MigrateArgs,
) -> Result<MigrationConfig, CliError> {
    let mut cfg = load(global)?;
    apply_migrate(&mut cfg, args);
    Ok(lwmig_config::to_migration_config(&cfg)?)
}

fn apply_migrate(cfg: &mut Config, args: &MigrateArgs) {
    if !args.devices.is_empty() {
        cfg.migration.devices.clone_from(&args.devices);
    }
    if let Some(concurrency) = args.concurrency {
        cfg.migration.concurrency = usize::from(concurrency);
    }
}
