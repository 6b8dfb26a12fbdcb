//! Subcommand handlers.

pub mod config_cmd;
pub mod inspect;
pub mod migrate;
