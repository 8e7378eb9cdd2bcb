//! Command implementations.

pub mod config;
pub mod export;
pub mod identity;
pub mod org;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use msp_service::Services;

use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Clone)]
pub struct Context {
    /// Organization, identity and export services over the record store
    pub services: Services,

    /// Output format
    pub output_format: OutputFormat,

    /// Root of the record store
    pub data_dir: PathBuf,
}

pub(crate) fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Empty list fields render as a dash in tables.
pub(crate) fn joined(values: &[String]) -> String {
    if values.is_empty() {
        "-".to_string()
    } else {
        values.join(", ")
    }
}
