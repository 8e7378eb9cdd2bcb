//! # msp-cli
//!
//! Command-line front end for the MSP issuance services.
//!
//! ## Features
//!
//! - **Organizations**: create an organization with its signing and TLS CAs
//! - **Identities**: enroll users and nodes, one key and two certificates each
//! - **Export**: write MSP and TLS bundles as tar.gz, or list their contents
//! - **Output formats**: pretty tables, JSON, YAML

pub mod cli;
pub mod config;
pub mod logging;
pub mod output;

pub use cli::run;
