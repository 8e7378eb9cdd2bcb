//! Core record types shared by the MSP issuance crates.
//!
//! This crate provides the canonical representation of everything the
//! issuance engine reads or produces:
//!
//! - **Organizations** with their signing and transport certificate authorities
//! - **Identities** (users and nodes) with their key and two leaf certificates
//! - **Roles**, the organizational-unit markers downstream software classifies by
//! - **Errors** for parsing the closed vocabularies above, via [`CoreError`]
//!
//! Storage formats and request payloads live elsewhere and convert into these
//! types explicitly.
//!
//! # Example
//!
//! ```rust,ignore
//! use msp_core::{Organization, Role};
//!
//! fn describe(org: &Organization) {
//!     println!("{} ({})", org.organization_id, org.domain);
//!     println!("role marker: {}", Role::Client);
//! }
//! ```

mod error;
pub mod types;

pub use error::{CoreError, Result};
pub use types::*;
