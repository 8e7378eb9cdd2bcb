//! mspctl - organization CA and identity enrollment tool
//!
//! Creates organizations, enrolls identities and exports MSP and TLS archives.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    msp_cli::run().await
}
