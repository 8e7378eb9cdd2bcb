//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Manage organization CAs, enroll identities and export MSP directories.
///
/// Every organization owns a signing CA and a transport (TLS) CA. Identities
/// enrolled under it get one key and two certificates, which can be exported
/// as an MSP archive or a TLS bundle.
#[derive(Parser, Debug)]
#[command(name = "mspctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding organization and identity records
    #[arg(short = 'd', long, env = "MSPCTL_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create and inspect organizations
    #[command(alias = "organization")]
    Org(OrgArgs),

    /// Enroll and inspect identities
    #[command(alias = "id")]
    Identity(IdentityArgs),

    /// Export MSP archives and TLS bundles
    Export(ExportArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),
}

// ============================================================================
// Org command
// ============================================================================

#[derive(Args, Debug)]
pub struct OrgArgs {
    #[command(subcommand)]
    pub command: OrgCommands,
}

#[derive(Subcommand, Debug)]
pub enum OrgCommands {
    /// Create an organization with fresh signing and TLS CAs
    Create(CreateOrgArgs),

    /// Show one organization
    Show {
        /// Organization id
        organization_id: String,

        /// Print the CA certificates as well
        #[arg(long)]
        certs: bool,
    },

    /// List all organizations
    List,
}

#[derive(Args, Debug)]
pub struct CreateOrgArgs {
    /// Organization id, also the O attribute of every certificate
    pub organization_id: String,

    /// Display name
    #[arg(short, long)]
    pub name: String,

    /// Domain used for CA and identity common names
    #[arg(long)]
    pub domain: String,

    /// Organization type (peer or orderer)
    #[arg(short = 't', long = "type", default_value = "peer")]
    pub org_type: String,

    /// Free-form description
    #[arg(long, default_value = "")]
    pub description: String,

    /// Network ids the organization belongs to (repeatable)
    #[arg(long = "network")]
    pub network_ids: Vec<String>,

    /// Country (C)
    #[arg(long)]
    pub country: Option<String>,

    /// Province or state (ST)
    #[arg(long)]
    pub province: Option<String>,

    /// Locality (L)
    #[arg(long)]
    pub locality: Option<String>,

    /// Organizational unit (OU) of the CA subjects
    #[arg(long = "ou", default_value = "")]
    pub organizational_unit: String,

    /// Street address
    #[arg(long = "street", default_value = "")]
    pub street_address: String,

    /// Postal code
    #[arg(long)]
    pub postal_code: Option<String>,
}

// ============================================================================
// Identity command
// ============================================================================

#[derive(Args, Debug)]
pub struct IdentityArgs {
    #[command(subcommand)]
    pub command: IdentityCommands,
}

#[derive(Subcommand, Debug)]
pub enum IdentityCommands {
    /// Enroll a user or node under an organization
    Enroll {
        /// Organization id
        organization_id: String,

        /// User id, the first label of the certificate CN
        user_id: String,

        /// Role (client, peer, admin or orderer)
        #[arg(short, long, default_value = "client")]
        role: String,

        /// Subject alternative name for the TLS certificate (repeatable)
        #[arg(long = "san")]
        sans: Vec<String>,
    },

    /// Show one identity
    Show {
        organization_id: String,
        user_id: String,

        /// Print the certificates as well
        #[arg(long)]
        certs: bool,
    },

    /// List identities of an organization
    List { organization_id: String },
}

// ============================================================================
// Export command
// ============================================================================

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(subcommand)]
    pub command: ExportCommands,
}

#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// MSP directory (config.yaml, cacerts, tlscacerts, keystore, signcerts)
    Msp(ExportTarget),

    /// TLS bundle (ca.crt, server.crt, server.key)
    Tls(ExportTarget),
}

#[derive(Args, Debug)]
pub struct ExportTarget {
    pub organization_id: String,
    pub user_id: String,

    /// Output file (defaults to <org>-<user>-<kind>.tar.gz); "-" writes to stdout
    #[arg(long = "out")]
    pub out: Option<PathBuf>,

    /// List archive entries instead of writing the file
    #[arg(long)]
    pub list: bool,
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Value to set
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_repeatable_flags() {
        let cli = Cli::parse_from([
            "mspctl", "identity", "enroll", "org1", "peer0", "--role", "peer", "--san",
            "peer0.example.com", "--san", "10.0.0.1",
        ]);
        match cli.command {
            Commands::Identity(IdentityArgs {
                command: IdentityCommands::Enroll { role, sans, .. },
            }) => {
                assert_eq!(role, "peer");
                assert_eq!(sans, vec!["peer0.example.com", "10.0.0.1"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["mspctl", "org", "list", "-o", "json", "--data-dir", "/tmp/x"]);
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
    }
}
