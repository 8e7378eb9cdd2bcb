//! `mspctl identity` - enrollment of users and nodes.

use anyhow::Result;
use colored::Colorize;
use msp_core::Identity;
use msp_service::EnrollIdentity;
use tabled::{settings::Style, Table, Tabled};

use super::{joined, timestamp, Context};
use crate::cli::args::{IdentityArgs, IdentityCommands};

#[derive(Tabled)]
struct IdentityRow {
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "SANs")]
    sans: String,
    #[tabled(rename = "Enrolled")]
    enrolled: String,
}

impl From<&Identity> for IdentityRow {
    fn from(identity: &Identity) -> Self {
        Self {
            user: identity.user_id.clone(),
            role: identity.role.to_string(),
            sans: joined(&identity.sans),
            enrolled: timestamp(&identity.created_at),
        }
    }
}

pub async fn execute(ctx: Context, args: IdentityArgs) -> Result<()> {
    match args.command {
        IdentityCommands::Enroll {
            organization_id,
            user_id,
            role,
            sans,
        } => {
            let request = EnrollIdentity {
                organization_id,
                user_id,
                role,
                sans,
            };
            enroll(ctx, request).await
        }
        IdentityCommands::Show {
            organization_id,
            user_id,
            certs,
        } => show_identity(ctx, &organization_id, &user_id, certs).await,
        IdentityCommands::List { organization_id } => list_identities(ctx, &organization_id).await,
    }
}

async fn enroll(ctx: Context, request: EnrollIdentity) -> Result<()> {
    let identity = ctx.services.identities.enroll(request).await?;

    if ctx.output_format.print_structured(&identity)? {
        return Ok(());
    }

    println!("{}", "Identity enrolled!".green().bold());
    println!();
    print_details(&identity, false);
    println!();
    println!(
        "Export its MSP: {} export msp {} {}",
        "mspctl".cyan(),
        identity.organization_id,
        identity.user_id
    );
    Ok(())
}

async fn show_identity(ctx: Context, organization_id: &str, user_id: &str, certs: bool) -> Result<()> {
    let identity = ctx.services.identities.get(organization_id, user_id).await?;

    if ctx.output_format.print_structured(&identity)? {
        return Ok(());
    }

    println!(
        "{} {}/{}",
        "Identity:".bold(),
        identity.organization_id,
        identity.user_id.cyan()
    );
    println!();
    print_details(&identity, certs);
    Ok(())
}

async fn list_identities(ctx: Context, organization_id: &str) -> Result<()> {
    let identities = ctx.services.identities.list(organization_id).await?;

    if ctx.output_format.print_structured(&identities)? {
        return Ok(());
    }

    if identities.is_empty() {
        println!("No identities enrolled in {}.", organization_id.cyan());
        return Ok(());
    }

    let rows: Vec<IdentityRow> = identities.iter().map(IdentityRow::from).collect();
    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
    Ok(())
}

fn print_details(identity: &Identity, certs: bool) {
    println!("  {} {}", "Organization:".bold(), identity.organization_id);
    println!("  {} {}", "Role:".bold(), identity.role);
    println!("  {} {}", "SANs:".bold(), joined(&identity.sans));
    println!("  {} {}", "Enrolled:".bold(), timestamp(&identity.created_at));

    if certs {
        println!();
        println!("{}", "Signing certificate".bold());
        print!("{}", identity.signing_certificate_pem);
        println!("{}", "TLS certificate".bold());
        print!("{}", identity.transport_certificate_pem);
    }
}
