//! `mspctl org` - organizations and their certificate authorities.

use anyhow::Result;
use colored::Colorize;
use msp_core::Organization;
use msp_service::CreateOrganization;
use tabled::{settings::Style, Table, Tabled};

use super::{joined, timestamp, Context};
use crate::cli::args::{CreateOrgArgs, OrgArgs, OrgCommands};

#[derive(Tabled)]
struct OrgRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Domain")]
    domain: String,
    #[tabled(rename = "Type")]
    org_type: String,
    #[tabled(rename = "Networks")]
    networks: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Organization> for OrgRow {
    fn from(org: &Organization) -> Self {
        Self {
            id: org.organization_id.clone(),
            name: org.name.clone(),
            domain: org.domain.clone(),
            org_type: org.org_type.to_string(),
            networks: joined(&org.network_ids),
            created: timestamp(&org.created_at),
        }
    }
}

pub async fn execute(ctx: Context, args: OrgArgs) -> Result<()> {
    match args.command {
        OrgCommands::Create(args) => create_org(ctx, args).await,
        OrgCommands::Show {
            organization_id,
            certs,
        } => show_org(ctx, &organization_id, certs).await,
        OrgCommands::List => list_orgs(ctx).await,
    }
}

async fn create_org(ctx: Context, args: CreateOrgArgs) -> Result<()> {
    let request = CreateOrganization {
        organization_id: args.organization_id,
        name: args.name,
        domain: args.domain,
        description: args.description,
        org_type: args.org_type,
        network_ids: args.network_ids,
        country: args.country,
        province: args.province,
        locality: args.locality,
        organizational_unit: args.organizational_unit,
        street_address: args.street_address,
        postal_code: args.postal_code,
    };
    let org = ctx.services.organizations.create(request).await?;

    if ctx.output_format.print_structured(&org)? {
        return Ok(());
    }

    println!("{}", "Organization created!".green().bold());
    println!();
    print_details(&org, false);
    println!();
    println!(
        "Enroll an identity: {} identity enroll {} <USER> --role client",
        "mspctl".cyan(),
        org.organization_id
    );
    Ok(())
}

async fn show_org(ctx: Context, organization_id: &str, certs: bool) -> Result<()> {
    let org = ctx.services.organizations.get(organization_id).await?;

    if ctx.output_format.print_structured(&org)? {
        return Ok(());
    }

    println!("{} {}", "Organization:".bold(), org.organization_id.cyan());
    println!();
    print_details(&org, certs);
    Ok(())
}

async fn list_orgs(ctx: Context) -> Result<()> {
    let orgs = ctx.services.organizations.list().await?;

    if ctx.output_format.print_structured(&orgs)? {
        return Ok(());
    }

    if orgs.is_empty() {
        println!("No organizations yet.");
        println!();
        println!(
            "Create one with: {} org create <ID> --name <NAME> --domain <DOMAIN>",
            "mspctl".cyan()
        );
        return Ok(());
    }

    let rows: Vec<OrgRow> = orgs.iter().map(OrgRow::from).collect();
    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
    println!();
    println!("{} organization(s)", orgs.len().to_string().bold());
    Ok(())
}

fn print_details(org: &Organization, certs: bool) {
    println!("  {} {}", "Name:".bold(), org.name);
    println!("  {} {}", "Domain:".bold(), org.domain);
    println!("  {} {}", "Type:".bold(), org.org_type);
    if !org.description.is_empty() {
        println!("  {} {}", "Description:".bold(), org.description);
    }
    println!("  {} {}", "Networks:".bold(), joined(&org.network_ids));

    let subject: Vec<String> = [
        ("C", &org.country),
        ("ST", &org.province),
        ("L", &org.locality),
        ("OU", &org.organizational_unit),
        ("STREET", &org.street_address),
        ("postalCode", &org.postal_code),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_empty())
    .map(|(attr, value)| format!("{attr}={value}"))
    .collect();
    println!("  {} {}", "Subject:".bold(), subject.join(", "));
    println!("  {} {}", "Created:".bold(), timestamp(&org.created_at));

    if certs {
        for ca in [&org.signing_ca, &org.transport_ca] {
            println!();
            println!("{} ({})", "CA certificate".bold(), ca.purpose);
            print!("{}", ca.certificate_pem);
        }
    }
}
