//! `mspctl config` - CLI configuration management.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::Config;
use crate::output::OutputFormat;

pub async fn execute(ctx: Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(ctx).await,
        ConfigCommands::Set { key, value } => set_config(ctx, &key, &value).await,
        ConfigCommands::Path => show_path(ctx).await,
    }
}

async fn show_config(ctx: Context) -> Result<()> {
    let config = Config::load()?;

    if ctx.output_format.print_structured(&config)? {
        return Ok(());
    }

    let unset = || "(not set)".dimmed().to_string();
    let defaults = config.subject_defaults();

    println!("{}", "Current Configuration:".bold());
    println!();
    println!(
        "  {} {}",
        "data_dir:".bold(),
        config
            .data_dir
            .as_ref()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(unset)
    );
    println!("  {} {}", "effective data_dir:".bold(), ctx.data_dir.display());
    println!(
        "  {} {}",
        "output_format:".bold(),
        config.output_format.unwrap_or(OutputFormat::Pretty)
    );
    println!("  {} {}", "default_country:".bold(), defaults.country);
    println!("  {} {}", "default_province:".bold(), defaults.province);
    println!("  {} {}", "default_locality:".bold(), defaults.locality);
    println!("  {} {}", "default_postal_code:".bold(), defaults.postal_code);

    Ok(())
}

async fn set_config(_ctx: Context, key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    println!("{} {} set to {}.", "Success:".green().bold(), key, value.cyan());
    Ok(())
}

async fn show_path(_ctx: Context) -> Result<()> {
    let path = Config::path()?;
    println!("{}", path.display());
    Ok(())
}
