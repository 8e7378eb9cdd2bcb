//! `mspctl export` - MSP archives and TLS bundles.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};
use tokio::io::AsyncWriteExt;

use super::Context;
use crate::cli::args::{ExportArgs, ExportCommands, ExportTarget};

#[derive(Debug, Clone, Copy)]
enum ArchiveKind {
    Msp,
    Tls,
}

impl ArchiveKind {
    fn suffix(self) -> &'static str {
        match self {
            Self::Msp => "msp",
            Self::Tls => "tls",
        }
    }
}

#[derive(Tabled, Serialize)]
struct EntryRow {
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Bytes")]
    size: usize,
}

pub async fn execute(ctx: Context, args: ExportArgs) -> Result<()> {
    match args.command {
        ExportCommands::Msp(target) => export(ctx, ArchiveKind::Msp, target).await,
        ExportCommands::Tls(target) => export(ctx, ArchiveKind::Tls, target).await,
    }
}

async fn export(ctx: Context, kind: ArchiveKind, target: ExportTarget) -> Result<()> {
    let exports = &ctx.services.exports;
    let (org, user) = (target.organization_id.as_str(), target.user_id.as_str());
    let bytes = match kind {
        ArchiveKind::Msp => exports.identity_archive(org, user).await?,
        ArchiveKind::Tls => exports.transport_archive(org, user).await?,
    };

    if target.list {
        return list_entries(&ctx, &bytes);
    }

    let out = target.out.unwrap_or_else(|| default_file_name(org, user, kind));
    if out == Path::new("-") {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&bytes)?;
        stdout.flush()?;
        return Ok(());
    }

    write_private(&out, &bytes)
        .await
        .with_context(|| format!("writing {}", out.display()))?;

    let summary = serde_json::json!({
        "organization_id": org,
        "user_id": user,
        "kind": kind.suffix(),
        "path": out,
        "bytes": bytes.len(),
    });
    if ctx.output_format.print_structured(&summary)? {
        return Ok(());
    }

    println!(
        "{} {} ({} bytes)",
        "Wrote".green().bold(),
        out.display().to_string().cyan(),
        bytes.len()
    );
    Ok(())
}

fn list_entries(ctx: &Context, bytes: &[u8]) -> Result<()> {
    let rows: Vec<EntryRow> = msp_archive::read_archive(bytes)?
        .into_iter()
        .map(|entry| EntryRow {
            path: entry.path,
            mode: format!("{:o}", entry.mode),
            size: entry.content.len(),
        })
        .collect();

    if ctx.output_format.print_structured(&rows)? {
        return Ok(());
    }

    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
    Ok(())
}

/// Archives hold private keys: owner read/write only, also when an existing
/// file is overwritten.
async fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))
            .await?;
    }
    file.write_all(bytes).await?;
    file.flush().await
}

fn default_file_name(organization_id: &str, user_id: &str, kind: ArchiveKind) -> PathBuf {
    PathBuf::from(format!("{organization_id}-{user_id}-{}.tar.gz", kind.suffix()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    #[tokio::test]
    async fn test_archive_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let fresh = dir.path().join("fresh.tar.gz");
        write_private(&fresh, b"archive").await.unwrap();
        let mode = std::fs::metadata(&fresh).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        // Overwriting a world-readable file tightens it.
        let existing = dir.path().join("existing.tar.gz");
        std::fs::write(&existing, b"old contents that are longer").unwrap();
        std::fs::set_permissions(&existing, std::fs::Permissions::from_mode(0o644)).unwrap();
        write_private(&existing, b"archive").await.unwrap();
        let mode = std::fs::metadata(&existing).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(std::fs::read(&existing).unwrap(), b"archive");
    }

    #[test]
    fn test_default_file_name() {
        assert_eq!(
            default_file_name("org1", "alice", ArchiveKind::Msp),
            PathBuf::from("org1-alice-msp.tar.gz")
        );
        assert_eq!(
            default_file_name("org1", "peer0", ArchiveKind::Tls),
            PathBuf::from("org1-peer0-tls.tar.gz")
        );
    }
}
