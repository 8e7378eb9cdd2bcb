//! Ordered in-memory archive and its tar.gz encoding.

use std::collections::HashSet;
use std::io::Read;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tar::{Builder, EntryType, Header};

use crate::error::{ArchiveError, Result};

/// One file in an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub path: String,
    pub mode: u32,
    pub content: Vec<u8>,
}

/// Append-only list of files with unique paths.
///
/// Insertion order is output order. Nothing touches the filesystem; the
/// encoded stream is returned as bytes.
#[derive(Debug, Default)]
pub struct Archive {
    entries: Vec<ArchiveEntry>,
    paths: HashSet<String>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a file. Fails if `path` is already present.
    pub fn add_file(
        &mut self,
        path: impl Into<String>,
        mode: u32,
        content: impl Into<Vec<u8>>,
    ) -> Result<&mut Self> {
        let path = path.into();
        if !self.paths.insert(path.clone()) {
            return Err(ArchiveError::DuplicatePath(path));
        }
        self.entries.push(ArchiveEntry {
            path,
            mode,
            content: content.into(),
        });
        Ok(self)
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encode as a gzip-compressed tar stream.
    ///
    /// Output depends only on the entries: headers carry mtime 0, uid/gid 0
    /// and no owner names, and the gzip header carries no timestamp.
    pub fn generate(&self) -> Result<Vec<u8>> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = Builder::new(encoder);

        for entry in &self.entries {
            let mut header = Header::new_gnu();
            header.set_entry_type(EntryType::Regular);
            header.set_size(entry.content.len() as u64);
            header.set_mode(entry.mode);
            header.set_mtime(0);
            header.set_uid(0);
            header.set_gid(0);
            builder
                .append_data(&mut header, &entry.path, entry.content.as_slice())
                .map_err(|e| ArchiveError::Encoding(format!("writing {}: {e}", entry.path)))?;
        }

        let encoder = builder
            .into_inner()
            .map_err(|e| ArchiveError::Encoding(format!("finishing tar stream: {e}")))?;
        encoder
            .finish()
            .map_err(|e| ArchiveError::Encoding(format!("finishing gzip stream: {e}")))
    }
}

/// Decode a tar.gz stream into its entries, in stream order.
pub fn read_archive(bytes: &[u8]) -> Result<Vec<ArchiveEntry>> {
    let mut archive = tar::Archive::new(GzDecoder::new(bytes));
    let mut out = Vec::new();

    for entry in archive.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.to_string_lossy().into_owned();
        let mode = entry.header().mode()?;
        let mut content = Vec::new();
        entry.read_to_end(&mut content)?;
        out.push(ArchiveEntry {
            path,
            mode,
            content,
        });
    }

    Ok(out)
}
