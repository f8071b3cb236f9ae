use std::io::{Cursor, Read};

use crate::application::EntryFilter;
use crate::domain::DomainError;

/// One file from an archive, fully decompressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub data: Vec<u8>,
}

impl ArchiveEntry {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }

    /// File name without directories.
    pub fn file_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Lower-cased extension, if any.
    pub fn extension(&self) -> Option<String> {
        let file_name = self.file_name();
        file_name
            .rfind('.')
            .filter(|&dot| dot > 0)
            .map(|dot| file_name[dot + 1..].to_lowercase())
    }
}

/// Reads every file entry in archive order. Directories are skipped.
pub fn read_entries(bytes: &[u8]) -> Result<Vec<ArchiveEntry>, DomainError> {
    read_matching(bytes, &EntryFilter::new())
}

/// Reads the file entries whose names `filter` accepts, in archive order.
pub fn read_matching(bytes: &[u8], filter: &EntryFilter) -> Result<Vec<ArchiveEntry>, DomainError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| DomainError::archive(format!("unreadable zip: {e}")))?;

    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| DomainError::archive(format!("entry {i}: {e}")))?;
        if file.is_dir() || !filter.accepts(file.name()) {
            continue;
        }

        let name = file.name().to_string();
        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .map_err(|e| DomainError::archive(format!("{name}: {e}")))?;
        entries.push(ArchiveEntry { name, data });
    }

    Ok(entries)
}
