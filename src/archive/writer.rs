//! Archive writer for packaging show members into a ZIP container.

use std::io::{self, Write};

use flate2::write::DeflateEncoder;
use flate2::{Compression, Crc};

use super::format::{
    CentralEntry, CompressionMethod, DOS_EPOCH_DATE, EndRecord, FLAG_UTF8_NAME, LocalHeader,
    VERSION_NEEDED,
};

/// Archive writer that collects members into an in-memory ZIP container.
///
/// Usage:
/// ```ignore
/// let mut writer = ArchiveWriter::new(CompressionMethod::Deflate);
/// writer.add_member("show.json", &document)?;
/// let bytes = writer.finish()?;
/// ```
pub struct ArchiveWriter {
    buffer: Vec<u8>,
    entries: Vec<CentralEntry>,
    compression: CompressionMethod,
}

fn too_large(what: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("{what} exceeds the 4 GiB limit of non-ZIP64 archives"),
    )
}

impl ArchiveWriter {
    /// Create a new writer compressing every member with `compression`.
    pub fn new(compression: CompressionMethod) -> Self {
        Self {
            buffer: Vec::new(),
            entries: Vec::new(),
            compression,
        }
    }

    /// Number of members added so far.
    pub fn member_count(&self) -> usize {
        self.entries.len()
    }

    /// Append a member. Names ending in `/` are written as directory entries.
    pub fn add_member(&mut self, name: &str, data: &[u8]) -> io::Result<()> {
        if self.entries.iter().any(|e| e.name == name) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("Duplicate member `{name}`"),
            ));
        }
        if self.entries.len() >= u16::MAX as usize - 1 {
            return Err(too_large("member count"));
        }

        let offset = u32::try_from(self.buffer.len()).map_err(|_| too_large("archive"))?;

        let mut crc = Crc::new();
        crc.update(data);

        // Directory entries and empty members are always stored
        let method = if data.is_empty() {
            CompressionMethod::Stored
        } else {
            self.compression
        };

        let payload = match method {
            CompressionMethod::Stored => data.to_vec(),
            CompressionMethod::Deflate => {
                let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(data)?;
                encoder.finish()?
            }
        };

        let compressed_size = u32::try_from(payload.len()).map_err(|_| too_large("member"))?;
        let uncompressed_size = u32::try_from(data.len()).map_err(|_| too_large("member"))?;
        let name_len = u16::try_from(name.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "Member name too long"))?;

        let header = LocalHeader {
            version_needed: VERSION_NEEDED,
            flags: FLAG_UTF8_NAME,
            method: method as u16,
            mod_time: 0,
            mod_date: DOS_EPOCH_DATE,
            crc32: crc.sum(),
            compressed_size,
            uncompressed_size,
            name_len,
            extra_len: 0,
        };

        header.write_to(&mut self.buffer)?;
        self.buffer.write_all(name.as_bytes())?;
        self.buffer.write_all(&payload)?;

        self.entries.push(CentralEntry {
            version_made_by: VERSION_NEEDED,
            version_needed: VERSION_NEEDED,
            flags: FLAG_UTF8_NAME,
            method: method as u16,
            mod_time: 0,
            mod_date: DOS_EPOCH_DATE,
            crc32: header.crc32,
            compressed_size,
            uncompressed_size,
            local_header_offset: offset,
            name: name.to_string(),
        });

        Ok(())
    }

    /// Write the central directory and end record, returning the archive bytes.
    pub fn finish(mut self) -> io::Result<Vec<u8>> {
        let directory_offset =
            u32::try_from(self.buffer.len()).map_err(|_| too_large("archive"))?;

        for entry in &self.entries {
            entry.write_to(&mut self.buffer)?;
        }

        let directory_size = u32::try_from(self.buffer.len() - directory_offset as usize)
            .map_err(|_| too_large("central directory"))?;
        let entry_count = self.entries.len() as u16;

        EndRecord {
            disk_number: 0,
            directory_disk: 0,
            entries_on_disk: entry_count,
            total_entries: entry_count,
            directory_size,
            directory_offset,
            comment_len: 0,
        }
        .write_to(&mut self.buffer)?;

        log::debug!(
            "Wrote show archive with {} members ({} bytes)",
            self.entries.len(),
            self.buffer.len()
        );

        Ok(self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ShowArchive;

    #[test]
    fn test_empty_archive_is_readable() {
        let bytes = ArchiveWriter::new(CompressionMethod::Deflate).finish().unwrap();
        assert_eq!(bytes.len(), EndRecord::SIZE);

        let archive = ShowArchive::read_members(&bytes).unwrap();
        assert!(archive.is_empty());
    }

    #[test]
    fn test_deflate_shrinks_repetitive_members() {
        let data = vec![b'a'; 10_000];

        let mut stored = ArchiveWriter::new(CompressionMethod::Stored);
        stored.add_member("a.txt", &data).unwrap();
        let stored = stored.finish().unwrap();

        let mut deflated = ArchiveWriter::new(CompressionMethod::Deflate);
        deflated.add_member("a.txt", &data).unwrap();
        let deflated = deflated.finish().unwrap();

        assert!(deflated.len() < stored.len() / 10);
        let archive = ShowArchive::read_members(&deflated).unwrap();
        assert_eq!(archive.get("a.txt").unwrap(), &data[..]);
    }

    #[test]
    fn test_rejects_duplicate_member() {
        let mut writer = ArchiveWriter::new(CompressionMethod::Stored);
        writer.add_member("show.json", b"{}").unwrap();
        let err = writer.add_member("show.json", b"{}").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(writer.member_count(), 1);
    }
}
