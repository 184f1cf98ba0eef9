//! Show archive reader: ZIP container to named member buffers.

use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use flate2::Crc;
use flate2::read::DeflateDecoder;

use super::format::{
    CentralEntry, CompressionMethod, END_RECORD_SIGNATURE, EndRecord, FLAG_ENCRYPTED, LocalHeader,
};

/// Member holding show metadata and every drone's trajectory.
pub const SHOW_MEMBER: &str = "show.json";

/// Members every show archive must contain.
pub const REQUIRED_MEMBERS: &[&str] = &[SHOW_MEMBER];

/// Longest archive comment the end record can announce.
const MAX_COMMENT_LEN: usize = u16::MAX as usize;

/// Errors raised while reading a show archive.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Show archive is corrupt: {0}")]
    Corrupt(String),
    #[error("Show archive has no `{0}` member")]
    MemberMissing(String),
}

fn corrupt(reason: impl Into<String>) -> ArchiveError {
    ArchiveError::Corrupt(reason.into())
}

/// Decoded show archive: member name to uncompressed bytes.
///
/// Usage:
/// ```ignore
/// let archive = ShowArchive::read(&bytes)?;
/// let document = archive.member(SHOW_MEMBER)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShowArchive {
    members: BTreeMap<String, Vec<u8>>,
}

impl ShowArchive {
    /// Read an archive and check that all required members are present.
    pub fn read(bytes: &[u8]) -> Result<Self, ArchiveError> {
        let archive = Self::read_members(bytes)?;
        for &name in REQUIRED_MEMBERS {
            if !archive.members.contains_key(name) {
                return Err(ArchiveError::MemberMissing(name.to_string()));
            }
        }
        log::debug!("Read show archive with {} members", archive.len());
        Ok(archive)
    }

    /// Read every member of an archive without checking for required members.
    pub fn read_members(bytes: &[u8]) -> Result<Self, ArchiveError> {
        let end_pos = find_end_record(bytes)?;
        let end = EndRecord::read_from(&mut Cursor::new(&bytes[end_pos..]))
            .map_err(|e| corrupt(e.to_string()))?;

        if end_pos + EndRecord::SIZE + end.comment_len as usize > bytes.len() {
            return Err(corrupt("archive comment runs past end of buffer"));
        }
        if end.is_zip64() {
            return Err(corrupt("ZIP64 archives are not supported"));
        }
        if end.disk_number != 0 || end.directory_disk != 0 || end.entries_on_disk != end.total_entries
        {
            return Err(corrupt("multi-disk archives are not supported"));
        }

        let directory_start = end.directory_offset as usize;
        let directory_end = directory_start
            .checked_add(end.directory_size as usize)
            .ok_or_else(|| corrupt("central directory size overflows"))?;
        if directory_end > end_pos {
            return Err(corrupt(format!(
                "central directory ({directory_start}..{directory_end}) overlaps end record at {end_pos}"
            )));
        }

        let mut cursor = Cursor::new(&bytes[directory_start..directory_end]);
        let mut members = BTreeMap::new();

        for i in 0..end.total_entries {
            let entry = CentralEntry::read_from(&mut cursor)
                .map_err(|e| corrupt(format!("central directory entry {i}: {e}")))?;

            if entry.is_directory() {
                continue;
            }

            let data = extract_member(bytes, &entry, directory_start)?;
            if members.insert(entry.name.clone(), data).is_some() {
                return Err(corrupt(format!("duplicate member `{}`", entry.name)));
            }
        }

        Ok(Self { members })
    }

    /// Look up a member, failing if it is absent.
    pub fn member(&self, name: &str) -> Result<&[u8], ArchiveError> {
        self.members
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| ArchiveError::MemberMissing(name.to_string()))
    }

    /// Look up an optional member.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.members.get(name).map(Vec::as_slice)
    }

    /// Member names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Locate the end-of-central-directory record, scanning back over any comment.
fn find_end_record(bytes: &[u8]) -> Result<usize, ArchiveError> {
    if bytes.len() < EndRecord::SIZE {
        return Err(corrupt(format!(
            "{} bytes is too short for a show archive",
            bytes.len()
        )));
    }

    let signature = END_RECORD_SIGNATURE.to_le_bytes();
    let last = bytes.len() - EndRecord::SIZE;
    let first = last.saturating_sub(MAX_COMMENT_LEN);

    (first..=last)
        .rev()
        .find(|&pos| bytes[pos..pos + 4] == signature)
        .ok_or_else(|| corrupt("end of central directory record not found"))
}

/// Extract and verify the data of one member.
fn extract_member(
    bytes: &[u8],
    entry: &CentralEntry,
    directory_start: usize,
) -> Result<Vec<u8>, ArchiveError> {
    let name = &entry.name;

    if entry.is_zip64() {
        return Err(corrupt(format!("member `{name}` uses ZIP64 extensions")));
    }
    if entry.flags & FLAG_ENCRYPTED != 0 {
        return Err(corrupt(format!("member `{name}` is encrypted")));
    }
    let method = CompressionMethod::from_u16(entry.method).ok_or_else(|| {
        corrupt(format!(
            "member `{name}` uses unsupported compression method {}",
            entry.method
        ))
    })?;

    let header_start = entry.local_header_offset as usize;
    if header_start.saturating_add(LocalHeader::SIZE) > directory_start {
        return Err(corrupt(format!(
            "member `{name}` header offset {header_start} is out of bounds"
        )));
    }
    let header = LocalHeader::read_from(&mut Cursor::new(&bytes[header_start..]))
        .map_err(|e| corrupt(format!("member `{name}`: {e}")))?;

    // Sizes come from the central directory, local headers may defer them to a data descriptor
    let data_start = header_start + header.data_offset();
    let data_end = data_start.saturating_add(entry.compressed_size as usize);
    if data_end > directory_start {
        return Err(corrupt(format!(
            "member `{name}` data ({data_start}..{data_end}) runs into the central directory"
        )));
    }
    let raw = &bytes[data_start..data_end];
    let expected_len = entry.uncompressed_size as usize;

    let data = match method {
        CompressionMethod::Stored => raw.to_vec(),
        CompressionMethod::Deflate => {
            let mut data = Vec::new();
            DeflateDecoder::new(raw)
                .take(expected_len as u64 + 1)
                .read_to_end(&mut data)
                .map_err(|e| corrupt(format!("member `{name}` failed to inflate: {e}")))?;
            data
        }
    };

    if data.len() != expected_len {
        return Err(corrupt(format!(
            "member `{name}` size mismatch: {} bytes vs {expected_len} declared",
            data.len()
        )));
    }

    let mut crc = Crc::new();
    crc.update(&data);
    if crc.sum() != entry.crc32 {
        return Err(corrupt(format!(
            "member `{name}` checksum mismatch: {:#010x} vs {:#010x} declared",
            crc.sum(),
            entry.crc32
        )));
    }

    Ok(data)
}
