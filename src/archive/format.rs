//! Binary record definitions for the ZIP container used by show archives.

use std::io::{self, Read, Write};

/// Signature of a local file header.
pub const LOCAL_HEADER_SIGNATURE: u32 = 0x0403_4b50;

/// Signature of a central directory entry.
pub const CENTRAL_ENTRY_SIGNATURE: u32 = 0x0201_4b50;

/// Signature of the end-of-central-directory record.
pub const END_RECORD_SIGNATURE: u32 = 0x0605_4b50;

/// Sentinel used by ZIP64 archives in 16-bit count fields.
pub const ZIP64_COUNT_SENTINEL: u16 = 0xFFFF;

/// Sentinel used by ZIP64 archives in 32-bit size and offset fields.
pub const ZIP64_SIZE_SENTINEL: u32 = 0xFFFF_FFFF;

/// General purpose flag: entry is encrypted.
pub const FLAG_ENCRYPTED: u16 = 1;

/// General purpose flag: file name is UTF-8.
pub const FLAG_UTF8_NAME: u16 = 1 << 11;

/// Version needed to extract deflated members (2.0).
pub const VERSION_NEEDED: u16 = 20;

/// MS-DOS date for 1980-01-01, the earliest representable date.
pub const DOS_EPOCH_DATE: u16 = (1 << 5) | 1;

/// Compression method of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u16)]
pub enum CompressionMethod {
    /// Member bytes are stored verbatim.
    Stored = 0,
    /// Raw deflate stream.
    #[default]
    Deflate = 8,
}

impl CompressionMethod {
    pub fn from_u16(v: u16) -> Option<Self> {
        match v {
            0 => Some(CompressionMethod::Stored),
            8 => Some(CompressionMethod::Deflate),
            _ => None,
        }
    }
}

fn read_u16<R: Read>(r: &mut R) -> io::Result<u16> {
    let mut buf2 = [0u8; 2];
    r.read_exact(&mut buf2)?;
    Ok(u16::from_le_bytes(buf2))
}

fn read_u32<R: Read>(r: &mut R) -> io::Result<u32> {
    let mut buf4 = [0u8; 4];
    r.read_exact(&mut buf4)?;
    Ok(u32::from_le_bytes(buf4))
}

fn expect_signature<R: Read>(r: &mut R, expected: u32, what: &str) -> io::Result<()> {
    let signature = read_u32(r)?;
    if signature != expected {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Invalid {what} signature: {signature:#010x}"),
        ));
    }
    Ok(())
}

/// End-of-central-directory record closing every archive.
#[derive(Debug, Clone, Default)]
pub struct EndRecord {
    /// Number of this disk.
    pub disk_number: u16,
    /// Disk holding the start of the central directory.
    pub directory_disk: u16,
    /// Entries on this disk.
    pub entries_on_disk: u16,
    /// Entries in the whole archive.
    pub total_entries: u16,
    /// Size of the central directory in bytes.
    pub directory_size: u32,
    /// Offset of the central directory from the start of the archive.
    pub directory_offset: u32,
    /// Length of the trailing archive comment.
    pub comment_len: u16,
}

impl EndRecord {
    /// Size of the fixed part of the record in bytes.
    pub const SIZE: usize = 22;

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&END_RECORD_SIGNATURE.to_le_bytes())?;
        w.write_all(&self.disk_number.to_le_bytes())?;
        w.write_all(&self.directory_disk.to_le_bytes())?;
        w.write_all(&self.entries_on_disk.to_le_bytes())?;
        w.write_all(&self.total_entries.to_le_bytes())?;
        w.write_all(&self.directory_size.to_le_bytes())?;
        w.write_all(&self.directory_offset.to_le_bytes())?;
        w.write_all(&self.comment_len.to_le_bytes())?;
        Ok(())
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        expect_signature(r, END_RECORD_SIGNATURE, "end of central directory")?;
        Ok(Self {
            disk_number: read_u16(r)?,
            directory_disk: read_u16(r)?,
            entries_on_disk: read_u16(r)?,
            total_entries: read_u16(r)?,
            directory_size: read_u32(r)?,
            directory_offset: read_u32(r)?,
            comment_len: read_u16(r)?,
        })
    }

    /// Whether any field carries a ZIP64 sentinel.
    pub fn is_zip64(&self) -> bool {
        self.total_entries == ZIP64_COUNT_SENTINEL
            || self.entries_on_disk == ZIP64_COUNT_SENTINEL
            || self.directory_size == ZIP64_SIZE_SENTINEL
            || self.directory_offset == ZIP64_SIZE_SENTINEL
    }
}

/// Central directory entry describing one member.
#[derive(Debug, Clone, Default)]
pub struct CentralEntry {
    pub version_made_by: u16,
    pub version_needed: u16,
    pub flags: u16,
    pub method: u16,
    pub mod_time: u16,
    pub mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    /// Offset of the member's local header from the start of the archive.
    pub local_header_offset: u32,
    /// Member name as stored (lossily decoded when not UTF-8).
    pub name: String,
}

impl CentralEntry {
    /// Size of the fixed part of the entry in bytes.
    pub const SIZE: usize = 46;

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let name = self.name.as_bytes();
        let name_len = u16::try_from(name.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "Member name too long"))?;

        w.write_all(&CENTRAL_ENTRY_SIGNATURE.to_le_bytes())?;
        w.write_all(&self.version_made_by.to_le_bytes())?;
        w.write_all(&self.version_needed.to_le_bytes())?;
        w.write_all(&self.flags.to_le_bytes())?;
        w.write_all(&self.method.to_le_bytes())?;
        w.write_all(&self.mod_time.to_le_bytes())?;
        w.write_all(&self.mod_date.to_le_bytes())?;
        w.write_all(&self.crc32.to_le_bytes())?;
        w.write_all(&self.compressed_size.to_le_bytes())?;
        w.write_all(&self.uncompressed_size.to_le_bytes())?;
        w.write_all(&name_len.to_le_bytes())?;
        // Extra field, comment, disk start, internal and external attributes
        w.write_all(&[0u8; 12])?;
        w.write_all(&self.local_header_offset.to_le_bytes())?;
        w.write_all(name)?;
        Ok(())
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        expect_signature(r, CENTRAL_ENTRY_SIGNATURE, "central directory entry")?;

        let version_made_by = read_u16(r)?;
        let version_needed = read_u16(r)?;
        let flags = read_u16(r)?;
        let method = read_u16(r)?;
        let mod_time = read_u16(r)?;
        let mod_date = read_u16(r)?;
        let crc32 = read_u32(r)?;
        let compressed_size = read_u32(r)?;
        let uncompressed_size = read_u32(r)?;
        let name_len = read_u16(r)? as usize;
        let extra_len = read_u16(r)? as usize;
        let comment_len = read_u16(r)? as usize;

        // Disk start, internal and external attributes
        let mut skipped = [0u8; 8];
        r.read_exact(&mut skipped)?;

        let local_header_offset = read_u32(r)?;

        let mut name = vec![0u8; name_len];
        r.read_exact(&mut name)?;

        let mut trailer = vec![0u8; extra_len + comment_len];
        r.read_exact(&mut trailer)?;

        Ok(Self {
            version_made_by,
            version_needed,
            flags,
            method,
            mod_time,
            mod_date,
            crc32,
            compressed_size,
            uncompressed_size,
            local_header_offset,
            name: String::from_utf8_lossy(&name).into_owned(),
        })
    }

    /// Directory entries carry no data.
    pub fn is_directory(&self) -> bool {
        self.name.ends_with('/')
    }

    pub fn is_zip64(&self) -> bool {
        self.compressed_size == ZIP64_SIZE_SENTINEL
            || self.uncompressed_size == ZIP64_SIZE_SENTINEL
            || self.local_header_offset == ZIP64_SIZE_SENTINEL
    }
}

/// Local file header immediately preceding a member's data.
#[derive(Debug, Clone, Default)]
pub struct LocalHeader {
    pub version_needed: u16,
    pub flags: u16,
    pub method: u16,
    pub mod_time: u16,
    pub mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub name_len: u16,
    pub extra_len: u16,
}

impl LocalHeader {
    /// Size of the fixed part of the header in bytes.
    pub const SIZE: usize = 30;

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&LOCAL_HEADER_SIGNATURE.to_le_bytes())?;
        w.write_all(&self.version_needed.to_le_bytes())?;
        w.write_all(&self.flags.to_le_bytes())?;
        w.write_all(&self.method.to_le_bytes())?;
        w.write_all(&self.mod_time.to_le_bytes())?;
        w.write_all(&self.mod_date.to_le_bytes())?;
        w.write_all(&self.crc32.to_le_bytes())?;
        w.write_all(&self.compressed_size.to_le_bytes())?;
        w.write_all(&self.uncompressed_size.to_le_bytes())?;
        w.write_all(&self.name_len.to_le_bytes())?;
        w.write_all(&self.extra_len.to_le_bytes())?;
        Ok(())
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        expect_signature(r, LOCAL_HEADER_SIGNATURE, "local file header")?;
        Ok(Self {
            version_needed: read_u16(r)?,
            flags: read_u16(r)?,
            method: read_u16(r)?,
            mod_time: read_u16(r)?,
            mod_date: read_u16(r)?,
            crc32: read_u32(r)?,
            compressed_size: read_u32(r)?,
            uncompressed_size: read_u32(r)?,
            name_len: read_u16(r)?,
            extra_len: read_u16(r)?,
        })
    }

    /// Offset of the member data relative to the start of this header.
    pub fn data_offset(&self) -> usize {
        Self::SIZE + self.name_len as usize + self.extra_len as usize
    }
}
