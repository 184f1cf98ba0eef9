//! Show archive container handling.
//!
//! A `.skyc` show file is a ZIP container. Only the subset of ZIP that show
//! exporters produce is accepted:
//!
//! ```text
//! Local file header (30+ bytes) per member:
//!   Signature: "PK\x03\x04"
//!   Version, flags, method (stored = 0, deflate = 8)
//!   CRC-32, compressed size, uncompressed size
//!   Name length, extra length, name, extra
//!   Member data
//!
//! Central directory (46+ bytes per member):
//!   Signature: "PK\x01\x02"
//!   Same metadata plus the local header offset
//!
//! End of central directory (22+ bytes):
//!   Signature: "PK\x05\x06"
//!   Entry count, directory size, directory offset, comment
//! ```
//!
//! ZIP64, multi-disk and encrypted archives are rejected as corrupt.

mod format;
mod reader;
mod writer;

pub use format::{CentralEntry, CompressionMethod, EndRecord, LocalHeader};
pub use reader::{ArchiveError, REQUIRED_MEMBERS, SHOW_MEMBER, ShowArchive};
pub use writer::ArchiveWriter;
