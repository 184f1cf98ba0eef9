//! Show loading: archive bytes to a decoded show.

use std::io;

use crate::archive::{ArchiveError, ArchiveWriter, CompressionMethod, SHOW_MEMBER, ShowArchive};
use crate::trajectory::{Show, TrajectoryError, decode_document, encode_document};

/// Errors raised while loading a show file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    #[error(transparent)]
    Trajectory(#[from] TrajectoryError),
}

/// Decode the trajectory data held by an archive's members.
pub fn decode(archive: &ShowArchive) -> Result<Show, LoadError> {
    let document = archive.member(SHOW_MEMBER)?;
    Ok(decode_document(document)?)
}

/// Read and decode a show archive in one step.
///
/// Either a complete show is returned or nothing is: there is no partially
/// decoded state.
pub fn load_show(bytes: &[u8]) -> Result<Show, LoadError> {
    let archive = ShowArchive::read(bytes)?;
    let show = decode(&archive)?;
    log::info!(
        "Loaded show {:?}: {} drones, {:.2}s",
        show.title().unwrap_or("untitled"),
        show.len(),
        show.duration()
    );
    Ok(show)
}

/// Package a show into archive bytes.
pub fn pack_show(show: &Show, compression: CompressionMethod) -> io::Result<Vec<u8>> {
    let document = encode_document(show).map_err(io::Error::other)?;
    let mut writer = ArchiveWriter::new(compression);
    writer.add_member(SHOW_MEMBER, &document)?;
    writer.finish()
}
