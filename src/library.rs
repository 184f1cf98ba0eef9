//! Show library on disk: a data directory plus its file manifest.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::schema::{Manifest, ViewerConfig, is_plain_file_name};

/// Errors raised while opening the library or resolving show files.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Manifest {0} lists no shows")]
    EmptyManifest(PathBuf),
    #[error("Show {0:?} is not listed in the manifest")]
    UnknownFile(String),
    #[error("Show name {0:?} is not a plain file name")]
    InvalidName(String),
}

/// The show files available to the viewer.
///
/// The manifest is read once when the library is opened.
#[derive(Debug, Clone)]
pub struct Library {
    root: PathBuf,
    manifest: Manifest,
}

impl Library {
    /// Read the manifest named by `config`.
    pub fn open(config: &ViewerConfig) -> Result<Self, LibraryError> {
        let path = config.manifest_path();
        let json = fs::read_to_string(&path).map_err(|source| LibraryError::Io {
            path: path.clone(),
            source,
        })?;
        let manifest = Manifest::from_json(&json).map_err(|source| LibraryError::Manifest {
            path: path.clone(),
            source,
        })?;

        if let Some(bad) = manifest.files.iter().find(|f| !is_plain_file_name(f)) {
            return Err(LibraryError::InvalidName(bad.clone()));
        }
        if manifest.is_empty() {
            return Err(LibraryError::EmptyManifest(path));
        }

        log::info!(
            "Opened show library {} with {} files",
            config.data_dir.display(),
            manifest.len()
        );
        Ok(Self {
            root: config.data_dir.clone(),
            manifest,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Listed show names, in manifest order.
    pub fn files(&self) -> &[String] {
        &self.manifest.files
    }

    /// The show opened at startup.
    pub fn first(&self) -> Option<&str> {
        self.manifest.first()
    }

    /// Resolve a listed show name to its path.
    pub fn path_for(&self, name: &str) -> Result<PathBuf, LibraryError> {
        if !is_plain_file_name(name) {
            return Err(LibraryError::InvalidName(name.to_string()));
        }
        if !self.manifest.contains(name) {
            return Err(LibraryError::UnknownFile(name.to_string()));
        }
        Ok(self.root.join(name))
    }

    /// Read the raw bytes of a listed show.
    pub fn read(&self, name: &str) -> Result<Vec<u8>, LibraryError> {
        let path = self.path_for(name)?;
        fs::read(&path).map_err(|source| LibraryError::Io { path, source })
    }
}
