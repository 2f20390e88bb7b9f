use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::debug;

use crate::store::{ResourceStore, StoreError, validate_name};

/// Stores each resource as a file directly under `root`.
///
/// Plain blocking `std::fs` calls: requests are handled on the single
/// multiplexer thread and a read or write runs to completion in place.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }
}

impl ResourceStore for FileStore {
    fn read(&self, name: &str) -> Result<Bytes, StoreError> {
        let path = self.path_for(name)?;
        match std::fs::read(&path) {
            Ok(contents) => {
                debug!(path = %path.display(), bytes = contents.len(), "Read resource");
                Ok(Bytes::from(contents))
            }
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::IsADirectory) => {
                Err(StoreError::NotFound(name.to_string()))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        std::fs::create_dir_all(&self.root)?;
        std::fs::write(&path, bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "Wrote resource");
        Ok(())
    }
}
