//! Resource storage behind the `/files` route.
//!
//! The router only ever sees the two outcomes of [`ResourceStore`]: bytes or
//! a [`StoreError`]. Filesystem details stay inside the implementations.

pub mod file;
pub mod memory;

use bytes::Bytes;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("invalid resource name: {0:?}")]
    InvalidName(String),
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Named byte blobs.
pub trait ResourceStore: Send + Sync {
    fn read(&self, name: &str) -> Result<Bytes, StoreError>;

    /// Replaces the resource with `bytes`, creating it if needed.
    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError>;
}

/// Rejects names that could resolve outside of a flat namespace.
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if bad {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}
