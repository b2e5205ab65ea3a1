//! Named-blob artifact storage: plain files or an encrypted SQLite store.

mod encrypted;
mod file;

pub use encrypted::SecureArtifactStore;
pub use file::FileArtifactStore;

use crate::config::{ArtifactBackend, ArtifactConfig};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact `{0}` not found")]
    NotFound(String),

    #[error("artifact `{name}` is corrupt: {reason}")]
    Corrupt { name: String, reason: String },

    #[error("artifact could not be encoded: {0}")]
    Encoding(String),

    #[error("artifact I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("artifact database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Opaque named blobs. `read` returns `Ok(None)` when nothing is stored under `name`.
pub trait ArtifactStore: Send + Sync {
    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), ArtifactError>;

    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, ArtifactError>;
}

/// Open the backend selected in `config`. `secret` keys the encrypted backend.
pub fn open_store(
    config: &ArtifactConfig,
    secret: &[u8],
) -> Result<Box<dyn ArtifactStore>, ArtifactError> {
    std::fs::create_dir_all(&config.dir)?;
    Ok(match config.backend {
        ArtifactBackend::File => Box::new(FileArtifactStore::new(&config.dir)),
        ArtifactBackend::Encrypted => Box::new(SecureArtifactStore::open(
            &config.dir.join("artifacts.db"),
            secret,
        )?),
    })
}
