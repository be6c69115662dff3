pub mod backend;
pub mod config;
pub mod content;
pub mod derive;
pub mod editor;
pub mod preview;
pub mod site;
pub mod status;
pub mod storage;
pub mod warning;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Rejected input. Raised before any buffer mutation.
    #[error("{0}")]
    Validation(String),
    #[error("Upload failed: {0}")]
    Upload(String),
    #[error("Failed to parse CSV: {0}")]
    Parse(String),
    #[error("Post not found: {0}")]
    NotFound(i64),
    #[error("Post store error: {0}")]
    Store(#[from] backend::StoreError),
    #[error("I/O error ({path}): {error}")]
    Io {
        error: std::io::Error,
        path: std::path::PathBuf,
    },
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
