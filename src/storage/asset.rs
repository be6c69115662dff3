use std::path::PathBuf;

use tracing::trace;

use super::ObjectStore;

/// Stores objects as files under a directory served alongside the site.
pub struct AssetStore {
    dir: PathBuf,
    public_prefix: String,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to write asset ({path}): {error}")]
    Write {
        error: std::io::Error,
        path: PathBuf,
    },
    #[error("Invalid asset key: {0}")]
    InvalidKey(String),
}

impl AssetStore {
    pub fn new(dir: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_prefix: public_prefix.into(),
        }
    }
}

impl ObjectStore for AssetStore {
    type Error = Error;

    async fn put(&self, key: &str, _content_type: &str, body: &[u8]) -> Result<(), Self::Error> {
        if key.is_empty() || key.split('/').any(|segment| segment == "..") {
            return Err(Error::InvalidKey(key.to_owned()));
        }
        let path = self.dir.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|error| Error::Write {
                    error,
                    path: parent.to_owned(),
                })?;
        }
        trace!(path = %path.display(), size = body.len(), "write asset");
        tokio::fs::write(&path, body)
            .await
            .map_err(|error| Error::Write { error, path })
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.public_prefix.trim_end_matches('/'))
    }
}
