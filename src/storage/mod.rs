//! Object storage for uploaded images.

pub mod asset;
pub mod r2;

use std::future::Future;

use crate::{config::ImageStorage, content::ImageFile};

pub trait ObjectStore {
    type Error: std::fmt::Display;

    fn put(
        &self,
        key: &str,
        content_type: &str,
        body: &[u8],
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Public URL an object stored under `key` is served from.
    fn public_url(&self, key: &str) -> String;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    R2(#[from] r2::Error),
    #[error(transparent)]
    Asset(#[from] asset::Error),
    #[error("R2 storage requires an access key id and secret access key")]
    MissingCredentials,
}

/// R2 API credentials.
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// The store selected by configuration.
pub enum ConfiguredStore {
    R2(r2::R2Store),
    Asset(asset::AssetStore),
}

impl ConfiguredStore {
    pub async fn new(
        storage: &ImageStorage,
        credentials: Option<Credentials>,
    ) -> Result<Self, Error> {
        match storage {
            ImageStorage::R2 {
                account_id,
                bucket,
                prefix,
                public_url,
            } => {
                let credentials = credentials.ok_or(Error::MissingCredentials)?;
                Ok(Self::R2(
                    r2::R2Store::new(
                        account_id,
                        &credentials.access_key_id,
                        &credentials.secret_access_key,
                        bucket,
                        prefix.clone(),
                        public_url.clone(),
                    )
                    .await,
                ))
            }
            ImageStorage::Asset { dir, public_prefix } => Ok(Self::Asset(
                asset::AssetStore::new(dir.clone(), public_prefix.clone()),
            )),
        }
    }
}

impl ObjectStore for ConfiguredStore {
    type Error = Error;

    async fn put(&self, key: &str, content_type: &str, body: &[u8]) -> Result<(), Self::Error> {
        match self {
            Self::R2(store) => Ok(store.put(key, content_type, body).await?),
            Self::Asset(store) => Ok(store.put(key, content_type, body).await?),
        }
    }

    fn public_url(&self, key: &str) -> String {
        match self {
            Self::R2(store) => store.public_url(key),
            Self::Asset(store) => store.public_url(key),
        }
    }
}

/// A key unique to this upload: `{unix_millis}-{hash8}.{ext}`.
pub fn object_key(file: &ImageFile, now: chrono::DateTime<chrono::Utc>) -> String {
    let hash = blake3::hash(&file.body).to_hex();
    format!(
        "{}-{}.{}",
        now.timestamp_millis(),
        &hash.as_str()[..8],
        file.extension().to_ascii_lowercase()
    )
}

pub(crate) fn join_key(prefix: Option<&str>, key: &str) -> String {
    match prefix.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty()) {
        Some(prefix) => format!("{prefix}/{key}"),
        None => key.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    #[test]
    fn test_object_key() {
        let file = ImageFile::new("Photo.JPG", mime::IMAGE_JPEG, b"jpeg".to_vec()).unwrap();
        let now = chrono::Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let key = object_key(&file, now);
        let hash = blake3::hash(b"jpeg").to_hex();
        assert_eq!(key, format!("1700000000123-{}.jpg", &hash.as_str()[..8]));
    }

    #[tokio::test]
    async fn test_configured_store() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ImageStorage::Asset {
            dir: dir.path().to_owned(),
            public_prefix: "/images".into(),
        };
        let store = ConfiguredStore::new(&storage, None).await.unwrap();
        store.put("x.png", "image/png", b"x").await.unwrap();
        assert_eq!(store.public_url("x.png"), "/images/x.png");

        let storage = ImageStorage::R2 {
            account_id: "abc".into(),
            bucket: "blog-images".into(),
            prefix: None,
            public_url: "https://images.example.com".parse().unwrap(),
        };
        assert!(matches!(
            ConfiguredStore::new(&storage, None).await,
            Err(Error::MissingCredentials)
        ));
    }

    #[test]
    fn test_join_key() {
        assert_eq!(join_key(Some("/posts/"), "a.png"), "posts/a.png");
        assert_eq!(join_key(Some(""), "a.png"), "a.png");
        assert_eq!(join_key(None, "a.png"), "a.png");
    }
}
