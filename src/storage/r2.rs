use aws_config::BehaviorVersion;
use tracing::{debug, error};

use super::{ObjectStore, join_key};

pub struct R2Store {
    client: aws_sdk_s3::Client,
    bucket: String,
    prefix: Option<String>,
    public_url: url::Url,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to put object: {0}")]
    Put(String),
}

impl R2Store {
    pub async fn new(
        account_id: &str,
        access_key_id: &str,
        secret_access_key: &str,
        bucket: impl Into<String>,
        prefix: Option<String>,
        public_url: url::Url,
    ) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .endpoint_url(format!("https://{account_id}.r2.cloudflarestorage.com"))
            .credentials_provider(aws_sdk_s3::config::Credentials::new(
                access_key_id,
                secret_access_key,
                None, // session token is not used with R2
                None,
                "R2",
            ))
            .region("auto")
            .load()
            .await;
        Self {
            client: aws_sdk_s3::Client::new(&config),
            bucket: bucket.into(),
            prefix,
            public_url,
        }
    }

    fn key(&self, key: &str) -> String {
        join_key(self.prefix.as_deref(), key)
    }
}

impl ObjectStore for R2Store {
    type Error = Error;

    async fn put(&self, key: &str, content_type: &str, body: &[u8]) -> Result<(), Self::Error> {
        let key = self.key(key);
        debug!(bucket = self.bucket, key, size = body.len(), "put object");
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type)
            .cache_control("max-age=3600")
            .body(aws_sdk_s3::primitives::ByteStream::from(body.to_vec()))
            .send()
            .await
            .map_err(|e| {
                error!(bucket = self.bucket, key, error = %e, "failed to put object");
                Error::Put(e.to_string())
            })?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/{}",
            self.public_url.as_str().trim_end_matches('/'),
            self.key(key)
        )
    }
}
