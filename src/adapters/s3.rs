use crate::domain::ports::ObjectStorage;
use crate::utils::error::{IngestError, Result};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
}

impl S3Storage {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl ObjectStorage for S3Storage {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| match err.into_service_error() {
                GetObjectError::NoSuchKey(_) => IngestError::ObjectNotFoundError {
                    key: key.to_string(),
                },
                err => IngestError::ObjectFetchError {
                    key: key.to_string(),
                    message: DisplayErrorContext(&err).to_string(),
                },
            })?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| IngestError::ObjectFetchError {
                key: key.to_string(),
                message: format!("failed to read object body: {}", e),
            })?;

        Ok(data.into_bytes().to_vec())
    }

    async fn store(&self, local_path: &Path, key: &str) -> Result<()> {
        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| IngestError::ObjectStoreError {
                key: key.to_string(),
                message: format!("failed to open {}: {}", local_path.display(), e),
            })?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|err| IngestError::ObjectStoreError {
                key: key.to_string(),
                message: DisplayErrorContext(&err).to_string(),
            })?;

        tracing::debug!("Uploaded {} to s3://{}/{}", local_path.display(), self.bucket, key);
        Ok(())
    }
}
