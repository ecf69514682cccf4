//! S3-backed object store

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use aws_sdk_s3::{
    error::SdkError, operation::head_object::HeadObjectError, presigning::PresigningConfig,
    primitives::ByteStream, Client as S3Client,
};
use axum::body::Bytes;
use chrono::{DateTime, SubsecRound, Utc};
use tracing::debug;

use super::{ObjectStore, PresignedUrl, StorageError, StorageResult};

/// Image storage client for S3 operations
pub struct S3ObjectStore {
    s3_client: Arc<S3Client>,
    bucket_name: String,
}

impl S3ObjectStore {
    /// Creates a new S3 object store
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    /// * `bucket_name` - S3 bucket name for image storage
    #[must_use]
    pub const fn new(s3_client: Arc<S3Client>, bucket_name: String) -> Self {
        Self {
            s3_client,
            bucket_name,
        }
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3ObjectStore {
    fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Uploads the image with a single `PutObject` call
    ///
    /// The content type is passed through as declared by the client.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::S3Error` for S3 service errors
    /// Returns `StorageError::AwsError` for dispatch or credential failures
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> StorageResult<()> {
        debug!(key, content_type, size = body.len(), "Uploading object");

        self.s3_client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await?;

        Ok(())
    }

    /// Checks if an object exists in the bucket
    ///
    /// # Returns
    ///
    /// * `Ok(true)` if object exists
    /// * `Ok(false)` if object does not exist
    /// * `Err(StorageError)` if S3 operation fails
    async fn check_object_exists(&self, key: &str) -> StorageResult<bool> {
        let result = self
            .s3_client
            .head_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(SdkError::ServiceError(service_err))
                if matches!(service_err.err(), HeadObjectError::NotFound(_)) =>
            {
                Ok(false)
            }
            Err(e) => Err(StorageError::from(e)),
        }
    }

    /// Generates a presigned URL for GET operations
    ///
    /// Signing happens locally; it never contacts S3. The start time is pinned
    /// to whole seconds because `X-Amz-Date` carries no fraction, so
    /// `expires_at` matches the URL's real expiry.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ConfigError` if presigning config creation fails
    /// Returns `StorageError::S3Error` if presigned URL generation fails
    async fn presigned_get_url(
        &self,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<PresignedUrl> {
        let issued_at: DateTime<Utc> = Utc::now().trunc_subsecs(0);

        let presigned_config = PresigningConfig::builder()
            .start_time(SystemTime::from(issued_at))
            .expires_in(expires_in)
            .build()
            .map_err(|e| {
                StorageError::ConfigError(format!("Failed to create presigning config: {e}"))
            })?;

        let presigned_request = self
            .s3_client
            .get_object()
            .bucket(&self.bucket_name)
            .key(key)
            .presigned(presigned_config)
            .await?;

        let expires_at = issued_at + expires_in;

        debug!(key, %expires_at, "Generated presigned download URL");

        Ok(PresignedUrl {
            url: presigned_request.uri().to_string(),
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
    use chrono::{NaiveDateTime, Timelike};

    use super::*;
    use crate::object_store::SIGNED_URL_EXPIRY_SECS;

    /// Store whose client can sign but has no reachable endpoint behind it
    fn offline_store() -> S3ObjectStore {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new(
                "AKIDEXAMPLE",
                "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
                None,
                None,
                "static",
            ))
            .build();

        S3ObjectStore::new(Arc::new(S3Client::from_conf(config)), "my-bucket".to_string())
    }

    fn query_param<'a>(url: &'a str, name: &str) -> &'a str {
        let (_, query) = url.split_once('?').expect("presigned URL has a query");
        query
            .split('&')
            .find_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))
            .unwrap_or_else(|| panic!("{name} missing from {url}"))
    }

    #[tokio::test]
    async fn test_presigned_get_url_names_bucket_key_and_expiry() {
        let store = offline_store();

        let presigned = store
            .presigned_get_url(
                "u1_kakao_userProfile",
                Duration::from_secs(SIGNED_URL_EXPIRY_SECS),
            )
            .await
            .unwrap();

        assert!(presigned.url.contains("my-bucket"), "{}", presigned.url);
        assert!(presigned.url.contains("/u1_kakao_userProfile?"), "{}", presigned.url);
        assert_eq!(query_param(&presigned.url, "X-Amz-Expires"), "3600");
    }

    #[tokio::test]
    async fn test_presigned_get_url_expiry_matches_signature_date() {
        let store = offline_store();

        let presigned = store
            .presigned_get_url("img.png", Duration::from_secs(SIGNED_URL_EXPIRY_SECS))
            .await
            .unwrap();

        assert_eq!(presigned.expires_at.nanosecond(), 0);

        let signed_at =
            NaiveDateTime::parse_from_str(query_param(&presigned.url, "X-Amz-Date"), "%Y%m%dT%H%M%SZ")
                .unwrap()
                .and_utc();
        assert_eq!((presigned.expires_at - signed_at).num_seconds(), 3600);
    }
}
