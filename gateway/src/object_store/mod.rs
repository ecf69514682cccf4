//! Object storage used by the upload and link handlers
//!
//! Handlers only ever see [`ObjectStore`]; the process wires in
//! [`S3ObjectStore`] at startup and tests wire in the in-memory store from
//! [`mock`].

mod error;
mod s3;

use std::time::Duration;

use axum::body::Bytes;
use chrono::{DateTime, Utc};

pub use error::{StorageError, StorageResult};
pub use s3::S3ObjectStore;

/// Lifetime of every signed download URL (one hour)
pub const SIGNED_URL_EXPIRY_SECS: u64 = 60 * 60;

/// Presigned URL with expiration information
#[derive(Debug, Clone)]
pub struct PresignedUrl {
    /// The presigned URL for GET operations
    pub url: String,
    /// UTC timestamp when the URL expires
    pub expires_at: DateTime<Utc>,
}

/// Storage backend holding uploaded images
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Name of the bucket objects are written to
    fn bucket_name(&self) -> &str;

    /// Writes `body` under `key`, replacing any existing object
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> StorageResult<()>;

    /// Returns whether an object exists under `key`
    async fn check_object_exists(&self, key: &str) -> StorageResult<bool>;

    /// Signs a GET request for `key` valid for `expires_in`
    async fn presigned_get_url(&self, key: &str, expires_in: Duration)
        -> StorageResult<PresignedUrl>;
}

/// Issues a signed download URL for an object that is known to exist
///
/// # Errors
///
/// Returns `StorageError::NotFound` when nothing is stored under `key`, or
/// whatever the backend reported while probing or signing.
pub async fn issue_download_url(
    object_store: &dyn ObjectStore,
    key: &str,
) -> StorageResult<PresignedUrl> {
    if !object_store.check_object_exists(key).await? {
        return Err(StorageError::NotFound(key.to_owned()));
    }

    object_store
        .presigned_get_url(key, Duration::from_secs(SIGNED_URL_EXPIRY_SECS))
        .await
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use axum::body::Bytes;
    use chrono::Utc;

    use super::{ObjectStore, PresignedUrl, StorageError, StorageResult};

    /// Object as kept by [`InMemoryObjectStore`]
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct StoredObject {
        pub body: Bytes,
        pub content_type: String,
    }

    /// Bucket kept in process memory, with signed URLs shaped like S3's
    pub struct InMemoryObjectStore {
        bucket_name: String,
        objects: Mutex<HashMap<String, StoredObject>>,
        put_calls: AtomicUsize,
        presign_calls: AtomicUsize,
        unavailable: bool,
    }

    impl InMemoryObjectStore {
        #[must_use]
        pub fn new(bucket_name: impl Into<String>) -> Self {
            Self {
                bucket_name: bucket_name.into(),
                objects: Mutex::new(HashMap::new()),
                put_calls: AtomicUsize::new(0),
                presign_calls: AtomicUsize::new(0),
                unavailable: false,
            }
        }

        /// A store where every call fails like an unreachable backend
        #[must_use]
        pub fn unavailable(bucket_name: impl Into<String>) -> Self {
            Self {
                unavailable: true,
                ..Self::new(bucket_name)
            }
        }

        #[must_use]
        pub fn object(&self, key: &str) -> Option<StoredObject> {
            self.objects.lock().unwrap().get(key).cloned()
        }

        /// Number of `put_object` calls received, failed ones included
        #[must_use]
        pub fn put_calls(&self) -> usize {
            self.put_calls.load(Ordering::SeqCst)
        }

        /// Number of signed URLs handed out
        #[must_use]
        pub fn presign_calls(&self) -> usize {
            self.presign_calls.load(Ordering::SeqCst)
        }

        fn check_available(&self) -> StorageResult<()> {
            if self.unavailable {
                return Err(StorageError::AwsError(
                    "dispatch failure: connection refused".to_string(),
                ));
            }
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl ObjectStore for InMemoryObjectStore {
        fn bucket_name(&self) -> &str {
            &self.bucket_name
        }

        async fn put_object(
            &self,
            key: &str,
            body: Bytes,
            content_type: &str,
        ) -> StorageResult<()> {
            self.put_calls.fetch_add(1, Ordering::SeqCst);
            self.check_available()?;

            self.objects.lock().unwrap().insert(
                key.to_owned(),
                StoredObject {
                    body,
                    content_type: content_type.to_owned(),
                },
            );
            Ok(())
        }

        async fn check_object_exists(&self, key: &str) -> StorageResult<bool> {
            self.check_available()?;
            Ok(self.objects.lock().unwrap().contains_key(key))
        }

        async fn presigned_get_url(
            &self,
            key: &str,
            expires_in: Duration,
        ) -> StorageResult<PresignedUrl> {
            self.check_available()?;
            self.presign_calls.fetch_add(1, Ordering::SeqCst);

            Ok(PresignedUrl {
                url: format!(
                    "https://{}.s3.memory.local/{key}?X-Amz-Expires={}",
                    self.bucket_name,
                    expires_in.as_secs()
                ),
                expires_at: Utc::now() + expires_in,
            })
        }
    }
}
