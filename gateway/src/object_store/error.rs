//! Error types for object storage operations

use aws_sdk_s3::{
    error::{DisplayErrorContext, SdkError},
    operation::{get_object::GetObjectError, head_object::HeadObjectError, put_object::PutObjectError},
};
use thiserror::Error;

/// Result type for object storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during object storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// No object is stored under the requested key
    #[error("Object not found: {0}")]
    NotFound(String),

    /// S3 service error
    #[error("S3 service error: {0}")]
    S3Error(String),

    /// AWS SDK error (dispatch, timeout, credentials, ...)
    #[error("AWS SDK error: {0}")]
    AwsError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<SdkError<HeadObjectError>> for StorageError {
    fn from(error: SdkError<HeadObjectError>) -> Self {
        match error {
            SdkError::ServiceError(ref err) => {
                Self::S3Error(format!("{}", DisplayErrorContext(err.err())))
            }
            _ => Self::AwsError(format!("{}", DisplayErrorContext(&error))),
        }
    }
}

impl From<SdkError<PutObjectError>> for StorageError {
    fn from(error: SdkError<PutObjectError>) -> Self {
        match error {
            SdkError::ServiceError(ref err) => {
                Self::S3Error(format!("{}", DisplayErrorContext(err.err())))
            }
            _ => Self::AwsError(format!("{}", DisplayErrorContext(&error))),
        }
    }
}

impl From<SdkError<GetObjectError>> for StorageError {
    fn from(error: SdkError<GetObjectError>) -> Self {
        match error {
            SdkError::ServiceError(ref err) => {
                Self::S3Error(format!("{}", DisplayErrorContext(err.err())))
            }
            _ => Self::AwsError(format!("{}", DisplayErrorContext(&error))),
        }
    }
}
