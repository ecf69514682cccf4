//! Universal error handling for the API

use aide::OperationOutput;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use schemars::JsonSchema;
use serde::Serialize;

use crate::{images::InputError, object_store::StorageError};

/// API error response envelope
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    /// Whether the client may retry the same request
    pub allow_retry: bool,
    /// Error details
    error: ErrorBody,
}

/// Error body containing code and message
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    /// Machine-readable error code
    pub code: &'static str,
    /// Human-readable error message
    pub message: &'static str,
}

/// Application error type that wraps the API error response
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    inner: ApiErrorResponse,
}

impl AppError {
    /// Create a new application error
    #[must_use]
    pub const fn new(
        status: StatusCode,
        code: &'static str,
        msg: &'static str,
        retry: bool,
    ) -> Self {
        Self {
            status,
            inner: ApiErrorResponse {
                allow_retry: retry,
                error: ErrorBody { code, message: msg },
            },
        }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.inner.error.code
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error based on status code
        match self.status.as_u16() {
            400..=499 => tracing::warn!(
                "Client error: {} - {}",
                self.inner.error.code,
                self.inner.error.message
            ),
            500..=599 => tracing::error!(
                "Server error: {} - {}",
                self.inner.error.code,
                self.inner.error.message
            ),
            _ => {}
        }

        (self.status, Json(self.inner)).into_response()
    }
}

/// Convert rejected client input to application errors
impl From<InputError> for AppError {
    fn from(err: InputError) -> Self {
        // The response path logs the 4xx at warn; only the detail goes here
        tracing::debug!("Invalid input: {err}");

        match err {
            InputError::MissingFile => Self::new(
                StatusCode::BAD_REQUEST,
                "missing_file",
                "No file part named `image` or `file` was sent",
                false,
            ),
            InputError::EmptyFilename => Self::new(
                StatusCode::BAD_REQUEST,
                "empty_filename",
                "No file was selected",
                false,
            ),
            InputError::UnsupportedExtension(_) => Self::new(
                StatusCode::BAD_REQUEST,
                "unsupported_extension",
                "Only png, jpg, jpeg and gif files are accepted",
                false,
            ),
            InputError::MissingField(_) => Self::new(
                StatusCode::BAD_REQUEST,
                "missing_field",
                "A required field is missing or empty",
                false,
            ),
            InputError::MalformedMultipart(_) => Self::new(
                StatusCode::BAD_REQUEST,
                "invalid_multipart",
                "Expected a multipart/form-data body",
                false,
            ),
            InputError::PayloadTooLarge => Self::new(
                StatusCode::PAYLOAD_TOO_LARGE,
                "payload_too_large",
                "Uploaded file is too large",
                false,
            ),
            InputError::InvalidQuery(_) => Self::new(
                StatusCode::BAD_REQUEST,
                "invalid_query",
                "Invalid query parameters",
                false,
            ),
        }
    }
}

/// Convert storage errors to application errors
impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match &err {
            StorageError::NotFound(key) => {
                tracing::debug!("Object not found: {key}");
                Self::new(
                    StatusCode::NOT_FOUND,
                    "not_found",
                    "File not found",
                    false,
                )
            }
            StorageError::S3Error(msg) | StorageError::AwsError(msg) => {
                tracing::error!(error = ?err, "S3/AWS error: {msg}");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                    true,
                )
            }
            StorageError::ConfigError(msg) => {
                tracing::error!("Configuration error: {msg}");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                    false,
                )
            }
        }
    }
}

impl OperationOutput for AppError {
    type Inner = ApiErrorResponse;

    fn operation_response(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Option<aide::openapi::Response> {
        Json::<ApiErrorResponse>::operation_response(ctx, operation)
    }
}
