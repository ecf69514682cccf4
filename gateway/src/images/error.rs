//! Client input errors raised before any storage call

use thiserror::Error;

/// Problems with the caller's request that make it impossible to derive a key
/// or accept the file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// No `image` or `file` part in the form
    #[error("no file part named `image` or `file`")]
    MissingFile,

    /// File part present but its filename is empty
    #[error("uploaded file has an empty filename")]
    EmptyFilename,

    /// Extension outside the allowed image set
    #[error("file extension is not allowed: {0:?}")]
    UnsupportedExtension(String),

    /// Required form or query field is absent or empty
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Body could not be read as `multipart/form-data`
    #[error("malformed multipart body: {0}")]
    MalformedMultipart(String),

    /// Body exceeded the configured upload limit
    #[error("upload exceeds the configured size limit")]
    PayloadTooLarge,

    /// Query string could not be parsed or failed validation
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}
