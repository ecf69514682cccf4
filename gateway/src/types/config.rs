//! Gateway settings resolved once at startup

use std::env;
use std::str::FromStr;

use anyhow::{bail, Context};

/// Key served by `GET /` and written by `POST /upload`
pub const DEFAULT_OBJECT_KEY: &str = "img.png";
/// Request body cap for uploads (10 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_PORT: u16 = 8080;

/// Static configuration shared by every request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Bucket all images are stored in
    pub bucket_name: String,
    /// Literal key of the single-image variant
    pub default_object_key: String,
    /// Reject files whose extension is not an allowed image type
    pub validate_extensions: bool,
    pub max_upload_bytes: usize,
    pub port: u16,
}

impl GatewayConfig {
    /// Configuration for `bucket_name` with every other setting at its default
    #[must_use]
    pub fn new(bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            default_object_key: DEFAULT_OBJECT_KEY.to_string(),
            validate_extensions: true,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            port: DEFAULT_PORT,
        }
    }

    /// Reads the configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if `S3_BUCKET_NAME` is unset or blank, or if any
    /// optional variable is set to an unparsable value
    pub fn from_env() -> anyhow::Result<Self> {
        let bucket_name = env::var("S3_BUCKET_NAME")
            .context("S3_BUCKET_NAME environment variable is not set")?;
        if bucket_name.trim().is_empty() {
            bail!("S3_BUCKET_NAME environment variable is empty");
        }

        let defaults = Self::new(bucket_name);

        Ok(Self {
            default_object_key: env::var("DEFAULT_OBJECT_KEY")
                .ok()
                .filter(|key| !key.is_empty())
                .unwrap_or(defaults.default_object_key),
            validate_extensions: parse_var("VALIDATE_IMAGE_EXTENSIONS")?
                .unwrap_or(defaults.validate_extensions),
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES")?.unwrap_or(defaults.max_upload_bytes),
            port: parse_var("PORT")?.unwrap_or(defaults.port),
            bucket_name: defaults.bucket_name,
        })
    }
}

fn parse_var<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name} has an invalid value: {raw:?}")),
        Err(_) => Ok(None),
    }
}
