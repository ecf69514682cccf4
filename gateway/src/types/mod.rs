mod config;
mod environment;
mod error;
mod extractors;

pub use config::{GatewayConfig, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_OBJECT_KEY, DEFAULT_PORT};
pub use environment::Environment;
pub use error::{ApiErrorResponse, AppError};
pub use extractors::ValidatedQuery;
