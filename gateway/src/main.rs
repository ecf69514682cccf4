use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;

use image_gateway::{
    object_store::{ObjectStore, S3ObjectStore},
    server,
    types::{Environment, GatewayConfig},
};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env()?;

    // Use JSON format for staging/production (Datadog), regular format for development
    if environment.json_logs() {
        fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    } else {
        fmt().with_env_filter(EnvFilter::from_default_env()).init();
    }

    let config = Arc::new(GatewayConfig::from_env()?);

    let s3_client = Arc::new(S3Client::from_conf(environment.s3_client_config().await));
    let object_store: Arc<dyn ObjectStore> =
        Arc::new(S3ObjectStore::new(s3_client, config.bucket_name.clone()));

    tracing::info!(
        bucket = %config.bucket_name,
        default_object_key = %config.default_object_key,
        validate_extensions = config.validate_extensions,
        "Configured object storage"
    );

    server::start(environment, config, object_store).await
}
