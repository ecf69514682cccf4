use std::sync::Arc;

use aide::openapi::OpenApi;
use axum::{extract::DefaultBodyLimit, Extension, Router};
use datadog_tracing::axum::{shutdown_signal, OtelAxumLayer, OtelInResponseLayer};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::routes;
use crate::{
    object_store::ObjectStore,
    types::{Environment, GatewayConfig},
};

/// Builds the application router with its dependencies attached
#[must_use]
pub fn build_router(
    environment: Environment,
    config: Arc<GatewayConfig>,
    object_store: Arc<dyn ObjectStore>,
) -> Router {
    let mut openapi = OpenApi::default();
    let max_upload_bytes = config.max_upload_bytes;

    let router = routes::handler(environment).finish_api(&mut openapi);

    router
        .layer(Extension(Arc::new(openapi)))
        .layer(Extension(config))
        .layer(Extension(object_store))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
}

/// Starts the server with the given environment and dependencies
///
/// # Errors
///
/// Returns an error if the server fails to start or bind to the port
pub async fn start(
    environment: Environment,
    config: Arc<GatewayConfig>,
    object_store: Arc<dyn ObjectStore>,
) -> anyhow::Result<()> {
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));

    let router = build_router(environment, config, object_store)
        // Include trace context as header into the response
        .layer(OtelInResponseLayer)
        // Start OpenTelemetry trace on incoming request
        .layer(OtelAxumLayer::default());

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🔄 Image Gateway started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}
