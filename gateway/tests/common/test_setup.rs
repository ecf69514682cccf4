use std::sync::Arc;

use axum::{body::Body, http::Request, response::Response, Router};
use image_gateway::{
    object_store::{mock::InMemoryObjectStore, ObjectStore},
    server,
    types::{Environment, GatewayConfig},
};
use tower::ServiceExt;

use super::utils::{multipart_body, Part};

pub const TEST_BUCKET: &str = "image-gateway-test";

/// Setup test environment variables with all the required configuration
pub fn setup_test_env() {
    // Load test environment variables
    dotenvy::from_path(".env.example").ok();

    // Initialize tracing for tests
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .ok();
}

/// Router wired to an in-memory bucket
pub struct TestSetup {
    pub router: Router,
    pub config: Arc<GatewayConfig>,
    pub object_store: Arc<InMemoryObjectStore>,
}

impl TestSetup {
    pub fn new() -> Self {
        Self::with(
            GatewayConfig::new(TEST_BUCKET),
            InMemoryObjectStore::new(TEST_BUCKET),
        )
    }

    /// Every storage call fails as if S3 were unreachable
    pub fn with_unavailable_storage() -> Self {
        Self::with(
            GatewayConfig::new(TEST_BUCKET),
            InMemoryObjectStore::unavailable(TEST_BUCKET),
        )
    }

    pub fn with(config: GatewayConfig, object_store: InMemoryObjectStore) -> Self {
        Self::build(Environment::Development, config, object_store)
    }

    pub fn with_environment(environment: Environment) -> Self {
        Self::build(
            environment,
            GatewayConfig::new(TEST_BUCKET),
            InMemoryObjectStore::new(TEST_BUCKET),
        )
    }

    fn build(
        environment: Environment,
        config: GatewayConfig,
        object_store: InMemoryObjectStore,
    ) -> Self {
        setup_test_env();

        let config = Arc::new(config);
        let object_store = Arc::new(object_store);
        let shared_store: Arc<dyn ObjectStore> = object_store.clone();

        let router = server::build_router(environment, config.clone(), shared_store);

        Self {
            router,
            config,
            object_store,
        }
    }

    pub async fn send_multipart_request(
        &self,
        route: &str,
        parts: &[Part<'_>],
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let (content_type, body) = multipart_body(parts);

        let request = Request::builder()
            .uri(route)
            .method("POST")
            .header("Content-Type", content_type)
            .body(Body::from(body))?;

        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_get_request(
        &self,
        route: &str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("GET")
            .body(Body::empty())?;
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    /// Uploads `data` through the API and asserts it succeeded
    pub async fn upload(&self, route: &str, filename: &str, data: &[u8], fields: &[(&str, &str)]) {
        let mut parts = vec![Part::file("image", filename, "image/png", data)];
        parts.extend(fields.iter().map(|(name, value)| Part::text(name, value)));

        let response = self
            .send_multipart_request(route, &parts)
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), http::StatusCode::OK, "upload to {route} failed");
    }
}
