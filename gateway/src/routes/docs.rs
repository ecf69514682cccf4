//! OpenAPI document and its Scalar viewer
//!
//! Only mounted when the environment exposes API docs; elsewhere both paths
//! fall through to the router's 404.

use std::sync::Arc;

use aide::{axum::ApiRouter, openapi::OpenApi, scalar::Scalar};
use axum::{
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json,
};

const OPENAPI_PATH: &str = "/openapi.json";

pub fn handler() -> ApiRouter {
    let viewer = Scalar::new(OPENAPI_PATH).with_title("Image Gateway API");

    ApiRouter::new()
        .route("/docs", viewer.axum_route())
        .route(OPENAPI_PATH, get(serve_openapi))
}

#[allow(clippy::unused_async)]
async fn serve_openapi(Extension(openapi): Extension<Arc<OpenApi>>) -> Response {
    Json(openapi.as_ref()).into_response()
}
