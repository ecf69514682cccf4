mod docs;
pub mod downloads;
pub mod health;
pub mod uploads;

use aide::axum::{
    routing::{get, post},
    ApiRouter,
};

use crate::types::Environment;

/// Creates the router with all handler routes
pub fn handler(environment: Environment) -> ApiRouter {
    let router = ApiRouter::new()
        .api_route("/health", get(health::handler))
        .api_route("/upload", post(uploads::upload_fixed_image))
        .api_route("/uploads/user-profile", post(uploads::upload_user_profile))
        .api_route("/uploads/group-profile", post(uploads::upload_group_profile))
        .api_route("/uploads/punish-feed", post(uploads::upload_punish_feed))
        .api_route("/downloads/image", get(downloads::issue_image_link))
        // Redirects are not described in the OpenAPI document
        .route("/", axum::routing::get(downloads::redirect_to_fixed_image));

    if environment.show_api_docs() {
        router.merge(docs::handler())
    } else {
        router
    }
}
