use std::sync::Arc;

use axum::{response::Redirect, Extension, Json};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    images::{ImageLinkQuery, ImageTarget},
    object_store::{issue_download_url, ObjectStore, SIGNED_URL_EXPIRY_SECS},
    types::{AppError, GatewayConfig, ValidatedQuery},
};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinkResponse {
    /// Object key the link points at
    pub key: String,
    /// Presigned GET URL
    pub url: String,
    /// Lifetime of the URL in seconds
    pub expires_in_secs: u64,
    /// ISO-8601 UTC timestamp when the URL expires
    pub expires_at: String,
}

/// Issues a signed download URL for an uploaded image
///
/// `reason` selects the key layout; the remaining parameters fill it in.
/// A new URL is signed on every call.
///
/// # Errors
///
/// - 400 when `reason` is unknown or a field it needs is missing
/// - 404 when no object is stored under the derived key
/// - 500 for any other storage failure
#[instrument(skip(object_store))]
pub async fn issue_image_link(
    Extension(object_store): Extension<Arc<dyn ObjectStore>>,
    ValidatedQuery(query): ValidatedQuery<ImageLinkQuery>,
) -> Result<Json<ImageLinkResponse>, AppError> {
    let key = ImageTarget::try_from(query)?.object_key();

    let presigned_url = issue_download_url(object_store.as_ref(), &key).await?;

    Ok(Json(ImageLinkResponse {
        key,
        url: presigned_url.url,
        expires_in_secs: SIGNED_URL_EXPIRY_SECS,
        expires_at: presigned_url.expires_at.to_rfc3339(),
    }))
}

/// Redirects to a signed download URL for the fixed-key image
///
/// # Errors
///
/// - 404 when the fixed key has not been uploaded yet
/// - 500 for any other storage failure
#[instrument(skip_all)]
pub async fn redirect_to_fixed_image(
    Extension(object_store): Extension<Arc<dyn ObjectStore>>,
    Extension(config): Extension<Arc<GatewayConfig>>,
) -> Result<Redirect, AppError> {
    let presigned_url =
        issue_download_url(object_store.as_ref(), &config.default_object_key).await?;

    Ok(Redirect::temporary(&presigned_url.url))
}
