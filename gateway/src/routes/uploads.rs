use std::sync::Arc;

use axum::{Extension, Json};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    images::{
        FromUploadForm, GroupProfileFields, ImageTarget, PunishFeedFields, UploadForm,
        UploadedFile, UserProfileFields,
    },
    object_store::ObjectStore,
    types::{AppError, GatewayConfig},
};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UploadResponse {
    /// Human-readable confirmation
    pub message: String,
    /// Object key the file was stored under
    pub filename: String,
}

/// Uploads an image under the configured fixed key
///
/// # Errors
///
/// - 400 when the file is missing, unnamed or not an allowed image type
/// - 500 when the bucket rejects the write
#[instrument(skip_all)]
pub async fn upload_fixed_image(
    Extension(object_store): Extension<Arc<dyn ObjectStore>>,
    Extension(config): Extension<Arc<GatewayConfig>>,
    mut form: UploadForm,
) -> Result<Json<UploadResponse>, AppError> {
    let image = form.take_image(config.validate_extensions)?;
    let target = ImageTarget::Fixed(config.default_object_key.clone());

    store_image(object_store.as_ref(), image, &target).await
}

/// Uploads a user's profile picture to `{userId}_{userSns}_userProfile`
///
/// # Errors
///
/// - 400 when the file is invalid or `userId`/`userSns` is missing
/// - 500 when the bucket rejects the write
#[instrument(skip_all)]
pub async fn upload_user_profile(
    Extension(object_store): Extension<Arc<dyn ObjectStore>>,
    Extension(config): Extension<Arc<GatewayConfig>>,
    mut form: UploadForm,
) -> Result<Json<UploadResponse>, AppError> {
    let image = form.take_image(config.validate_extensions)?;
    let target = ImageTarget::UserProfile(UserProfileFields::from_form(&form)?);

    store_image(object_store.as_ref(), image, &target).await
}

/// Uploads a group's profile picture to `{groupId}_groupProfile`
///
/// # Errors
///
/// - 400 when the file is invalid or `groupId` is missing
/// - 500 when the bucket rejects the write
#[instrument(skip_all)]
pub async fn upload_group_profile(
    Extension(object_store): Extension<Arc<dyn ObjectStore>>,
    Extension(config): Extension<Arc<GatewayConfig>>,
    mut form: UploadForm,
) -> Result<Json<UploadResponse>, AppError> {
    let image = form.take_image(config.validate_extensions)?;
    let target = ImageTarget::GroupProfile(GroupProfileFields::from_form(&form)?);

    store_image(object_store.as_ref(), image, &target).await
}

/// Uploads punishment evidence to `{userId}_{userSns}_{groupId}_{punishId}_punish`
///
/// # Errors
///
/// - 400 when the file is invalid or any of the four fields is missing
/// - 500 when the bucket rejects the write
#[instrument(skip_all)]
pub async fn upload_punish_feed(
    Extension(object_store): Extension<Arc<dyn ObjectStore>>,
    Extension(config): Extension<Arc<GatewayConfig>>,
    mut form: UploadForm,
) -> Result<Json<UploadResponse>, AppError> {
    let image = form.take_image(config.validate_extensions)?;
    let target = ImageTarget::PunishFeed(PunishFeedFields::from_form(&form)?);

    store_image(object_store.as_ref(), image, &target).await
}

async fn store_image(
    object_store: &dyn ObjectStore,
    image: UploadedFile,
    target: &ImageTarget,
) -> Result<Json<UploadResponse>, AppError> {
    let key = target.object_key();
    let size = image.data.len();
    let content_type = image
        .content_type
        .as_deref()
        .unwrap_or(mime::APPLICATION_OCTET_STREAM.essence_str());

    object_store
        .put_object(&key, image.data, content_type)
        .await?;

    tracing::info!(
        %key,
        bucket = object_store.bucket_name(),
        original_filename = %image.filename,
        size,
        "Stored image"
    );

    Ok(Json(UploadResponse {
        message: format!("'{key}' uploaded successfully"),
        filename: key,
    }))
}
