//! Image upload boundary.
//!
//! The remote procedure accepts a base64 image and an object path and returns
//! the stored image. The wrapping helper flattens any failure into a uniform
//! result with a fixed localized message: no structured error detail crosses
//! this boundary to the UI.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::error::RepositoryError;

/// Fixed user-facing message substituted for any upload failure.
pub const UPLOAD_FAILED_MESSAGE: &str = "画像のアップロードに失敗しました";

/// Upload request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// Base64-encoded image bytes.
    pub base64_image: String,
    /// Object path the image is stored under.
    pub object: String,
}

/// Upload response payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Base64-encoded stored image.
    pub base64_image: String,
}

/// Uniform result handed to the UI-facing caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    /// Whether the upload succeeded.
    pub success: bool,
    /// Response payload on success.
    pub data: Option<UploadResponse>,
    /// Fixed localized message on failure.
    pub error: Option<String>,
}

/// Port for the remote image upload procedure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// Upload an image, classifying any failure into the repository taxonomy.
    async fn upload(&self, request: UploadRequest) -> Result<UploadResponse, RepositoryError>;
}

/// Upload an image, flattening failures into the uniform result.
///
/// The classified error stays recoverable for any layer above this wrapper;
/// the wrapper itself only logs it and substitutes the fixed message.
pub async fn upload_image(uploader: &dyn ImageUploader, request: UploadRequest) -> UploadResult {
    match uploader.upload(request).await {
        Ok(data) => UploadResult {
            success: true,
            data: Some(data),
            error: None,
        },
        Err(error) => {
            warn!(code = error.code(), "image upload failed: {error}");
            UploadResult {
                success: false,
                data: None,
                error: Some(UPLOAD_FAILED_MESSAGE.to_owned()),
            }
        }
    }
}

/// Fixture implementation echoing the request back.
///
/// Use it in tests where upload behaviour is not under test.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureImageUploader;

#[async_trait]
impl ImageUploader for FixtureImageUploader {
    async fn upload(&self, request: UploadRequest) -> Result<UploadResponse, RepositoryError> {
        Ok(UploadResponse {
            base64_image: request.base64_image,
        })
    }
}
