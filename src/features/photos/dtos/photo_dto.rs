use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::core::error::AppError;
use crate::features::photos::models::ReportPhoto;
use crate::shared::constants::{MAX_PHOTOS_PER_REPORT, MAX_PHOTO_SIZE};

/// Allowed MIME types for report photos
pub const ALLOWED_PHOTO_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Upload photos request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadPhotosDto {
    /// One or more images (repeat the field); at most 4 per report in total
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub images: Vec<String>,
}

/// An image read from the multipart body
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Response DTO for a stored photo
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PhotoResponseDto {
    pub file_name: String,
    /// Public URL of the image
    pub url: String,
    pub content_type: String,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
}

impl From<ReportPhoto> for PhotoResponseDto {
    fn from(photo: ReportPhoto) -> Self {
        Self {
            file_name: photo.file_name,
            url: photo.url,
            content_type: photo.content_type,
            file_size: photo.file_size,
            created_at: photo.created_at,
        }
    }
}

/// Outcome of an attach request
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AttachPhotosResultDto {
    pub accepted: Vec<PhotoResponseDto>,
    /// Files dropped because the report reached its photo limit
    pub skipped: usize,
}

/// Number of `incoming` photos that still fit next to `current` stored ones
pub fn remaining_capacity(current: i64, incoming: usize) -> usize {
    let free = (MAX_PHOTOS_PER_REPORT - current).max(0) as usize;
    free.min(incoming)
}

/// Check type and size of one uploaded image
pub fn validate_photo(content_type: &str, size: usize) -> Result<(), AppError> {
    if !ALLOWED_PHOTO_TYPES.contains(&content_type) {
        return Err(AppError::Validation(format!(
            "File type '{}' is not allowed. Allowed types: {}",
            content_type,
            ALLOWED_PHOTO_TYPES.join(", ")
        )));
    }
    if size > MAX_PHOTO_SIZE {
        return Err(AppError::Validation(format!(
            "Image too large. Maximum size is {} MB",
            MAX_PHOTO_SIZE / 1024 / 1024
        )));
    }
    if size == 0 {
        return Err(AppError::Validation("Image is empty".to_string()));
    }
    Ok(())
}

/// File extension for an allowed image type
pub fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "jpg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_capacity() {
        assert_eq!(remaining_capacity(0, 2), 2);
        assert_eq!(remaining_capacity(0, 6), 4);
        assert_eq!(remaining_capacity(3, 2), 1);
        assert_eq!(remaining_capacity(4, 1), 0);
        assert_eq!(remaining_capacity(5, 1), 0);
    }

    #[test]
    fn test_validate_photo_type() {
        assert!(validate_photo("image/jpeg", 1024).is_ok());
        assert!(validate_photo("image/webp", 1024).is_ok());
        assert!(matches!(
            validate_photo("application/pdf", 1024),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_photo_size() {
        assert!(validate_photo("image/png", MAX_PHOTO_SIZE).is_ok());
        assert!(validate_photo("image/png", MAX_PHOTO_SIZE + 1).is_err());
        assert!(validate_photo("image/png", 0).is_err());
    }

    #[test]
    fn test_extension_for() {
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("image/png"), "png");
        assert_eq!(extension_for("image/gif"), "gif");
    }
}
