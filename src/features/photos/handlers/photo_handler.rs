use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppPath;
use crate::features::photos::dtos::{
    validate_photo, AttachPhotosResultDto, PhotoResponseDto, PhotoUpload, UploadPhotosDto,
};
use crate::features::photos::services::PhotoService;
use crate::shared::types::{ApiResponse, Meta};

/// Multipart field carrying the images
const IMAGES_FIELD: &str = "images";

/// Attach photos to a report
///
/// Accepts multipart/form-data with one or more `images` fields. A report
/// holds at most 4 photos; files beyond the remaining room are skipped.
#[utoipa::path(
    post,
    path = "/api/report/{id}/photos",
    tag = "photos",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    request_body(
        content = UploadPhotosDto,
        content_type = "multipart/form-data",
        description = "Images to attach (jpeg, png, webp or gif, up to 5 MB each)",
    ),
    responses(
        (status = 201, description = "Photos stored", body = ApiResponse<AttachPhotosResultDto>),
        (status = 400, description = "No images, invalid image, or report already full"),
        (status = 404, description = "Report not found"),
        (status = 413, description = "Request too large")
    )
)]
pub async fn upload_photos(
    State(service): State<Arc<PhotoService>>,
    AppPath(report_id): AppPath<i64>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<AttachPhotosResultDto>>)> {
    let mut uploads = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();
        if field_name != IMAGES_FIELD {
            debug!("Ignoring unknown field: {}", field_name);
            continue;
        }

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let data = field.bytes().await.map_err(|e| {
            debug!("Failed to read image bytes: {}", e);
            AppError::BadRequest(format!("Failed to read image data: {}", e))
        })?;

        validate_photo(&content_type, data.len())?;
        uploads.push(PhotoUpload {
            data: data.to_vec(),
            content_type,
        });
    }

    if uploads.is_empty() {
        return Err(AppError::Validation(format!(
            "At least one '{}' file is required",
            IMAGES_FIELD
        )));
    }

    let result = service.attach(report_id, uploads).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(result), None, None)),
    ))
}

/// List a report's photos in upload order
#[utoipa::path(
    get,
    path = "/api/report/{id}/photos",
    tag = "photos",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Photos of the report", body = ApiResponse<Vec<PhotoResponseDto>>),
        (status = 404, description = "Report not found")
    )
)]
pub async fn list_photos(
    State(service): State<Arc<PhotoService>>,
    AppPath(report_id): AppPath<i64>,
) -> Result<Json<ApiResponse<Vec<PhotoResponseDto>>>> {
    let photos = service.list(report_id).await?;
    let total = photos.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(photos),
        None,
        Some(Meta { total }),
    )))
}

/// Delete one photo of a report
#[utoipa::path(
    delete,
    path = "/api/report/{id}/photos/{name}",
    tag = "photos",
    params(
        ("id" = i64, Path, description = "Report ID"),
        ("name" = String, Path, description = "Photo file name")
    ),
    responses(
        (status = 200, description = "Photo deleted"),
        (status = 404, description = "Photo not found")
    )
)]
pub async fn delete_photo(
    State(service): State<Arc<PhotoService>>,
    AppPath((report_id, file_name)): AppPath<(i64, String)>,
) -> Result<Json<ApiResponse<()>>> {
    service.remove(report_id, &file_name).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Photo deleted".to_string()),
        None,
    )))
}
