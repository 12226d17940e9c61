use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppPath};
use crate::features::photos::PhotoService;
use crate::features::reports::dtos::{
    ReportDetailDto, ReportRequestDto, ReportSavedDto, ReportSummaryDto,
};
use crate::features::reports::services::ReportService;
use crate::modules::pdf::ReportPdfRenderer;
use crate::shared::types::{ApiResponse, Meta};

/// State for report routes that also touch photos or the PDF renderer
#[derive(Clone, FromRef)]
pub struct ReportState {
    pub report_service: Arc<ReportService>,
    pub photo_service: Arc<PhotoService>,
    pub pdf_renderer: Arc<ReportPdfRenderer>,
}

/// Create a report
///
/// Every entry of `items` gets an outcome. Entries with a missing or unknown
/// `itemId`, or a quantity that is not a positive number, are rejected and
/// not stored; the rest are priced from the catalog at this moment.
#[utoipa::path(
    post,
    path = "/api/report",
    request_body = ReportRequestDto,
    responses(
        (status = 201, description = "Report created", body = ApiResponse<ReportSavedDto>),
        (status = 400, description = "Malformed body or empty items array")
    ),
    tag = "reports"
)]
pub async fn create_report(
    State(service): State<Arc<ReportService>>,
    AppJson(dto): AppJson<ReportRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportSavedDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let saved = service.create(dto.header(), dto.line_requests()).await?;
    let message = format!("{} accepted, {} rejected", saved.accepted, saved.rejected);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(saved), Some(message), None)),
    ))
}

/// Replace a report's header and lines
///
/// Lines are re-priced from the current catalog.
#[utoipa::path(
    put,
    path = "/api/report/{id}",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    request_body = ReportRequestDto,
    responses(
        (status = 200, description = "Report updated", body = ApiResponse<ReportSavedDto>),
        (status = 400, description = "Malformed body or empty items array"),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn update_report(
    State(service): State<Arc<ReportService>>,
    AppPath(id): AppPath<i64>,
    AppJson(dto): AppJson<ReportRequestDto>,
) -> Result<Json<ApiResponse<ReportSavedDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let saved = service.update(id, dto.header(), dto.line_requests()).await?;
    let message = format!("{} accepted, {} rejected", saved.accepted, saved.rejected);
    Ok(Json(ApiResponse::success(Some(saved), Some(message), None)))
}

/// Get a report with its lines and total
#[utoipa::path(
    get,
    path = "/api/report/{id}",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportDetailDto>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn get_report(
    State(service): State<Arc<ReportService>>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<ReportDetailDto>>> {
    let report = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// Most recent reports with their totals
#[utoipa::path(
    get,
    path = "/api/report",
    responses(
        (status = 200, description = "Recent reports", body = ApiResponse<Vec<ReportSummaryDto>>)
    ),
    tag = "reports"
)]
pub async fn list_recent_reports(
    State(service): State<Arc<ReportService>>,
) -> Result<Json<ApiResponse<Vec<ReportSummaryDto>>>> {
    let reports = service.list_recent().await?;
    Ok(Json(ApiResponse::success(Some(reports), None, None)))
}

/// Every report with its total, newest first
#[utoipa::path(
    get,
    path = "/api/report/all",
    responses(
        (status = 200, description = "All reports", body = ApiResponse<Vec<ReportSummaryDto>>)
    ),
    tag = "reports"
)]
pub async fn list_all_reports(
    State(service): State<Arc<ReportService>>,
) -> Result<Json<ApiResponse<Vec<ReportSummaryDto>>>> {
    let reports = service.list_all().await?;
    let total = reports.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(reports),
        None,
        Some(Meta { total }),
    )))
}

/// Delete a report together with its lines and photos
#[utoipa::path(
    delete,
    path = "/api/report/{id}",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report deleted"),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn delete_report(
    State(state): State<ReportState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<()>>> {
    // Keys must be read before the cascade removes the photo rows
    let photo_keys = state.photo_service.file_keys(id).await?;
    state.report_service.delete(id).await?;
    state.photo_service.purge_objects(&photo_keys).await;

    Ok(Json(ApiResponse::success(
        None,
        Some("Report deleted".to_string()),
        None,
    )))
}

/// Download a report as PDF
#[utoipa::path(
    get,
    path = "/api/report/{id}/pdf",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf", body = Vec<u8>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn export_report_pdf(
    State(state): State<ReportState>,
    AppPath(id): AppPath<i64>,
) -> Result<Response> {
    let document = state.report_service.document(id).await?;
    let renderer = state.pdf_renderer.clone();

    let bytes = tokio::task::spawn_blocking(move || renderer.render(&document))
        .await
        .map_err(|e| AppError::Internal(format!("PDF rendering task failed: {}", e)))??;

    tracing::info!("Report {} exported as PDF ({} bytes)", id, bytes.len());

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"report-{}.pdf\"", id),
            ),
        ],
        bytes,
    )
        .into_response())
}
