use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppPath};
use crate::features::settings::dtos::{SetSettingDto, SettingResponseDto};
use crate::features::settings::services::SettingService;
use crate::shared::types::ApiResponse;

/// Read a setting
///
/// Unset keys answer 200 with `value: null`.
#[utoipa::path(
    get,
    path = "/api/settings/{key}",
    params(
        ("key" = String, Path, description = "Setting key, e.g. accuracyThreshold")
    ),
    responses(
        (status = 200, description = "Setting value (null when unset)", body = ApiResponse<SettingResponseDto>)
    ),
    tag = "settings"
)]
pub async fn get_setting(
    State(service): State<Arc<SettingService>>,
    AppPath(key): AppPath<String>,
) -> Result<Json<ApiResponse<SettingResponseDto>>> {
    let setting = service.get(&key).await?;
    Ok(Json(ApiResponse::success(Some(setting), None, None)))
}

/// Create or replace a setting
#[utoipa::path(
    post,
    path = "/api/settings/{key}",
    params(
        ("key" = String, Path, description = "Setting key")
    ),
    request_body = SetSettingDto,
    responses(
        (status = 200, description = "Setting stored", body = ApiResponse<SettingResponseDto>),
        (status = 400, description = "Missing value")
    ),
    tag = "settings"
)]
pub async fn set_setting(
    State(service): State<Arc<SettingService>>,
    AppPath(key): AppPath<String>,
    AppJson(dto): AppJson<SetSettingDto>,
) -> Result<Json<ApiResponse<SettingResponseDto>>> {
    let value = dto.stored_value()?;

    let setting = service.set(&key, &value).await?;
    Ok(Json(ApiResponse::success(
        Some(setting),
        Some("Setting saved".to_string()),
        None,
    )))
}
