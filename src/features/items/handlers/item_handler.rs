use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppPath};
use crate::features::items::dtos::{
    BulkCreateItemsDto, BulkCreateResultDto, ItemRequestDto, ItemResponseDto, ListItemsQuery,
};
use crate::features::items::services::ItemService;
use crate::shared::types::{ApiResponse, Meta};

/// Add an item to the catalog
#[utoipa::path(
    post,
    path = "/api/items",
    request_body = ItemRequestDto,
    responses(
        (status = 201, description = "Item created", body = ApiResponse<ItemResponseDto>),
        (status = 400, description = "Missing field or negative cost")
    ),
    tag = "items"
)]
pub async fn create_item(
    State(service): State<Arc<ItemService>>,
    AppJson(dto): AppJson<ItemRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<ItemResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let item = service.create(dto.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(item), None, None)),
    ))
}

/// Add many items at once
///
/// Entries with a missing field or a negative/non-numeric cost are skipped.
#[utoipa::path(
    post,
    path = "/api/items/bulk",
    request_body = BulkCreateItemsDto,
    responses(
        (status = 201, description = "Batch processed", body = ApiResponse<BulkCreateResultDto>),
        (status = 400, description = "Empty items array")
    ),
    tag = "items"
)]
pub async fn bulk_create_items(
    State(service): State<Arc<ItemService>>,
    AppJson(dto): AppJson<BulkCreateItemsDto>,
) -> Result<(StatusCode, Json<ApiResponse<BulkCreateResultDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let result = service.bulk_create(&dto.items).await?;
    let message = format!("{} inserted, {} skipped", result.inserted, result.skipped);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(result), Some(message), None)),
    ))
}

/// Get one item
#[utoipa::path(
    get,
    path = "/api/items/{id}",
    params(
        ("id" = i64, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item found", body = ApiResponse<ItemResponseDto>),
        (status = 404, description = "Item not found")
    ),
    tag = "items"
)]
pub async fn get_item(
    State(service): State<Arc<ItemService>>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<ItemResponseDto>>> {
    let item = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(item), None, None)))
}

/// Replace an item's category, description, unit and cost
#[utoipa::path(
    put,
    path = "/api/items/{id}",
    params(
        ("id" = i64, Path, description = "Item ID")
    ),
    request_body = ItemRequestDto,
    responses(
        (status = 200, description = "Item updated", body = ApiResponse<ItemResponseDto>),
        (status = 400, description = "Missing field or negative cost"),
        (status = 404, description = "Item not found")
    ),
    tag = "items"
)]
pub async fn update_item(
    State(service): State<Arc<ItemService>>,
    AppPath(id): AppPath<i64>,
    AppJson(dto): AppJson<ItemRequestDto>,
) -> Result<Json<ApiResponse<ItemResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let item = service.update(id, dto.into()).await?;
    Ok(Json(ApiResponse::success(
        Some(item),
        Some("Item updated".to_string()),
        None,
    )))
}

/// Remove an item from the catalog
///
/// Reports that already reference the item keep their snapshot.
#[utoipa::path(
    delete,
    path = "/api/items/{id}",
    params(
        ("id" = i64, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item deleted"),
        (status = 404, description = "Item not found")
    ),
    tag = "items"
)]
pub async fn delete_item(
    State(service): State<Arc<ItemService>>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Item deleted".to_string()),
        None,
    )))
}

/// Five most recently added items
#[utoipa::path(
    get,
    path = "/api/items",
    responses(
        (status = 200, description = "Recent items", body = ApiResponse<Vec<ItemResponseDto>>)
    ),
    tag = "items"
)]
pub async fn list_recent_items(
    State(service): State<Arc<ItemService>>,
) -> Result<Json<ApiResponse<Vec<ItemResponseDto>>>> {
    let items = service.list_recent().await?;
    Ok(Json(ApiResponse::success(Some(items), None, None)))
}

/// Full catalog, optionally filtered by category
#[utoipa::path(
    get,
    path = "/api/items/all",
    params(ListItemsQuery),
    responses(
        (status = 200, description = "Items in insertion order", body = ApiResponse<Vec<ItemResponseDto>>)
    ),
    tag = "items"
)]
pub async fn list_all_items(
    State(service): State<Arc<ItemService>>,
    Query(query): Query<ListItemsQuery>,
) -> Result<Json<ApiResponse<Vec<ItemResponseDto>>>> {
    let items = service.list_all(query.category()).await?;
    let total = items.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Distinct categories in order of first use
#[utoipa::path(
    get,
    path = "/api/items/categories",
    responses(
        (status = 200, description = "Category names", body = ApiResponse<Vec<String>>)
    ),
    tag = "items"
)]
pub async fn list_categories(
    State(service): State<Arc<ItemService>>,
) -> Result<Json<ApiResponse<Vec<String>>>> {
    let categories = service.list_categories().await?;
    Ok(Json(ApiResponse::success(Some(categories), None, None)))
}
