use utoipa::{Modify, OpenApi};

use crate::features::items::{dtos as items_dtos, handlers as items_handlers};
use crate::features::photos::{dtos as photos_dtos, handlers as photos_handlers};
use crate::features::reports::{dtos as reports_dtos, handlers as reports_handlers};
use crate::features::settings::{dtos as settings_dtos, handlers as settings_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Items
        items_handlers::item_handler::create_item,
        items_handlers::item_handler::bulk_create_items,
        items_handlers::item_handler::get_item,
        items_handlers::item_handler::update_item,
        items_handlers::item_handler::delete_item,
        items_handlers::item_handler::list_recent_items,
        items_handlers::item_handler::list_all_items,
        items_handlers::item_handler::list_categories,
        // Settings
        settings_handlers::setting_handler::get_setting,
        settings_handlers::setting_handler::set_setting,
        // Reports
        reports_handlers::report_handler::create_report,
        reports_handlers::report_handler::update_report,
        reports_handlers::report_handler::get_report,
        reports_handlers::report_handler::list_recent_reports,
        reports_handlers::report_handler::list_all_reports,
        reports_handlers::report_handler::delete_report,
        reports_handlers::report_handler::export_report_pdf,
        // Photos
        photos_handlers::photo_handler::upload_photos,
        photos_handlers::photo_handler::list_photos,
        photos_handlers::photo_handler::delete_photo,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Items
            items_dtos::ItemRequestDto,
            items_dtos::BulkCreateItemsDto,
            items_dtos::ItemResponseDto,
            items_dtos::BulkCreateResultDto,
            ApiResponse<items_dtos::ItemResponseDto>,
            ApiResponse<Vec<items_dtos::ItemResponseDto>>,
            ApiResponse<items_dtos::BulkCreateResultDto>,
            ApiResponse<Vec<String>>,
            // Settings
            settings_dtos::SetSettingDto,
            settings_dtos::SettingResponseDto,
            ApiResponse<settings_dtos::SettingResponseDto>,
            // Reports
            reports_dtos::ReportRequestDto,
            reports_dtos::LineRequestDto,
            reports_dtos::EntryStatus,
            reports_dtos::RejectReason,
            reports_dtos::LineOutcome,
            reports_dtos::ReportSavedDto,
            reports_dtos::ReportLineDto,
            reports_dtos::ReportDetailDto,
            reports_dtos::ReportSummaryDto,
            ApiResponse<reports_dtos::ReportSavedDto>,
            ApiResponse<reports_dtos::ReportDetailDto>,
            ApiResponse<Vec<reports_dtos::ReportSummaryDto>>,
            // Photos
            photos_dtos::UploadPhotosDto,
            photos_dtos::PhotoResponseDto,
            photos_dtos::AttachPhotosResultDto,
            ApiResponse<photos_dtos::AttachPhotosResultDto>,
            ApiResponse<Vec<photos_dtos::PhotoResponseDto>>,
        )
    ),
    tags(
        (name = "items", description = "Cost catalog of repairable items"),
        (name = "settings", description = "Key/value application settings"),
        (name = "reports", description = "Damage reports priced from the catalog"),
        (name = "photos", description = "Photos attached to damage reports"),
    ),
    info(
        title = "Damage Ledger API",
        version = "0.1.0",
        description = "API documentation for Damage Ledger",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/items",
            "/api/items/bulk",
            "/api/items/all",
            "/api/items/categories",
            "/api/items/{id}",
            "/api/settings/{key}",
            "/api/report",
            "/api/report/all",
            "/api/report/{id}",
            "/api/report/{id}/pdf",
            "/api/report/{id}/photos",
            "/api/report/{id}/photos/{name}",
        ] {
            assert!(paths.contains_key(path), "missing path {}", path);
        }
    }

    #[test]
    fn test_swagger_info_modifier() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Ledger".to_string(),
            version: "9.9.9".to_string(),
            description: "staging".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Ledger");
        assert_eq!(doc.info.version, "9.9.9");
        assert_eq!(doc.info.description.as_deref(), Some("staging"));
    }
}
