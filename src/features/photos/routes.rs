use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get},
    Router,
};
use std::sync::Arc;

use crate::features::photos::handlers::{delete_photo, list_photos, upload_photos};
use crate::features::photos::services::PhotoService;
use crate::shared::constants::{MAX_PHOTOS_PER_REPORT, MAX_PHOTO_SIZE};

/// Room for a full set of photos plus multipart overhead
const PHOTO_BODY_LIMIT: usize = MAX_PHOTOS_PER_REPORT as usize * MAX_PHOTO_SIZE + 1024 * 1024;

/// Create routes for report photos
pub fn routes(service: Arc<PhotoService>) -> Router {
    Router::new()
        .route(
            "/api/report/{id}/photos",
            get(list_photos).post(upload_photos).layer(DefaultBodyLimit::max(PHOTO_BODY_LIMIT)),
        )
        .route("/api/report/{id}/photos/{name}", delete(delete_photo))
        .with_state(service)
}
