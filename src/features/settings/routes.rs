use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::settings::{handlers, services::SettingService};

/// Create routes for the settings store
pub fn routes(service: Arc<SettingService>) -> Router {
    Router::new()
        .route(
            "/api/settings/{key}",
            get(handlers::get_setting).post(handlers::set_setting),
        )
        .with_state(service)
}
