use axum::{routing::get, Router};

use crate::features::reports::handlers::{self, ReportState};

/// Create routes for damage reports
pub fn routes(state: ReportState) -> Router {
    Router::new()
        .route(
            "/api/report",
            get(handlers::list_recent_reports).post(handlers::create_report),
        )
        .route("/api/report/all", get(handlers::list_all_reports))
        .route(
            "/api/report/{id}",
            get(handlers::get_report)
                .put(handlers::update_report)
                .delete(handlers::delete_report),
        )
        .route("/api/report/{id}/pdf", get(handlers::export_report_pdf))
        .with_state(state)
}
