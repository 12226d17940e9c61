use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for a photo attached to a report
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct ReportPhoto {
    pub id: i64,
    pub report_id: i64,
    /// Generated object name, unique per report
    pub file_name: String,
    pub file_key: String,
    pub content_type: String,
    pub file_size: i64,
    pub url: String,
    pub created_at: DateTime<Utc>,
}
