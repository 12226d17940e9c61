use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for a client setting
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}
