use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Database model for a catalog item
#[derive(Debug, Clone, FromRow)]
pub struct Item {
    pub id: i64,
    pub category: String,
    pub description: String,
    pub unit: String,
    pub cost: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
