use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use super::LineSnapshot;

/// Database model for a report header
#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub id: i64,
    pub supervisor: Option<String>,
    pub police_report: Option<String>,
    pub street: Option<String>,
    pub state: Option<String>,
    pub location: Option<String>,
    pub coordinates: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Incident metadata written on create and overwritten on update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportHeader {
    pub supervisor: Option<String>,
    pub police_report: Option<String>,
    pub street: Option<String>,
    pub state: Option<String>,
    pub location: Option<String>,
    pub coordinates: Option<String>,
    pub notes: Option<String>,
}

/// Database model for a priced report line
#[derive(Debug, Clone, FromRow)]
pub struct ReportLineItem {
    /// Catalog id at the time of writing; the item may no longer exist
    pub item_id: i64,
    #[sqlx(flatten)]
    pub snapshot: LineSnapshot,
    pub quantity: Decimal,
}

impl ReportLineItem {
    pub fn line_total(&self) -> Decimal {
        self.snapshot.line_total(self.quantity)
    }
}

/// One row of a report listing; `total` is aggregated on read
#[derive(Debug, Clone, FromRow)]
pub struct ReportSummary {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub total: Decimal,
}
