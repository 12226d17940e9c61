use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::features::reports::models::{Report, ReportHeader, ReportLineItem, ReportSummary};
use crate::features::reports::services::line_aggregator::LineRequest;

/// Create/update report request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReportRequestDto {
    #[serde(default)]
    pub supervisor: Option<String>,
    #[serde(default)]
    pub police_report: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// "lat, lng" as captured by the client
    #[serde(default)]
    pub coordinates: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,

    /// Requested lines. Malformed entries are reported back and skipped.
    #[validate(length(min = 1, message = "items must be a non-empty array"))]
    #[schema(value_type = Vec<LineRequestDto>)]
    pub items: Vec<Value>,
}

impl ReportRequestDto {
    pub fn header(&self) -> ReportHeader {
        ReportHeader {
            supervisor: clean(&self.supervisor),
            police_report: clean(&self.police_report),
            street: clean(&self.street),
            state: clean(&self.state),
            location: clean(&self.location),
            coordinates: clean(&self.coordinates),
            notes: clean(&self.notes),
        }
    }

    pub fn line_requests(&self) -> Vec<LineRequest> {
        self.items.iter().map(LineRequest::from_entry).collect()
    }
}

fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// One requested line.
/// Note: documentation only; entries are parsed leniently from raw JSON.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct LineRequestDto {
    /// Catalog item id, a number or numeric string
    #[schema(rename = "itemId", value_type = i64, example = 1)]
    pub item_id: Value,
    /// Positive quantity, a number or numeric string
    #[schema(value_type = f64, example = 4)]
    pub quantity: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// `itemId` absent or not an integer
    MissingItemId,
    /// `itemId` does not exist in the catalog
    UnknownItem,
    /// `quantity` absent, not a number, or not positive
    InvalidQuantity,
}

/// What happened to one submitted entry, in input order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LineOutcome {
    pub index: usize,
    pub status: EntryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectReason>,
}

impl LineOutcome {
    pub fn accepted(index: usize) -> Self {
        Self {
            index,
            status: EntryStatus::Accepted,
            reason: None,
        }
    }

    pub fn rejected(index: usize, reason: RejectReason) -> Self {
        Self {
            index,
            status: EntryStatus::Rejected,
            reason: Some(reason),
        }
    }
}

/// Result of a create/update
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportSavedDto {
    pub id: i64,
    pub accepted: usize,
    pub rejected: usize,
    pub entries: Vec<LineOutcome>,
}

impl ReportSavedDto {
    pub fn new(id: i64, entries: Vec<LineOutcome>) -> Self {
        let accepted = entries
            .iter()
            .filter(|e| e.status == EntryStatus::Accepted)
            .count();
        Self {
            id,
            accepted,
            rejected: entries.len() - accepted,
            entries,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportLineDto {
    pub item_id: i64,
    pub description: String,
    pub unit: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    #[schema(value_type = f64)]
    pub cost: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    #[schema(value_type = f64)]
    pub quantity: Decimal,
    /// quantity × cost
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    #[schema(value_type = f64)]
    pub line_total: Decimal,
}

impl From<ReportLineItem> for ReportLineDto {
    fn from(line: ReportLineItem) -> Self {
        Self {
            item_id: line.item_id,
            description: line.snapshot.description().to_string(),
            unit: line.snapshot.unit().to_string(),
            cost: line.snapshot.cost(),
            quantity: line.quantity,
            line_total: line.line_total(),
        }
    }
}

/// Full report with priced lines and computed total
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportDetailDto {
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
    pub items: Vec<ReportLineDto>,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    #[schema(value_type = f64)]
    pub total: Decimal,
}

impl ReportDetailDto {
    pub fn new(report: Report, lines: Vec<ReportLineItem>) -> Self {
        let items: Vec<ReportLineDto> = lines.into_iter().map(ReportLineDto::from).collect();
        let total = items.iter().map(|line| line.line_total).sum();

        Self {
            id: report.id,
            supervisor: report.supervisor,
            police_report: report.police_report,
            street: report.street,
            state: report.state,
            location: report.location,
            coordinates: report.coordinates,
            notes: report.notes,
            created_at: report.created_at,
            updated_at: report.updated_at,
            items,
            total,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportSummaryDto {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    #[schema(value_type = f64)]
    pub total: Decimal,
}

impl From<ReportSummary> for ReportSummaryDto {
    fn from(summary: ReportSummary) -> Self {
        Self {
            id: summary.id,
            created_at: summary.created_at,
            total: summary.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_blank_fields_become_none() {
        let dto: ReportRequestDto = serde_json::from_value(json!({
            "supervisor": "  Eng. Salim ",
            "street": "",
            "items": [{"itemId": 1, "quantity": 4}]
        }))
        .unwrap();

        let header = dto.header();
        assert_eq!(header.supervisor.as_deref(), Some("Eng. Salim"));
        assert_eq!(header.street, None);
        assert_eq!(header.notes, None);
    }

    #[test]
    fn test_empty_items_fail_validation() {
        let dto: ReportRequestDto = serde_json::from_value(json!({"items": []})).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_saved_counts_outcomes() {
        let saved = ReportSavedDto::new(
            3,
            vec![
                LineOutcome::accepted(0),
                LineOutcome::rejected(1, RejectReason::UnknownItem),
                LineOutcome::accepted(2),
            ],
        );

        assert_eq!(saved.accepted, 2);
        assert_eq!(saved.rejected, 1);
    }

    #[test]
    fn test_outcome_serialization() {
        let accepted = serde_json::to_value(LineOutcome::accepted(0)).unwrap();
        let rejected =
            serde_json::to_value(LineOutcome::rejected(1, RejectReason::InvalidQuantity)).unwrap();

        assert_eq!(accepted, json!({"index": 0, "status": "accepted"}));
        assert_eq!(
            rejected,
            json!({"index": 1, "status": "rejected", "reason": "invalid_quantity"})
        );
    }
}
