use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::features::items::models::Item;
use crate::shared::validation::{
    lenient_decimal, lenient_text, non_negative, not_blank, storable_amount,
};

/// Create or update item request; an update overwrites every field
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ItemRequestDto {
    #[validate(custom(function = "not_blank", message = "category is required"))]
    #[schema(example = "road")]
    pub category: String,

    #[validate(custom(function = "not_blank", message = "description is required"))]
    #[schema(example = "asphalt patch")]
    pub description: String,

    #[validate(custom(function = "not_blank", message = "unit is required"))]
    #[schema(example = "m2")]
    pub unit: String,

    /// Unit cost; a number or a numeric string, below 10^10 with at most 4 decimals
    #[validate(custom(function = "valid_cost"))]
    #[schema(value_type = f64, example = 12.5)]
    pub cost: Decimal,
}

/// Batch create request. Entries are inspected one by one and malformed
/// entries are skipped rather than failing the batch.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BulkCreateItemsDto {
    #[validate(length(min = 1, message = "items must be a non-empty array"))]
    #[schema(value_type = Vec<Object>)]
    pub items: Vec<Value>,
}

/// Item fields that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub category: String,
    pub description: String,
    pub unit: String,
    pub cost: Decimal,
}

impl NewItem {
    /// Accept one entry of a bulk request, or `None` when a field is missing
    /// or the cost is not a non-negative number
    pub fn from_entry(entry: &Value) -> Option<Self> {
        let cost = entry.get("cost").and_then(lenient_decimal)?;
        valid_cost(&cost).ok()?;

        Some(Self {
            category: lenient_text(entry.get("category"))?,
            description: lenient_text(entry.get("description"))?,
            unit: lenient_text(entry.get("unit"))?,
            cost,
        })
    }
}

impl From<ItemRequestDto> for NewItem {
    fn from(dto: ItemRequestDto) -> Self {
        Self {
            category: dto.category.trim().to_string(),
            description: dto.description.trim().to_string(),
            unit: dto.unit.trim().to_string(),
            cost: dto.cost,
        }
    }
}

/// Non-negative and storable without rounding
fn valid_cost(cost: &Decimal) -> Result<(), ValidationError> {
    non_negative(cost)?;
    storable_amount(cost)
}

/// Query params for listing the full catalog
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListItemsQuery {
    /// Restrict the listing to one category
    pub category: Option<String>,
}

impl ListItemsQuery {
    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Response DTO for a catalog item
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemResponseDto {
    pub id: i64,
    pub category: String,
    pub description: String,
    pub unit: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    #[schema(value_type = f64)]
    pub cost: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Item> for ItemResponseDto {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            category: item.category,
            description: item.description,
            unit: item.unit,
            cost: item.cost,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

/// Outcome of a batch create
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BulkCreateResultDto {
    pub inserted: usize,
    pub skipped: usize,
    /// Ids of the inserted items, in request order
    pub ids: Vec<i64>,
}
