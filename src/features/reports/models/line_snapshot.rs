use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::features::items::models::Item;

/// Pricing fields of a catalog item, frozen when a report line is written.
///
/// Only built from a live [`Item`] or read back from `report_items`, so later
/// edits to the catalog never reach an existing report.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct LineSnapshot {
    description: String,
    unit: String,
    cost: Decimal,
}

impl LineSnapshot {
    pub fn of(item: &Item) -> Self {
        Self {
            description: item.description.clone(),
            unit: item.unit.clone(),
            cost: item.cost,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn cost(&self) -> Decimal {
        self.cost
    }

    pub fn line_total(&self, quantity: Decimal) -> Decimal {
        self.cost * quantity
    }
}
