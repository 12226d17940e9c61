//! Resolution of requested report lines against the item catalog.
//!
//! Pure functions: the caller loads the referenced items, this module decides
//! which entries become lines and snapshots their pricing.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::features::items::models::Item;
use crate::features::reports::dtos::{LineOutcome, RejectReason};
use crate::features::reports::models::LineSnapshot;
use crate::shared::validation::{lenient_decimal, lenient_i64, storable_amount};

/// One submitted `{itemId, quantity}` entry after lenient parsing
#[derive(Debug, Clone, PartialEq)]
pub struct LineRequest {
    pub item_id: Option<i64>,
    pub quantity: Option<Decimal>,
}

impl LineRequest {
    pub fn from_entry(entry: &Value) -> Self {
        Self {
            item_id: entry.get("itemId").and_then(lenient_i64),
            quantity: entry.get("quantity").and_then(lenient_decimal),
        }
    }
}

/// An accepted entry, ready to be written as a report line
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedLine {
    pub item_id: i64,
    pub snapshot: LineSnapshot,
    pub quantity: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub lines: Vec<AcceptedLine>,
    pub outcomes: Vec<LineOutcome>,
}

/// Distinct item ids referenced by `requests`, for the catalog lookup
pub fn requested_item_ids(requests: &[LineRequest]) -> Vec<i64> {
    let mut ids: Vec<i64> = requests.iter().filter_map(|r| r.item_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Snapshot every entry that references a known item with a valid quantity.
///
/// The item reference is checked before the quantity, so an entry with both
/// problems is reported as an item problem.
pub fn aggregate(requests: &[LineRequest], catalog: &HashMap<i64, Item>) -> Aggregation {
    let mut aggregation = Aggregation::default();

    for (index, request) in requests.iter().enumerate() {
        match resolve(request, catalog) {
            Ok(line) => {
                aggregation.lines.push(line);
                aggregation.outcomes.push(LineOutcome::accepted(index));
            }
            Err(reason) => {
                aggregation
                    .outcomes
                    .push(LineOutcome::rejected(index, reason));
            }
        }
    }

    aggregation
}

fn resolve(
    request: &LineRequest,
    catalog: &HashMap<i64, Item>,
) -> Result<AcceptedLine, RejectReason> {
    let item_id = request.item_id.ok_or(RejectReason::MissingItemId)?;
    let item = catalog.get(&item_id).ok_or(RejectReason::UnknownItem)?;
    let quantity = request
        .quantity
        .filter(|q| *q > Decimal::ZERO && storable_amount(q).is_ok())
        .ok_or(RejectReason::InvalidQuantity)?;

    Ok(AcceptedLine {
        item_id,
        snapshot: LineSnapshot::of(item),
        quantity,
    })
}
