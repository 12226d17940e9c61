use std::collections::HashMap;

use sqlx::{PgConnection, PgPool};

use crate::core::error::{AppError, Result};
use crate::features::items::models::Item;
use crate::features::reports::dtos::{ReportDetailDto, ReportSavedDto, ReportSummaryDto};
use crate::features::reports::models::{Report, ReportHeader, ReportLineItem, ReportSummary};
use crate::features::reports::services::line_aggregator::{
    aggregate, requested_item_ids, AcceptedLine, LineRequest,
};
use crate::modules::pdf::{DocumentLine, ReportDocument};
use crate::shared::constants::RECENT_LIMIT;

const REPORT_COLUMNS: &str = "id, supervisor, police_report, street, state, location, coordinates, notes, created_at, updated_at";

/// Service for report aggregation and storage
pub struct ReportService {
    pool: PgPool,
}

impl ReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a report from catalog references. Header, snapshot reads and line
    /// inserts commit together.
    pub async fn create(
        &self,
        header: ReportHeader,
        requests: Vec<LineRequest>,
    ) -> Result<ReportSavedDto> {
        ensure_not_empty(&requests)?;

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO reports (supervisor, police_report, street, state, location, coordinates, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&header.supervisor)
        .bind(&header.police_report)
        .bind(&header.street)
        .bind(&header.state)
        .bind(&header.location)
        .bind(&header.coordinates)
        .bind(&header.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create report: {:?}", e);
            AppError::Database(e)
        })?;

        let saved = write_lines(&mut *tx, id, &requests).await?;
        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!(
            "Report {} created: accepted={}, rejected={}",
            id,
            saved.accepted,
            saved.rejected
        );
        Ok(saved)
    }

    /// Replace the header and every line of an existing report
    pub async fn update(
        &self,
        id: i64,
        header: ReportHeader,
        requests: Vec<LineRequest>,
    ) -> Result<ReportSavedDto> {
        ensure_not_empty(&requests)?;

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let result = sqlx::query(
            r#"
            UPDATE reports
            SET supervisor = $2, police_report = $3, street = $4, state = $5,
                location = $6, coordinates = $7, notes = $8, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&header.supervisor)
        .bind(&header.police_report)
        .bind(&header.street)
        .bind(&header.state)
        .bind(&header.location)
        .bind(&header.coordinates)
        .bind(&header.notes)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update report {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(report_not_found(id));
        }

        sqlx::query("DELETE FROM report_items WHERE report_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let saved = write_lines(&mut *tx, id, &requests).await?;
        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!(
            "Report {} updated: accepted={}, rejected={}",
            id,
            saved.accepted,
            saved.rejected
        );
        Ok(saved)
    }

    /// Header, priced lines and total computed from the stored snapshots
    pub async fn get(&self, id: i64) -> Result<ReportDetailDto> {
        let report: Option<Report> =
            sqlx::query_as(&format!("SELECT {} FROM reports WHERE id = $1", REPORT_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(AppError::Database)?;
        let report = report.ok_or_else(|| report_not_found(id))?;

        let lines: Vec<ReportLineItem> = sqlx::query_as(
            r#"
            SELECT item_id, description, unit, cost, quantity
            FROM report_items
            WHERE report_id = $1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load lines of report {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        Ok(ReportDetailDto::new(report, lines))
    }

    pub async fn list_recent(&self) -> Result<Vec<ReportSummaryDto>> {
        self.list(Some(RECENT_LIMIT)).await
    }

    pub async fn list_all(&self) -> Result<Vec<ReportSummaryDto>> {
        self.list(None).await
    }

    /// Newest first; reports without lines are listed with a zero total
    async fn list(&self, limit: Option<i64>) -> Result<Vec<ReportSummaryDto>> {
        // LIMIT NULL means no limit
        let summaries: Vec<ReportSummary> = sqlx::query_as(
            r#"
            SELECT r.id, r.created_at, COALESCE(SUM(ri.quantity * ri.cost), 0) AS total
            FROM reports r
            LEFT JOIN report_items ri ON ri.report_id = r.id
            GROUP BY r.id, r.created_at
            ORDER BY r.created_at DESC, r.id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list reports: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(summaries.into_iter().map(ReportSummaryDto::from).collect())
    }

    /// Delete a report; its lines and photo records go with it
    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete report {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(report_not_found(id));
        }

        tracing::info!("Report {} deleted", id);
        Ok(())
    }

    /// Printable form of a report
    pub async fn document(&self, id: i64) -> Result<ReportDocument> {
        let detail = self.get(id).await?;
        Ok(to_document(detail))
    }
}

fn ensure_not_empty(requests: &[LineRequest]) -> Result<()> {
    if requests.is_empty() {
        return Err(AppError::Validation(
            "items must be a non-empty array".to_string(),
        ));
    }
    Ok(())
}

/// Resolve `requests` against the catalog inside the open transaction and
/// insert the accepted lines
async fn write_lines(
    conn: &mut PgConnection,
    report_id: i64,
    requests: &[LineRequest],
) -> Result<ReportSavedDto> {
    let catalog = load_catalog(conn, &requested_item_ids(requests)).await?;
    let aggregation = aggregate(requests, &catalog);

    for line in &aggregation.lines {
        insert_line(conn, report_id, line).await?;
    }

    Ok(ReportSavedDto::new(report_id, aggregation.outcomes))
}

async fn load_catalog(conn: &mut PgConnection, ids: &[i64]) -> Result<HashMap<i64, Item>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let items: Vec<Item> = sqlx::query_as(
        r#"
        SELECT id, category, description, unit, cost, created_at, updated_at
        FROM items
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(&mut *conn)
    .await
    .map_err(AppError::Database)?;

    Ok(items.into_iter().map(|item| (item.id, item)).collect())
}

async fn insert_line(conn: &mut PgConnection, report_id: i64, line: &AcceptedLine) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO report_items (report_id, item_id, description, unit, cost, quantity)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(report_id)
    .bind(line.item_id)
    .bind(line.snapshot.description())
    .bind(line.snapshot.unit())
    .bind(line.snapshot.cost())
    .bind(line.quantity)
    .execute(&mut *conn)
    .await
    .map_err(|e| {
        tracing::error!("Failed to insert line for report {}: {:?}", report_id, e);
        AppError::Database(e)
    })?;
    Ok(())
}

fn to_document(detail: ReportDetailDto) -> ReportDocument {
    ReportDocument {
        id: detail.id,
        created_at: detail.created_at,
        supervisor: detail.supervisor.unwrap_or_default(),
        police_report: detail.police_report.unwrap_or_default(),
        street: detail.street.unwrap_or_default(),
        state: detail.state.unwrap_or_default(),
        location: detail.location.unwrap_or_default(),
        coordinates: detail.coordinates.unwrap_or_default(),
        notes: detail.notes.unwrap_or_default(),
        lines: detail
            .items
            .into_iter()
            .map(|line| DocumentLine {
                description: line.description,
                cost: line.cost,
                quantity: line.quantity,
                line_total: line.line_total,
            })
            .collect(),
        total: detail.total,
    }
}

fn report_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Report {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::items::dtos::NewItem;
    use crate::features::items::ItemService;
    use rust_decimal::Decimal;
    use serde_json::json;

    async fn seed_item(pool: &PgPool, cost: Decimal) -> i64 {
        ItemService::new(pool.clone())
            .create(NewItem {
                category: "road".to_string(),
                description: "asphalt patch".to_string(),
                unit: "m2".to_string(),
                cost,
            })
            .await
            .unwrap()
            .id
    }

    fn lines(entries: serde_json::Value) -> Vec<LineRequest> {
        entries
            .as_array()
            .unwrap()
            .iter()
            .map(LineRequest::from_entry)
            .collect()
    }

    #[test]
    fn test_document_uses_empty_text_for_missing_header_fields() {
        let now = chrono::Utc::now();
        let detail = ReportDetailDto::new(
            Report {
                id: 4,
                supervisor: Some("Eng. Salim".to_string()),
                police_report: None,
                street: None,
                state: None,
                location: None,
                coordinates: None,
                notes: None,
                created_at: now,
                updated_at: now,
            },
            vec![],
        );

        let doc = to_document(detail);
        assert_eq!(doc.supervisor, "Eng. Salim");
        assert_eq!(doc.street, "");
        assert!(doc.lines.is_empty());
        assert_eq!(doc.total, Decimal::ZERO);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_total_follows_quantity_and_update_replaces_lines(pool: PgPool) {
        let item_id = seed_item(&pool, Decimal::new(125, 1)).await;
        let service = ReportService::new(pool);

        let saved = service
            .create(
                ReportHeader::default(),
                lines(json!([{"itemId": item_id, "quantity": 4}])),
            )
            .await
            .unwrap();
        assert_eq!(service.get(saved.id).await.unwrap().total, Decimal::from(50));

        service
            .update(
                saved.id,
                ReportHeader::default(),
                lines(json!([{"itemId": item_id, "quantity": 2}])),
            )
            .await
            .unwrap();
        let detail = service.get(saved.id).await.unwrap();
        assert_eq!(detail.total, Decimal::from(25));
        assert_eq!(detail.items.len(), 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_get_reads_lines_back_in_entry_order(pool: PgPool) {
        let patch = seed_item(&pool, Decimal::new(125, 1)).await;
        let curb = seed_item(&pool, Decimal::from(3)).await;
        let service = ReportService::new(pool);

        let saved = service
            .create(
                ReportHeader::default(),
                lines(json!([
                    {"itemId": curb, "quantity": "1.5"},
                    {"itemId": patch, "quantity": 2}
                ])),
            )
            .await
            .unwrap();

        let items = service.get(saved.id).await.unwrap().items;
        let ids: Vec<i64> = items.iter().map(|l| l.item_id).collect();
        assert_eq!(ids, vec![curb, patch]);
        assert_eq!(items[0].description, "asphalt patch");
        assert_eq!(items[0].unit, "m2");
        assert_eq!(items[0].line_total, Decimal::new(45, 1));
        assert_eq!(items[1].cost, Decimal::new(125, 1));
        assert_eq!(items[1].line_total, Decimal::from(25));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_catalog_edits_do_not_reach_existing_reports(pool: PgPool) {
        let item_id = seed_item(&pool, Decimal::from(10)).await;
        let items = ItemService::new(pool.clone());
        let service = ReportService::new(pool);

        let saved = service
            .create(
                ReportHeader::default(),
                lines(json!([{"itemId": item_id, "quantity": 3}])),
            )
            .await
            .unwrap();

        items
            .update(
                item_id,
                NewItem {
                    category: "road".to_string(),
                    description: "renamed".to_string(),
                    unit: "m2".to_string(),
                    cost: Decimal::from(999),
                },
            )
            .await
            .unwrap();
        let detail = service.get(saved.id).await.unwrap();
        assert_eq!(detail.total, Decimal::from(30));
        assert_eq!(detail.items[0].description, "asphalt patch");

        items.delete(item_id).await.unwrap();
        let detail = service.get(saved.id).await.unwrap();
        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.total, Decimal::from(30));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_fully_rejected_report_is_listed_with_zero_total(pool: PgPool) {
        let service = ReportService::new(pool);

        let saved = service
            .create(
                ReportHeader::default(),
                lines(json!([{"itemId": 424242, "quantity": 1}])),
            )
            .await
            .unwrap();
        assert_eq!(saved.accepted, 0);
        assert_eq!(saved.rejected, 1);

        let listed = service.list_all().await.unwrap();
        let summary = listed.iter().find(|s| s.id == saved.id).unwrap();
        assert_eq!(summary.total, Decimal::ZERO);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_update_and_delete_unknown_report(pool: PgPool) {
        let service = ReportService::new(pool);

        let update = service
            .update(
                777,
                ReportHeader::default(),
                lines(json!([{"itemId": 1, "quantity": 1}])),
            )
            .await;
        assert!(matches!(update, Err(AppError::NotFound(_))));
        assert!(matches!(service.delete(777).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.get(777).await, Err(AppError::NotFound(_))));
    }
}
