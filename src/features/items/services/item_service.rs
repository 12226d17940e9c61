use serde_json::Value;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::items::dtos::{BulkCreateResultDto, ItemResponseDto, NewItem};
use crate::features::items::models::Item;
use crate::shared::constants::RECENT_LIMIT;

const ITEM_COLUMNS: &str = "id, category, description, unit, cost, created_at, updated_at";

/// Service for the item catalog
pub struct ItemService {
    pool: PgPool,
}

impl ItemService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, item: NewItem) -> Result<ItemResponseDto> {
        let created: Item = sqlx::query_as(&format!(
            r#"
            INSERT INTO items (category, description, unit, cost)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(&item.category)
        .bind(&item.description)
        .bind(&item.unit)
        .bind(item.cost)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create item: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Item {} created in category '{}'", created.id, created.category);
        Ok(created.into())
    }

    pub async fn get(&self, id: i64) -> Result<ItemResponseDto> {
        let item: Option<Item> =
            sqlx::query_as(&format!("SELECT {} FROM items WHERE id = $1", ITEM_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(AppError::Database)?;

        item.map(ItemResponseDto::from)
            .ok_or_else(|| item_not_found(id))
    }

    /// Overwrite all editable fields. Existing report snapshots are untouched.
    pub async fn update(&self, id: i64, item: NewItem) -> Result<ItemResponseDto> {
        let updated: Option<Item> = sqlx::query_as(&format!(
            r#"
            UPDATE items
            SET category = $2, description = $3, unit = $4, cost = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(id)
        .bind(&item.category)
        .bind(&item.description)
        .bind(&item.unit)
        .bind(item.cost)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update item {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        updated
            .map(ItemResponseDto::from)
            .ok_or_else(|| item_not_found(id))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete item {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(item_not_found(id));
        }

        tracing::info!("Item {} deleted", id);
        Ok(())
    }

    /// Most recently created items, newest first
    pub async fn list_recent(&self) -> Result<Vec<ItemResponseDto>> {
        let items: Vec<Item> = sqlx::query_as(&format!(
            "SELECT {} FROM items ORDER BY created_at DESC, id DESC LIMIT $1",
            ITEM_COLUMNS
        ))
        .bind(RECENT_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(items.into_iter().map(ItemResponseDto::from).collect())
    }

    /// Whole catalog in insertion order, optionally limited to one category
    pub async fn list_all(&self, category: Option<&str>) -> Result<Vec<ItemResponseDto>> {
        let items: Vec<Item> = match category {
            Some(category) => sqlx::query_as::<_, Item>(&format!(
                "SELECT {} FROM items WHERE category = $1 ORDER BY id",
                ITEM_COLUMNS
            ))
            .bind(category)
            .fetch_all(&self.pool)
            .await,
            None => {
                sqlx::query_as::<_, Item>(&format!("SELECT {} FROM items ORDER BY id", ITEM_COLUMNS))
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(|e| {
            tracing::error!("Failed to list items: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(items.into_iter().map(ItemResponseDto::from).collect())
    }

    /// Distinct categories in order of first appearance
    pub async fn list_categories(&self) -> Result<Vec<String>> {
        sqlx::query_scalar("SELECT category FROM items GROUP BY category ORDER BY MIN(id)")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list categories: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Insert every well-formed entry; malformed ones are counted as skipped
    pub async fn bulk_create(&self, entries: &[Value]) -> Result<BulkCreateResultDto> {
        let accepted: Vec<NewItem> = entries.iter().filter_map(NewItem::from_entry).collect();
        let skipped = entries.len() - accepted.len();

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let mut ids = Vec::with_capacity(accepted.len());

        for item in &accepted {
            let id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO items (category, description, unit, cost)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
            )
            .bind(&item.category)
            .bind(&item.description)
            .bind(&item.unit)
            .bind(item.cost)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert bulk item: {:?}", e);
                AppError::Database(e)
            })?;
            ids.push(id);
        }

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!(
            "Bulk item import: inserted={}, skipped={}",
            ids.len(),
            skipped
        );

        Ok(BulkCreateResultDto {
            inserted: ids.len(),
            skipped,
            ids,
        })
    }
}

fn item_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Item {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn new_item(category: &str, description: &str, cost: Decimal) -> NewItem {
        NewItem {
            category: category.to_string(),
            description: description.to_string(),
            unit: "m2".to_string(),
            cost,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_created_item_is_listed_once(pool: PgPool) {
        let service = ItemService::new(pool);

        let created = service
            .create(new_item("road", "asphalt patch", Decimal::new(125, 1)))
            .await
            .unwrap();
        let all = service.list_all(None).await.unwrap();

        let matching: Vec<_> = all.iter().filter(|i| i.id == created.id).collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].description, "asphalt patch");
        assert_eq!(matching[0].cost, Decimal::new(125, 1));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_categories_keep_first_insertion_order(pool: PgPool) {
        let service = ItemService::new(pool);

        service.create(new_item("B", "first", Decimal::ONE)).await.unwrap();
        service.create(new_item("A", "second", Decimal::ONE)).await.unwrap();
        service.create(new_item("B", "third", Decimal::ONE)).await.unwrap();

        assert_eq!(service.list_categories().await.unwrap(), vec!["B", "A"]);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_category_filter_and_order(pool: PgPool) {
        let service = ItemService::new(pool);

        let first = service.create(new_item("road", "kerb", Decimal::ONE)).await.unwrap();
        service.create(new_item("light", "pole", Decimal::TEN)).await.unwrap();
        let third = service.create(new_item("road", "sign", Decimal::TWO)).await.unwrap();

        let ids: Vec<i64> = service
            .list_all(Some("road"))
            .await
            .unwrap()
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec![first.id, third.id]);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_update_and_delete_unknown_item(pool: PgPool) {
        let service = ItemService::new(pool);

        let update = service.update(9999, new_item("road", "kerb", Decimal::ONE)).await;
        assert!(matches!(update, Err(AppError::NotFound(_))));
        assert!(matches!(service.delete(9999).await, Err(AppError::NotFound(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_bulk_create_skips_malformed_entries(pool: PgPool) {
        let service = ItemService::new(pool);
        let entries = vec![
            serde_json::json!({"category": "road", "description": "kerb", "unit": "m", "cost": 3}),
            serde_json::json!({"category": "road", "unit": "m", "cost": 3}),
            serde_json::json!({"category": "road", "description": "sign", "unit": "pc", "cost": "4.5"}),
        ];

        let result = service.bulk_create(&entries).await.unwrap();

        assert_eq!(result.inserted, 2);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.ids.len(), 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_bulk_create_skips_costs_the_column_cannot_hold(pool: PgPool) {
        let service = ItemService::new(pool);
        let entries = vec![
            serde_json::json!({"category": "road", "description": "bridge", "unit": "pc", "cost": 10000000000_i64}),
            serde_json::json!({"category": "road", "description": "kerb", "unit": "m", "cost": "1.23456"}),
            serde_json::json!({"category": "road", "description": "sign", "unit": "pc", "cost": "4.5"}),
        ];

        let result = service.bulk_create(&entries).await.unwrap();

        assert_eq!(result.inserted, 1);
        assert_eq!(result.skipped, 2);
        let stored = service.get(result.ids[0]).await.unwrap();
        assert_eq!(stored.cost, Decimal::new(45, 1));
    }
}
