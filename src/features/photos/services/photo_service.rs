use std::sync::Arc;

use sqlx::PgPool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::photos::dtos::{
    extension_for, remaining_capacity, AttachPhotosResultDto, PhotoResponseDto, PhotoUpload,
};
use crate::features::photos::models::ReportPhoto;
use crate::modules::storage::ObjectStore;
use crate::shared::constants::MAX_PHOTOS_PER_REPORT;

const PHOTO_COLUMNS: &str =
    "id, report_id, file_name, file_key, content_type, file_size, url, created_at";

/// Service for report photo attachments
pub struct PhotoService {
    pool: PgPool,
    store: Arc<ObjectStore>,
}

impl PhotoService {
    pub fn new(pool: PgPool, store: Arc<ObjectStore>) -> Self {
        Self { pool, store }
    }

    async fn ensure_report_exists(&self, report_id: i64) -> Result<()> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM reports WHERE id = $1)")
            .bind(report_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if !exists {
            return Err(AppError::NotFound(format!("Report {} not found", report_id)));
        }
        Ok(())
    }

    async fn count(&self, report_id: i64) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM report_photos WHERE report_id = $1")
            .bind(report_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    /// Store as many `uploads` as still fit on the report; the rest are skipped
    pub async fn attach(
        &self,
        report_id: i64,
        uploads: Vec<PhotoUpload>,
    ) -> Result<AttachPhotosResultDto> {
        self.ensure_report_exists(report_id).await?;

        let current = self.count(report_id).await?;
        if current >= MAX_PHOTOS_PER_REPORT {
            return Err(AppError::Validation(format!(
                "Report {} already has the maximum of {} photos",
                report_id, MAX_PHOTOS_PER_REPORT
            )));
        }

        let take = remaining_capacity(current, uploads.len());
        let skipped = uploads.len() - take;
        let mut accepted = Vec::with_capacity(take);

        for upload in uploads.into_iter().take(take) {
            accepted.push(self.store_one(report_id, upload).await?);
        }

        info!(
            "Report {}: {} photo(s) attached, {} skipped",
            report_id,
            accepted.len(),
            skipped
        );

        Ok(AttachPhotosResultDto { accepted, skipped })
    }

    async fn store_one(&self, report_id: i64, upload: PhotoUpload) -> Result<PhotoResponseDto> {
        let file_name = format!("{}.{}", Uuid::new_v4(), extension_for(&upload.content_type));
        let file_key = self.store.report_photo_key(report_id, &file_name);
        let file_size = upload.data.len() as i64;

        self.store
            .upload(&file_key, &upload.data, &upload.content_type)
            .await?;
        let url = self.store.public_url(&file_key);

        let inserted: std::result::Result<ReportPhoto, sqlx::Error> = sqlx::query_as(&format!(
            r#"
            INSERT INTO report_photos (report_id, file_name, file_key, content_type, file_size, url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            PHOTO_COLUMNS
        ))
        .bind(report_id)
        .bind(&file_name)
        .bind(&file_key)
        .bind(&upload.content_type)
        .bind(file_size)
        .bind(&url)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(photo) => {
                debug!("Photo '{}' stored for report {}", file_name, report_id);
                Ok(photo.into())
            }
            Err(e) => {
                // Do not leave an unreferenced object behind
                if let Err(cleanup) = self.store.delete(&file_key).await {
                    warn!("Failed to remove orphaned object '{}': {}", file_key, cleanup);
                }
                tracing::error!("Failed to record photo for report {}: {:?}", report_id, e);
                Err(AppError::Database(e))
            }
        }
    }

    /// Photos of a report in upload order
    pub async fn list(&self, report_id: i64) -> Result<Vec<PhotoResponseDto>> {
        self.ensure_report_exists(report_id).await?;

        let photos: Vec<ReportPhoto> = sqlx::query_as(&format!(
            "SELECT {} FROM report_photos WHERE report_id = $1 ORDER BY created_at, id",
            PHOTO_COLUMNS
        ))
        .bind(report_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(photos.into_iter().map(PhotoResponseDto::from).collect())
    }

    /// Delete one photo's object and record
    pub async fn remove(&self, report_id: i64, file_name: &str) -> Result<()> {
        let file_key: Option<String> = sqlx::query_scalar(
            "SELECT file_key FROM report_photos WHERE report_id = $1 AND file_name = $2",
        )
        .bind(report_id)
        .bind(file_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let file_key = file_key.ok_or_else(|| {
            AppError::NotFound(format!(
                "Photo '{}' not found on report {}",
                file_name, report_id
            ))
        })?;

        self.store.delete(&file_key).await?;

        sqlx::query("DELETE FROM report_photos WHERE report_id = $1 AND file_name = $2")
            .bind(report_id)
            .bind(file_name)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        info!("Photo '{}' removed from report {}", file_name, report_id);
        Ok(())
    }

    /// Object keys of every photo on a report
    pub async fn file_keys(&self, report_id: i64) -> Result<Vec<String>> {
        sqlx::query_scalar("SELECT file_key FROM report_photos WHERE report_id = $1")
            .bind(report_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    /// Remove objects whose records are already gone. Failures are logged only.
    pub async fn purge_objects(&self, keys: &[String]) {
        for key in keys {
            if let Err(e) = self.store.delete(key).await {
                warn!("Failed to delete photo object '{}': {}", key, e);
            }
        }
    }
}
