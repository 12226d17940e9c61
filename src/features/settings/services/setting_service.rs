use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::settings::dtos::SettingResponseDto;
use crate::features::settings::models::Setting;
use crate::shared::constants::{DEFAULT_ACCURACY_THRESHOLD, SETTING_ACCURACY_THRESHOLD};

/// Defaults inserted at startup when the key has never been set
const DEFAULT_SETTINGS: &[(&str, &str)] = &[(SETTING_ACCURACY_THRESHOLD, DEFAULT_ACCURACY_THRESHOLD)];

/// Key-value settings read by the client
pub struct SettingService {
    pool: PgPool,
}

impl SettingService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, key: &str) -> Result<SettingResponseDto> {
        let setting: Option<Setting> =
            sqlx::query_as("SELECT key, value, updated_at FROM settings WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .map_err(AppError::Database)?;

        Ok(SettingResponseDto {
            key: key.to_string(),
            value: setting.map(|s| s.value),
        })
    }

    /// Insert or replace the value stored under `key`
    pub async fn set(&self, key: &str, value: &str) -> Result<SettingResponseDto> {
        let setting: Setting = sqlx::query_as(
            r#"
            INSERT INTO settings (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            RETURNING key, value, updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to store setting '{}': {:?}", key, e);
            AppError::Database(e)
        })?;

        tracing::info!("Setting '{}' updated", key);
        Ok(SettingResponseDto {
            key: setting.key,
            value: Some(setting.value),
        })
    }

    /// Insert default values for keys that are not set yet
    pub async fn seed_defaults(&self) -> Result<()> {
        for &(key, value) in DEFAULT_SETTINGS {
            let result = sqlx::query(
                "INSERT INTO settings (key, value) VALUES ($1, $2) ON CONFLICT (key) DO NOTHING",
            )
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

            if result.rows_affected() > 0 {
                tracing::info!("Seeded default setting {}={}", key, value);
            }
        }
        Ok(())
    }
}
