use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{page_offset, parse_driver_id, taxi_type_filter, DriverStore};
use crate::core::error::{AppError, Result};
use crate::features::drivers::models::{Driver, DriverRecord};

const DRIVER_COLUMNS: &str = "id, first_name, last_name, plate, taxi_type, car_brand, car_model, \
                              lat, lon, created_at, updated_at";

/// Postgres-backed driver store
pub struct PgDriverStore {
    pool: PgPool,
}

impl PgDriverStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DriverStore for PgDriverStore {
    async fn create(&self, record: DriverRecord) -> Result<Uuid> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO drivers (id, first_name, last_name, plate, taxi_type, car_brand, car_model, lat, lon, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), NOW())
            RETURNING id
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&record.first_name)
        .bind(&record.last_name)
        .bind(&record.plate)
        .bind(&record.taxi_type)
        .bind(&record.car_brand)
        .bind(&record.car_model)
        .bind(record.location.lat)
        .bind(record.location.lon)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create driver: {:?}", e);
            AppError::Persistence(e)
        })?;

        Ok(id)
    }

    async fn update(&self, id: &str, record: DriverRecord) -> Result<()> {
        let id = parse_driver_id(id)?;

        // GREATEST keeps updated_at >= created_at even if the clock steps back
        let result = sqlx::query(
            r#"
            UPDATE drivers
            SET first_name = $2,
                last_name = $3,
                plate = $4,
                taxi_type = $5,
                lat = $6,
                lon = $7,
                updated_at = GREATEST(NOW(), created_at)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&record.first_name)
        .bind(&record.last_name)
        .bind(&record.plate)
        .bind(&record.taxi_type)
        .bind(record.location.lat)
        .bind(record.location.lon)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update driver {}: {:?}", id, e);
            AppError::Persistence(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Driver '{}' not found", id)));
        }

        Ok(())
    }

    async fn list(&self, page: i64, page_size: i64) -> Result<Vec<Driver>> {
        let query = format!(
            "SELECT {} FROM drivers ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
            DRIVER_COLUMNS
        );

        sqlx::query_as::<_, Driver>(&query)
            .bind(page_size.max(0))
            .bind(page_offset(page, page_size))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list drivers: {:?}", e);
                AppError::Persistence(e)
            })
    }

    async fn search(&self, taxi_type: Option<&str>) -> Result<Vec<Driver>> {
        let query = format!(
            "SELECT {} FROM drivers WHERE ($1::TEXT IS NULL OR taxi_type = $1) \
             ORDER BY created_at, id",
            DRIVER_COLUMNS
        );

        sqlx::query_as::<_, Driver>(&query)
            .bind(taxi_type_filter(taxi_type))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to search drivers: {:?}", e);
                AppError::Persistence(e)
            })
    }
}
