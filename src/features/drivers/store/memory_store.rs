use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{page_offset, parse_driver_id, taxi_type_filter, DriverStore};
use crate::core::error::{AppError, Result};
use crate::features::drivers::models::{Driver, DriverRecord};

/// Process-local store. Keeps drivers in creation order.
#[derive(Default)]
pub struct InMemoryDriverStore {
    drivers: RwLock<Vec<Driver>>,
}

impl InMemoryDriverStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.drivers.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.drivers.read().await.is_empty()
    }
}

#[async_trait]
impl DriverStore for InMemoryDriverStore {
    async fn create(&self, record: DriverRecord) -> Result<Uuid> {
        let id = Uuid::now_v7();
        let driver = Driver::from_record(id, record, Utc::now());

        self.drivers.write().await.push(driver);
        Ok(id)
    }

    async fn update(&self, id: &str, record: DriverRecord) -> Result<()> {
        let id = parse_driver_id(id)?;

        let mut drivers = self.drivers.write().await;
        let driver = drivers
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Driver '{}' not found", id)))?;

        driver.apply_update(record, Utc::now());
        Ok(())
    }

    async fn list(&self, page: i64, page_size: i64) -> Result<Vec<Driver>> {
        let offset = usize::try_from(page_offset(page, page_size)).unwrap_or(usize::MAX);
        let limit = usize::try_from(page_size.max(0)).unwrap_or(usize::MAX);

        let mut drivers = self.drivers.read().await.clone();
        drivers.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(drivers.into_iter().skip(offset).take(limit).collect())
    }

    async fn search(&self, taxi_type: Option<&str>) -> Result<Vec<Driver>> {
        let filter = taxi_type_filter(taxi_type);
        let drivers = self.drivers.read().await;

        Ok(drivers
            .iter()
            .filter(|d| filter.map_or(true, |t| d.taxi_type == t))
            .cloned()
            .collect())
    }
}
