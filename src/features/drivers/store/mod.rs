//! Durable collection of driver records.
//!
//! The store owns identity and timestamps: it assigns ids on create and
//! stamps `created_at`/`updated_at`. Callers only ever hand it a
//! [`DriverRecord`].

mod memory_store;
mod pg_store;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::drivers::models::{Driver, DriverRecord};

pub use memory_store::InMemoryDriverStore;
pub use pg_store::PgDriverStore;

#[async_trait]
pub trait DriverStore: Send + Sync + 'static {
    /// Persist a new driver and return its assigned id
    async fn create(&self, record: DriverRecord) -> Result<Uuid>;

    /// Overwrite the mutable fields of driver `id` and refresh `updated_at`.
    ///
    /// Fails with `InvalidIdentifier` for a malformed id and `NotFound`
    /// when the update matched nothing.
    async fn update(&self, id: &str, record: DriverRecord) -> Result<()>;

    /// One page of drivers, newest first. `page` is 1-indexed.
    async fn list(&self, page: i64, page_size: i64) -> Result<Vec<Driver>>;

    /// Every driver of `taxi_type`, or all drivers when the filter is empty
    async fn search(&self, taxi_type: Option<&str>) -> Result<Vec<Driver>>;
}

/// Parse an id under the store's identifier scheme (UUID)
pub fn parse_driver_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id)
        .map_err(|_| AppError::InvalidIdentifier(format!("'{}' is not a valid driver id", id)))
}

/// Normalize an optional taxi type filter; only an empty string means
/// "no filter". Anything else is matched exactly.
pub fn taxi_type_filter(taxi_type: Option<&str>) -> Option<&str> {
    taxi_type.filter(|t| !t.is_empty())
}

/// Row offset for a 1-indexed page
pub fn page_offset(page: i64, page_size: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(page_size.max(0))
}
