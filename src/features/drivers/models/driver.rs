use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Geographic position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

/// Database model for a registered driver
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Driver {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub plate: String,
    pub taxi_type: String,
    pub car_brand: String,
    pub car_model: String,
    #[sqlx(flatten)]
    pub location: Location,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied driver fields. Identity and timestamps belong to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverRecord {
    pub first_name: String,
    pub last_name: String,
    pub plate: String,
    pub taxi_type: String,
    pub car_brand: String,
    pub car_model: String,
    pub location: Location,
}

impl Driver {
    /// Materialize a record under a store-assigned id
    pub fn from_record(id: Uuid, record: DriverRecord, now: DateTime<Utc>) -> Self {
        Self {
            id,
            first_name: record.first_name,
            last_name: record.last_name,
            plate: record.plate,
            taxi_type: record.taxi_type,
            car_brand: record.car_brand,
            car_model: record.car_model,
            location: record.location,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the fields an update may touch. `id`, `created_at`,
    /// `car_brand` and `car_model` are left alone.
    pub fn apply_update(&mut self, record: DriverRecord, now: DateTime<Utc>) {
        self.first_name = record.first_name;
        self.last_name = record.last_name;
        self.plate = record.plate;
        self.taxi_type = record.taxi_type;
        self.location = record.location;
        self.updated_at = now.max(self.created_at);
    }
}

/// A driver annotated with its distance from a query point
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityResult {
    pub driver: Driver,
    pub distance_km: f64,
}
