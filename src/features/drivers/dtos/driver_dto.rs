use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::drivers::models::{Driver, DriverRecord, Location, ProximityResult};

/// Coordinates in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct LocationDto {
    #[validate(range(min = -90.0, max = 90.0, message = "lat must be between -90 and 90"))]
    pub lat: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "lon must be between -180 and 180"))]
    pub lon: f64,
}

impl From<LocationDto> for Location {
    fn from(dto: LocationDto) -> Self {
        Self {
            lat: dto.lat,
            lon: dto.lon,
        }
    }
}

impl From<Location> for LocationDto {
    fn from(location: Location) -> Self {
        Self {
            lat: location.lat,
            lon: location.lon,
        }
    }
}

/// Request body for creating or updating a driver
///
/// Absent fields take their zero value (empty string, `(0, 0)`); only a
/// body that is not a JSON object of this shape is rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DriverRequestDto {
    pub first_name: String,
    pub last_name: String,
    pub plate: String,
    /// e.g. "yellow", "black"
    pub taxi_type: String,
    pub car_brand: String,
    pub car_model: String,
    #[validate(nested)]
    pub location: LocationDto,
}

impl From<DriverRequestDto> for DriverRecord {
    fn from(dto: DriverRequestDto) -> Self {
        Self {
            first_name: dto.first_name,
            last_name: dto.last_name,
            plate: dto.plate,
            taxi_type: dto.taxi_type,
            car_brand: dto.car_brand,
            car_model: dto.car_model,
            location: dto.location.into(),
        }
    }
}

/// Response DTO for a driver
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DriverResponseDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub plate: String,
    pub taxi_type: String,
    pub car_brand: String,
    pub car_model: String,
    pub location: LocationDto,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Driver> for DriverResponseDto {
    fn from(d: Driver) -> Self {
        Self {
            id: d.id,
            first_name: d.first_name,
            last_name: d.last_name,
            plate: d.plate,
            taxi_type: d.taxi_type,
            car_brand: d.car_brand,
            car_model: d.car_model,
            location: d.location.into(),
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

/// A nearby driver with its distance from the query point
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NearbyDriverDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub plate: String,
    pub taxi_type: String,
    pub location: LocationDto,
    pub distance_km: f64,
}

impl From<ProximityResult> for NearbyDriverDto {
    fn from(r: ProximityResult) -> Self {
        Self {
            id: r.driver.id,
            first_name: r.driver.first_name,
            last_name: r.driver.last_name,
            plate: r.driver.plate,
            taxi_type: r.driver.taxi_type,
            location: r.driver.location.into(),
            distance_km: r.distance_km,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateDriverResponseDto {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateDriverResponseDto {
    pub status: String,
}

impl UpdateDriverResponseDto {
    pub fn updated() -> Self {
        Self {
            status: "updated".to_string(),
        }
    }
}

/// Query params for listing drivers.
///
/// Values are kept raw: anything missing or non-numeric counts as 0 and is
/// then defaulted by the service.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListDriversQuery {
    /// Page number, 1-indexed (default: 1)
    #[param(value_type = Option<i64>)]
    pub page: Option<String>,
    /// Items per page (default: 20)
    #[param(value_type = Option<i64>)]
    pub page_size: Option<String>,
}

fn lenient_int(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.parse::<i64>().ok()).unwrap_or(0)
}

impl ListDriversQuery {
    pub fn page(&self) -> i64 {
        lenient_int(self.page.as_deref())
    }

    pub fn page_size(&self) -> i64 {
        lenient_int(self.page_size.as_deref())
    }
}

/// Query params for the nearby search
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct NearbyDriversQuery {
    /// Latitude of the query point (required)
    #[param(value_type = f64)]
    pub lat: Option<String>,
    /// Longitude of the query point (required)
    #[param(value_type = f64)]
    pub lon: Option<String>,
    /// Only drivers of this taxi type, e.g. "yellow"
    pub taxi_type: Option<String>,
}
