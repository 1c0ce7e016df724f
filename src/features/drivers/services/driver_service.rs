use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::core::config::RegistryConfig;
use crate::core::error::{AppError, Result};
use crate::features::drivers::dtos::{
    DriverRequestDto, DriverResponseDto, NearbyDriverDto, NearbyDriversQuery,
};
use crate::features::drivers::services::ProximityService;
use crate::features::drivers::store::DriverStore;
use crate::shared::geo::is_valid_coordinate;

/// Service for the driver registry: create, update, list and nearby search
pub struct DriverService {
    store: Arc<dyn DriverStore>,
    proximity: ProximityService,
    default_page_size: i64,
}

impl DriverService {
    pub fn new(store: Arc<dyn DriverStore>, config: &RegistryConfig) -> Self {
        Self {
            proximity: ProximityService::new(Arc::clone(&store), config.nearby_radius_km),
            store,
            default_page_size: config.default_page_size,
        }
    }

    /// Register a new driver and return its id
    pub async fn create_driver(&self, dto: DriverRequestDto) -> Result<Uuid> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let id = self.store.create(dto.into()).await?;
        tracing::info!("Created driver {}", id);

        Ok(id)
    }

    /// Overwrite an existing driver's mutable fields
    pub async fn update_driver(&self, id: &str, dto: DriverRequestDto) -> Result<()> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.store.update(id, dto.into()).await?;
        tracing::info!("Updated driver {}", id);

        Ok(())
    }

    /// Resolve the page actually served: page < 1 becomes 1, page_size < 1
    /// becomes the configured default. No upper bound.
    pub fn effective_page(&self, page: i64, page_size: i64) -> (i64, i64) {
        let page = if page < 1 { 1 } else { page };
        let page_size = if page_size < 1 {
            self.default_page_size
        } else {
            page_size
        };
        (page, page_size)
    }

    /// One page of drivers, newest first
    pub async fn list_drivers(&self, page: i64, page_size: i64) -> Result<Vec<DriverResponseDto>> {
        let (page, page_size) = self.effective_page(page, page_size);

        let drivers = self.store.list(page, page_size).await?;
        Ok(drivers.into_iter().map(Into::into).collect())
    }

    /// Drivers within the configured radius of `(lat, lon)`, nearest first
    pub async fn find_nearby(&self, query: &NearbyDriversQuery) -> Result<Vec<NearbyDriverDto>> {
        let lat = parse_coordinate("lat", query.lat.as_deref())?;
        let lon = parse_coordinate("lon", query.lon.as_deref())?;

        if !is_valid_coordinate(lat, lon) {
            return Err(AppError::Validation(format!(
                "Coordinates out of range: lat={}, lon={}",
                lat, lon
            )));
        }

        let results = self
            .proximity
            .find_nearby(lat, lon, query.taxi_type.as_deref())
            .await?;

        Ok(results.into_iter().map(Into::into).collect())
    }
}

fn parse_coordinate(name: &str, raw: Option<&str>) -> Result<f64> {
    let raw = raw
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation(format!("Missing {} parameter", name)))?;

    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::Validation(format!("Invalid {}: '{}'", name, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::drivers::dtos::LocationDto;
    use crate::features::drivers::store::InMemoryDriverStore;
    use fake::faker::name::en::{FirstName, LastName};
    use fake::Fake;
    use std::time::Duration;

    fn service() -> DriverService {
        DriverService::new(
            Arc::new(InMemoryDriverStore::new()),
            &RegistryConfig::default(),
        )
    }

    fn driver_at(lat: f64, lon: f64) -> DriverRequestDto {
        DriverRequestDto {
            first_name: FirstName().fake(),
            last_name: LastName().fake(),
            plate: "34 TX 100".to_string(),
            taxi_type: "yellow".to_string(),
            car_brand: "Hyundai".to_string(),
            car_model: "i20".to_string(),
            location: LocationDto { lat, lon },
        }
    }

    fn nearby(lat: &str, lon: &str, taxi_type: Option<&str>) -> NearbyDriversQuery {
        NearbyDriversQuery {
            lat: Some(lat.to_string()),
            lon: Some(lon.to_string()),
            taxi_type: taxi_type.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate("lat", Some("40.5")).unwrap(), 40.5);
        assert!(matches!(
            parse_coordinate("lat", Some(" 40.5")),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            parse_coordinate("lat", None),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            parse_coordinate("lat", Some("")),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            parse_coordinate("lon", Some("east")),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            parse_coordinate("lon", Some("NaN")),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            parse_coordinate("lon", Some("inf")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_effective_page_defaults() {
        let service = service();
        assert_eq!(service.effective_page(0, 0), (1, 20));
        assert_eq!(service.effective_page(-3, -1), (1, 20));
        assert_eq!(service.effective_page(4, 500), (4, 500));
    }

    #[tokio::test]
    async fn test_list_zero_equals_first_page_of_twenty() {
        let service = service();
        for _ in 0..25 {
            service.create_driver(driver_at(40.0, 29.0)).await.unwrap();
        }

        let defaulted = service.list_drivers(0, 0).await.unwrap();
        let explicit = service.list_drivers(1, 20).await.unwrap();

        assert_eq!(defaulted.len(), 20);
        let defaulted_ids: Vec<Uuid> = defaulted.iter().map(|d| d.id).collect();
        let explicit_ids: Vec<Uuid> = explicit.iter().map(|d| d.id).collect();
        assert_eq!(defaulted_ids, explicit_ids);
    }

    #[tokio::test]
    async fn test_create_update_list_round_trip() {
        let service = service();
        let id = service.create_driver(driver_at(40.0, 29.0)).await.unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;

        let mut changed = driver_at(40.2, 29.1);
        changed.first_name = "Mehmet".to_string();
        changed.plate = "34 NEW 1".to_string();
        changed.taxi_type = "black".to_string();
        service
            .update_driver(&id.to_string(), changed.clone())
            .await
            .unwrap();

        let listed = service.list_drivers(1, 20).await.unwrap();
        let driver = listed.iter().find(|d| d.id == id).expect("driver listed");

        assert_eq!(driver.first_name, changed.first_name);
        assert_eq!(driver.last_name, changed.last_name);
        assert_eq!(driver.plate, changed.plate);
        assert_eq!(driver.taxi_type, changed.taxi_type);
        assert_eq!(driver.location, changed.location);
        assert!(driver.updated_at > driver.created_at);
    }

    #[tokio::test]
    async fn test_update_with_malformed_id_is_invalid_identifier() {
        let service = service();
        service.create_driver(driver_at(40.0, 29.0)).await.unwrap();

        let err = service
            .update_driver("zzz", driver_at(40.0, 29.0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidIdentifier(_)));
    }

    #[tokio::test]
    async fn test_update_with_unknown_id_is_not_found() {
        let service = service();
        let err = service
            .update_driver(&Uuid::now_v7().to_string(), driver_at(40.0, 29.0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_out_of_range_coordinates_rejected() {
        let service = service();

        let err = service.create_driver(driver_at(95.0, 29.0)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = service
            .find_nearby(&nearby("40.0", "200.0", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_find_nearby_requires_lat_and_lon() {
        let service = service();
        let query = NearbyDriversQuery {
            lat: Some("40.0".to_string()),
            lon: None,
            taxi_type: None,
        };

        let err = service.find_nearby(&query).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_driver_at_query_point_is_found_at_zero_distance() {
        let service = service();
        let id = service.create_driver(driver_at(40.0, 29.0)).await.unwrap();

        let results = service
            .find_nearby(&nearby("40.0", "29.0", Some("")))
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, id);
        assert!(results[0].distance_km.abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_driver_ten_km_away_is_excluded() {
        let service = service();
        // 10km north along the meridian
        service
            .create_driver(driver_at(40.0 + 10.0 / 111.195, 29.0))
            .await
            .unwrap();

        let results = service
            .find_nearby(&nearby("40.0", "29.0", None))
            .await
            .unwrap();

        assert!(results.is_empty());
    }
}
