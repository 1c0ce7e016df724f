use std::sync::Arc;

use crate::core::error::Result;
use crate::features::drivers::models::ProximityResult;
use crate::features::drivers::store::DriverStore;
use crate::shared::geo::haversine_km;

/// Radius-bounded, distance-sorted driver search.
///
/// Scans every candidate the store returns for the taxi type and keeps the
/// ones within `radius_km` of the query point, nearest first.
pub struct ProximityService {
    store: Arc<dyn DriverStore>,
    radius_km: f64,
}

impl ProximityService {
    pub fn new(store: Arc<dyn DriverStore>, radius_km: f64) -> Self {
        Self { store, radius_km }
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    pub async fn find_nearby(
        &self,
        lat: f64,
        lon: f64,
        taxi_type: Option<&str>,
    ) -> Result<Vec<ProximityResult>> {
        let candidates = self.store.search(taxi_type).await?;
        let scanned = candidates.len();

        let mut results: Vec<ProximityResult> = candidates
            .into_iter()
            .filter_map(|driver| {
                let distance_km =
                    haversine_km(lat, lon, driver.location.lat, driver.location.lon);
                (distance_km <= self.radius_km).then_some(ProximityResult {
                    driver,
                    distance_km,
                })
            })
            .collect();

        // Stable: equal distances keep scan order
        results.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

        tracing::debug!(
            "Nearby search at ({}, {}) radius={}km: {} of {} candidates matched",
            lat,
            lon,
            self.radius_km,
            results.len(),
            scanned
        );

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::drivers::models::{DriverRecord, Location};
    use crate::features::drivers::store::InMemoryDriverStore;

    // ~1km per 0.009 degrees of latitude
    const KM_IN_LAT_DEGREES: f64 = 1.0 / 111.195;

    fn record(name: &str, taxi_type: &str, lat: f64, lon: f64) -> DriverRecord {
        DriverRecord {
            first_name: name.to_string(),
            last_name: "Test".to_string(),
            plate: format!("PLATE-{}", name),
            taxi_type: taxi_type.to_string(),
            car_brand: String::new(),
            car_model: String::new(),
            location: Location { lat, lon },
        }
    }

    async fn engine_with(records: Vec<DriverRecord>) -> ProximityService {
        let store = Arc::new(InMemoryDriverStore::new());
        for r in records {
            store.create(r).await.unwrap();
        }
        ProximityService::new(store, 6.0)
    }

    #[tokio::test]
    async fn test_empty_store_yields_empty_results() {
        let engine = engine_with(vec![]).await;
        let results = engine.find_nearby(40.0, 29.0, None).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_results_sorted_and_within_radius() {
        let engine = engine_with(vec![
            record("far", "yellow", 40.0 + 10.0 * KM_IN_LAT_DEGREES, 29.0),
            record("mid", "yellow", 40.0 + 3.0 * KM_IN_LAT_DEGREES, 29.0),
            record("near", "yellow", 40.0 + 0.5 * KM_IN_LAT_DEGREES, 29.0),
            record("edge", "yellow", 40.0 + 5.9 * KM_IN_LAT_DEGREES, 29.0),
        ])
        .await;

        let results = engine.find_nearby(40.0, 29.0, None).await.unwrap();
        let names: Vec<&str> = results
            .iter()
            .map(|r| r.driver.first_name.as_str())
            .collect();

        assert_eq!(names, vec!["near", "mid", "edge"]);
        assert!(results.iter().all(|r| r.distance_km <= 6.0));
        assert!(results
            .windows(2)
            .all(|w| w[0].distance_km <= w[1].distance_km));
    }

    #[tokio::test]
    async fn test_ties_keep_scan_order() {
        let engine = engine_with(vec![
            record("first", "yellow", 40.01, 29.0),
            record("second", "yellow", 40.01, 29.0),
            record("closest", "yellow", 40.0, 29.0),
            record("third", "yellow", 40.01, 29.0),
        ])
        .await;

        let results = engine.find_nearby(40.0, 29.0, None).await.unwrap();
        let names: Vec<&str> = results
            .iter()
            .map(|r| r.driver.first_name.as_str())
            .collect();

        assert_eq!(names, vec!["closest", "first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_taxi_type_filter_applies() {
        let engine = engine_with(vec![
            record("y", "yellow", 40.0, 29.0),
            record("b", "black", 40.0, 29.0),
        ])
        .await;

        let black = engine.find_nearby(40.0, 29.0, Some("black")).await.unwrap();
        assert_eq!(black.len(), 1);
        assert_eq!(black[0].driver.taxi_type, "black");

        let all = engine.find_nearby(40.0, 29.0, Some("")).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_radius_boundary_is_inclusive() {
        let (lat, lon) = (40.0 + 4.2 * KM_IN_LAT_DEGREES, 29.03);
        let d = haversine_km(40.0, 29.0, lat, lon);

        let store = Arc::new(InMemoryDriverStore::new());
        store
            .create(record("boundary", "yellow", lat, lon))
            .await
            .unwrap();

        let exact = ProximityService::new(store.clone(), d);
        let results = exact.find_nearby(40.0, 29.0, None).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].distance_km, d);

        let just_short = ProximityService::new(store, d - 1e-9);
        assert!(just_short
            .find_nearby(40.0, 29.0, None)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_custom_radius() {
        let store = Arc::new(InMemoryDriverStore::new());
        store
            .create(record("ten", "yellow", 40.0 + 10.0 * KM_IN_LAT_DEGREES, 29.0))
            .await
            .unwrap();

        let narrow = ProximityService::new(store.clone(), 6.0);
        let wide = ProximityService::new(store, 12.0);

        assert!(narrow.find_nearby(40.0, 29.0, None).await.unwrap().is_empty());
        assert_eq!(wide.find_nearby(40.0, 29.0, None).await.unwrap().len(), 1);
        assert_eq!(wide.radius_km(), 12.0);
    }
}
