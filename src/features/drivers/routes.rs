use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::drivers::handlers;
use crate::features::drivers::services::DriverService;

/// Create routes for the drivers feature
///
/// Note: no authentication here; the gateway guards these routes.
pub fn routes(service: Arc<DriverService>) -> Router {
    Router::new()
        .route(
            "/drivers",
            get(handlers::list_drivers).post(handlers::create_driver),
        )
        .route("/drivers/nearby", get(handlers::find_nearby))
        .route("/drivers/{id}", put(handlers::update_driver))
        .with_state(service)
}
