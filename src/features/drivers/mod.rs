//! Driver registry feature.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/drivers` | Register a driver |
//! | GET | `/drivers?page=&pageSize=` | List drivers, newest first |
//! | GET | `/drivers/nearby?lat=&lon=&taxiType=` | Drivers within the radius, nearest first |
//! | PUT | `/drivers/{id}` | Update a driver |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use services::{DriverService, ProximityService};
pub use store::{DriverStore, InMemoryDriverStore, PgDriverStore};
