mod driver_service;
mod proximity_service;

pub use driver_service::DriverService;
pub use proximity_service::ProximityService;
