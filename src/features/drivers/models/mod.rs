mod driver;

pub use driver::{Driver, DriverRecord, Location, ProximityResult};
