pub mod geo;
pub mod types;
