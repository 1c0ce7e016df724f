pub mod drivers;
pub mod gateway;
