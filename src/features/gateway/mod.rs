//! Authenticating gateway in front of the driver service.
//!
//! `POST /login` trades the configured admin credentials for an HS256
//! token. Everything under `/drivers` needs that token and is forwarded
//! round-robin to the driver-service instances.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{AuthService, TokenService};
