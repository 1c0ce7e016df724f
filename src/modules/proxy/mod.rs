//! Reverse proxy to driver-service instances
//!
//! Round-robin target selection plus a buffering HTTP forwarder.

mod balancer;
mod reverse_proxy;

pub use balancer::RoundRobinBalancer;
pub use reverse_proxy::{ProxyError, ReverseProxy};
