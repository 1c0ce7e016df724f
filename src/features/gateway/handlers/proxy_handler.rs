use std::sync::Arc;

use axum::{extract::Request, extract::State, response::Response};

use crate::core::error::Result;
use crate::features::gateway::models::AuthenticatedUser;
use crate::modules::proxy::ReverseProxy;

/// Relay an authenticated request to a driver-service instance
pub async fn proxy_to_driver_service(
    State(proxy): State<Arc<ReverseProxy>>,
    user: AuthenticatedUser,
    req: Request,
) -> Result<Response> {
    Ok(proxy.forward(req, Some(&user.name)).await?)
}
