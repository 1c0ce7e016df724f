use std::sync::Arc;

use axum::{extract::State, Form, Json};

use crate::core::error::Result;
use crate::features::gateway::dtos::{LoginRequestDto, LoginResponseDto};
use crate::features::gateway::services::AuthService;
use crate::shared::types::ApiResponse;

/// Exchange gateway credentials for a bearer token
pub async fn login(
    State(service): State<Arc<AuthService>>,
    Form(dto): Form<LoginRequestDto>,
) -> Result<Json<ApiResponse<LoginResponseDto>>> {
    let response = service.login(dto)?;
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}
