use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::gateway::dtos::{LoginRequestDto, LoginResponseDto};
use crate::features::gateway::services::TokenService;

/// Display name carried in tokens issued to the configured admin
const ADMIN_DISPLAY_NAME: &str = "Taxi Admin";

/// Checks gateway credentials and hands out tokens
pub struct AuthService {
    username: String,
    password: String,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(username: String, password: String, tokens: Arc<TokenService>) -> Self {
        Self {
            username,
            password,
            tokens,
        }
    }

    pub fn login(&self, dto: LoginRequestDto) -> Result<LoginResponseDto> {
        if dto.username != self.username || dto.password != self.password {
            tracing::warn!("Rejected gateway login for '{}'", dto.username);
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        let issued = self.tokens.issue_token(ADMIN_DISPLAY_NAME, true)?;
        tracing::info!("Issued gateway token for '{}'", dto.username);

        Ok(LoginResponseDto {
            token: issued.token,
            token_type: "Bearer".to_string(),
            expires_in: issued.expires_in,
        })
    }
}
