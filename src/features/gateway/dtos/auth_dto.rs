use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Login form (`application/x-www-form-urlencoded`)
///
/// Missing fields count as empty and fail the credential check.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginRequestDto {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponseDto {
    /// HS256 JWT to send as `Authorization: Bearer <token>`
    pub token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: u64,
}
