use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Caller identity recovered from a verified gateway token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub name: String,
    pub admin: bool,
}

/// JWT claims issued by the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayClaims {
    pub name: String,
    pub admin: bool,
    pub iat: u64,
    pub exp: u64,
}

impl From<GatewayClaims> for AuthenticatedUser {
    fn from(claims: GatewayClaims) -> Self {
        Self {
            name: claims.name,
            admin: claims.admin,
        }
    }
}
