use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::core::error::{AppError, Result};
use crate::features::gateway::models::{AuthenticatedUser, GatewayClaims};

/// Issues and verifies HS256 gateway tokens
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

/// A freshly signed token and its lifetime in seconds
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue_token(&self, name: &str, admin: bool) -> Result<IssuedToken> {
        let iat = unix_now();
        let claims = GatewayClaims {
            name: name.to_string(),
            admin,
            iat,
            exp: iat + self.ttl.as_secs(),
        };
        self.sign(&claims).map(|token| IssuedToken {
            token,
            expires_in: self.ttl.as_secs(),
        })
    }

    fn sign(&self, claims: &GatewayClaims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to sign gateway token: {}", e);
            AppError::Internal(format!("Failed to sign token: {}", e))
        })
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<GatewayClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

        Ok(data.claims.into())
    }
}
