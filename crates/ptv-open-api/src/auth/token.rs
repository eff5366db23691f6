//! Bearer token validation (HS256).

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation, Algorithm};
use ptv_config::AuthConfig;
use serde::{Deserialize, Serialize};

use crate::shared::error::ApiError;

/// Access token claims issued by the PTV token service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenClaims {
    /// Subject (user name)
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,

    /// Eeva, Pete or Shirley
    #[serde(default)]
    pub role: Option<String>,

    /// User organization id
    #[serde(default)]
    pub organization: Option<String>,

    #[serde(default)]
    pub delegated_organizations: Vec<String>,

    #[serde(default)]
    pub access_rights: Vec<String>,
}

pub struct TokenValidator {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    issuer: String,
    audience: String,
}

impl TokenValidator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn validate_token(&self, token: &str) -> Result<AccessTokenClaims, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    ApiError::unauthorized("Token has expired")
                }
                _ => ApiError::unauthorized(format!("Invalid token: {}", e)),
            })
    }

    /// Sign claims with the configured secret. Used by tests and local tooling.
    pub fn sign(&self, claims: &AccessTokenClaims) -> Result<String, ApiError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("Failed to sign token: {}", e)))
    }
}

/// Extract the token from an `Authorization: Bearer ...` header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
