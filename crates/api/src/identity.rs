//! Identity tokens issued by the external auth provider.

use std::sync::Arc;

use hushboard_common::{AppError, AppResult};
use hushboard_core::Identity;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

/// Claims carried by a provider-issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Provider uid.
    pub sub: String,
    /// Guest session without a provider account.
    #[serde(default)]
    pub anonymous: bool,
    /// Display name, if the provider has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            uid: claims.sub,
            is_anonymous: claims.anonymous,
            display_name: claims.name,
        }
    }
}

/// Verifies HS256 identity tokens against the shared secret.
#[derive(Clone)]
pub struct TokenVerifier {
    key: Arc<DecodingKey>,
    validation: Validation,
}

impl TokenVerifier {
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            key: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Decode and validate `token`.
    pub fn verify(&self, token: &str) -> AppResult<Identity> {
        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|_| AppError::Unauthorized)?;

        if data.claims.sub.is_empty() {
            return Err(AppError::Unauthorized);
        }

        Ok(data.claims.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn token(secret: &str, sub: &str, exp: i64) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            anonymous: true,
            name: None,
            exp,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn far_future() -> i64 {
        4_102_444_800 // 2100-01-01
    }

    #[test]
    fn test_verify_valid_token() {
        let verifier = TokenVerifier::new("secret");
        let identity = verifier.verify(&token("secret", "uid1", far_future())).unwrap();
        assert_eq!(identity.uid, "uid1");
        assert!(identity.is_anonymous);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let verifier = TokenVerifier::new("secret");
        let result = verifier.verify(&token("other", "uid1", far_future()));
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_verify_rejects_expired() {
        let verifier = TokenVerifier::new("secret");
        let result = verifier.verify(&token("secret", "uid1", 1_000));
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_verify_rejects_empty_subject() {
        let verifier = TokenVerifier::new("secret");
        let result = verifier.verify(&token("secret", "", far_future()));
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}
