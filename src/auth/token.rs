use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::{Role, UserId};

/// Token verification/issuance error types
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,

    #[error("Malformed token")]
    Malformed,

    #[error("Token encoding failed")]
    Encoding(#[source] jsonwebtoken::errors::Error),
}

/// The identity a token carries
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UserClaims {
    pub id: UserId,
    pub role: Role,
}

/// Signed token payload. Immutable once issued; a new login issues a new,
/// independent token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user: UserClaims,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 token service
///
/// The signing secret and token lifetime are supplied by configuration; this
/// service never generates or stores either.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        // Zero leeway so the configured lifetime is exact
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
            validation,
        }
    }

    /// Issue a signed token for the given identity, valid for the configured
    /// lifetime from now.
    pub fn issue(&self, id: UserId, role: Role) -> Result<String, TokenError> {
        let now = Utc::now();
        let expiration = now + self.ttl;

        let claims = Claims {
            user: UserClaims { id, role },
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(TokenError::Encoding)
    }

    /// Verify signature and expiry, returning the embedded claims.
    ///
    /// Verification is all-or-nothing: no claim is exposed unless the
    /// signature checks out and the token is within its lifetime.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidToken
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_) => TokenError::Malformed,
                _ => TokenError::Invalid,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const SECRET: &str = "test_secret_key_32_characters_long!";

    fn service(ttl_seconds: i64) -> TokenService {
        TokenService::new(SECRET, Duration::seconds(ttl_seconds))
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let tokens = service(3600);
        let user_id = Uuid::new_v4();

        let token = tokens.issue(user_id, Role::Admin).unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.user.id, user_id);
        assert_eq!(claims.user.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_verify_with_different_secret_fails() {
        let tokens = service(3600);
        let other = TokenService::new("another_secret_key_32_chars_long!!!", Duration::seconds(3600));

        let token = tokens.issue(Uuid::new_v4(), Role::User).unwrap();

        assert!(matches!(other.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_verify_after_expiry_fails() {
        let tokens = service(-60);

        let token = tokens.issue(Uuid::new_v4(), Role::User).unwrap();

        assert!(matches!(tokens.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_verify_rejects_malformed_input() {
        let tokens = service(3600);

        assert!(matches!(tokens.verify("not-a-token"), Err(TokenError::Malformed)));
        assert!(matches!(tokens.verify(""), Err(TokenError::Malformed)));
    }

    #[test]
    fn test_tampered_payload_fails() {
        let tokens = service(3600);
        let token = tokens.issue(Uuid::new_v4(), Role::User).unwrap();

        // Flip a character inside the payload segment
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        let mut payload: Vec<char> = parts[1].chars().collect();
        payload[0] = if payload[0] == 'A' { 'B' } else { 'A' };
        parts[1] = payload.into_iter().collect();
        let tampered = parts.join(".");

        assert!(tokens.verify(&tampered).is_err());
    }
}
