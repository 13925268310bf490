//! Bearer token issuing and verification.
//!
//! Tokens are HS256 JWTs carrying the user id (`sub`), issue time, and
//! expiry. They are opaque to the client and presented on every mutating
//! request via `Authorization: Bearer <token>`.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crowdlocal_core::UserId;

/// Errors from token verification or issuance.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token's expiry has passed.
    #[error("token expired")]
    Expired,

    /// The token is malformed or its signature does not verify.
    #[error("invalid token")]
    Invalid,

    /// The token could not be signed.
    #[error("token signing failed")]
    Signing,
}

/// Claims carried by a bearer token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User ID the token is bound to.
    sub: Uuid,
    /// Issued-at (unix seconds).
    iat: i64,
    /// Expiry (unix seconds).
    exp: i64,
}

/// Issues and validates bearer tokens bound to a user id.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl TokenService {
    /// Create a token service from the signing secret and token lifetime.
    #[must_use]
    pub fn new(secret: &SecretString, ttl_secs: i64) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            ttl_secs,
        }
    }

    /// Issue a signed token for the given user.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue(&self, user_id: UserId) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.as_uuid(),
            iat: now,
            exp: now + self.ttl_secs,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(|_| TokenError::Signing)
    }

    /// Verify a token and return the user id it is bound to.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` for an expired token and
    /// `TokenError::Invalid` for anything malformed or tampered with.
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })?;

        Ok(UserId::new(data.claims.sub))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service_with_ttl(ttl_secs: i64) -> TokenService {
        TokenService::new(&SecretString::from("a".repeat(64)), ttl_secs)
    }

    #[test]
    fn test_issue_verify_roundtrip() {
        let service = service_with_ttl(3600);
        let user_id = UserId::generate();

        let token = service.issue(user_id).unwrap();
        assert_eq!(service.verify(&token).unwrap(), user_id);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Well past the default validation leeway.
        let service = service_with_ttl(-600);
        let token = service.issue(UserId::generate()).unwrap();

        assert!(matches!(service.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let service = service_with_ttl(3600);
        assert!(matches!(
            service.verify("not-a-token"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issuer = service_with_ttl(3600);
        let verifier = TokenService::new(&SecretString::from("b".repeat(64)), 3600);

        let token = issuer.issue(UserId::generate()).unwrap();
        assert!(matches!(verifier.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let service = service_with_ttl(3600);
        let mut token = service.issue(UserId::generate()).unwrap();
        token.pop();
        token.push('x');

        assert!(service.verify(&token).is_err());
    }
}
