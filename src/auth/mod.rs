use bson::oid::ObjectId;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config;

/// Name of the cookie that transports the identity token.
pub const AUTH_COOKIE: &str = "jwt";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Hex-encoded subject identifier
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(subject: ObjectId) -> Self {
        let now = Utc::now();
        let expiry_days = config::config().security.jwt_expiry_days;

        Self {
            sub: subject.to_hex(),
            exp: (now + Duration::days(expiry_days)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum AuthError {
    TokenGeneration(String),
    InvalidToken,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::TokenGeneration(msg) => write!(f, "token generation error: {}", msg),
            AuthError::InvalidToken => write!(f, "invalid identity token"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Issue a signed identity token for the given subject, expiring after the
/// configured lifetime. Pure computation, no side effects.
pub fn issue_token(subject: ObjectId) -> Result<String, AuthError> {
    let secret = &config::config().security.jwt_secret;
    let claims = Claims::new(subject);

    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Verify a token's signature and expiry and return the embedded subject.
///
/// A malformed token, a bad signature, an elapsed expiry and a subject that
/// is not a valid identifier all collapse into `InvalidToken`.
pub fn verify_token(token: &str) -> Result<ObjectId, AuthError> {
    let secret = &config::config().security.jwt_secret;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AuthError::InvalidToken)?;

    ObjectId::parse_str(&token_data.claims.sub).map_err(|_| AuthError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Once;

    static INIT: Once = Once::new();

    fn init_secret() {
        INIT.call_once(|| {
            std::env::set_var("JWT_SECRET", "unit-test-secret");
        });
    }

    #[test]
    fn issued_tokens_round_trip() {
        init_secret();
        let subject = ObjectId::new();

        let token = issue_token(subject).expect("issue");
        let verified = verify_token(&token).expect("verify");

        assert_eq!(verified, subject);
    }

    #[test]
    fn expiry_is_seven_days_out() {
        init_secret();
        let claims = Claims::new(ObjectId::new());
        let lifetime = claims.exp - claims.iat;

        assert_eq!(lifetime, 7 * 24 * 60 * 60);
    }

    #[test]
    fn tampered_tokens_are_rejected() {
        init_secret();
        let mut token = issue_token(ObjectId::new()).expect("issue");
        token.push('x');

        assert!(verify_token(&token).is_err());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        init_secret();
        let now = Utc::now().timestamp();
        // Past the default validation leeway
        let claims = Claims {
            sub: ObjectId::new().to_hex(),
            exp: now - 120,
            iat: now - 240,
        };
        let secret = &config::config().security.jwt_secret;
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encode");

        assert!(verify_token(&token).is_err());
    }

    #[test]
    fn garbage_subjects_are_rejected() {
        init_secret();
        let claims = Claims {
            sub: "not-an-identifier".to_string(),
            exp: Utc::now().timestamp() + 3600,
            iat: Utc::now().timestamp(),
        };
        let secret = &config::config().security.jwt_secret;
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encode");

        assert!(verify_token(&token).is_err());
    }
}
