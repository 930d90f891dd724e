//! Session tokens and password hashing.
//!
//! Tokens are HS256 JWTs. Each one carries a `jti` that is also recorded in
//! `auth_sessions`, so signing out revokes a token before it expires.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::{GatewayError, GatewayResult};

/// JWT claims structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (identity id)
    pub sub: String,

    /// Company the identity belongs to
    pub company_id: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID, the key of the matching `auth_sessions` row
    pub jti: String,
}

impl Claims {
    pub fn issued_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.iat, 0).single().unwrap_or_else(Utc::now)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or_else(Utc::now)
    }
}

/// A freshly signed token and the claims inside it.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// Signs and validates session tokens.
pub struct TokenIssuer {
    secret: String,
    lifetime_secs: i64,
}

impl TokenIssuer {
    pub fn new(secret: impl Into<String>, lifetime_secs: i64) -> Self {
        TokenIssuer {
            secret: secret.into(),
            lifetime_secs,
        }
    }

    /// Issues a token for an identity.
    pub fn issue(&self, identity_id: &str, company_id: &str) -> GatewayResult<IssuedToken> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: identity_id.to_string(),
            company_id: company_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            warn!(error = %e, "Failed to sign session token");
            GatewayError::AuthFailure("Failed to issue session".to_string())
        })?;

        Ok(IssuedToken { token, claims })
    }

    /// Validates signature and expiry.
    ///
    /// ## Errors
    /// * `SessionExpired` - the token is past `exp` (plus leeway)
    /// * `AuthFailure` - anything else wrong with the token
    pub fn validate(&self, token: &str) -> GatewayResult<Claims> {
        self.decode_with(token, Validation::default())
    }

    /// Validates the signature only. Used on sign-out, where an expired
    /// token must still be revocable.
    pub fn decode_ignoring_expiry(&self, token: &str) -> GatewayResult<Claims> {
        let mut validation = Validation::default();
        validation.validate_exp = false;
        self.decode_with(token, validation)
    }

    fn decode_with(&self, token: &str, validation: Validation) -> GatewayResult<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => GatewayError::SessionExpired,
            _ => GatewayError::AuthFailure(format!("Invalid token: {e}")),
        })
    }
}

/// Hashes a password with argon2id and a random salt.
pub fn hash_password(password: &str) -> GatewayResult<String> {
    use argon2::{
        password_hash::{rand_core::OsRng, SaltString},
        Argon2, PasswordHasher,
    };

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            warn!(error = %e, "Password hashing failed");
            GatewayError::AuthFailure("Failed to create account".to_string())
        })
}

/// Checks a password against a stored hash. A malformed hash never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "Stored password hash is malformed");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
