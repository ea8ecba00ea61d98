use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::ids::UserId;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    user_id: i64,
    iat: i64,
    exp: i64,
}

/// Issues and verifies the HS256 bearer tokens handed out on login.
#[derive(Clone)]
pub struct TokenAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenAuthority {
    pub fn new(config: &AuthConfig) -> Self {
        Self::with_ttl(
            &config.jwt_secret,
            Duration::seconds(i64::from(config.token_ttl_secs)),
        )
    }

    pub fn with_ttl(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            ttl,
        }
    }

    pub fn issue(&self, user: UserId) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            user_id: user.0,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Signing)
    }

    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(TokenError::Invalid)?;
        Ok(UserId(data.claims.user_id))
    }
}

impl fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("unable to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("invalid or expired token")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}
