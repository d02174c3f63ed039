//! HS256 JSON Web Token adapter for the `TokenIssuer` port.

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenError, TokenIssuer};
use crate::domain::{AccessToken, UserId};

/// Default token lifetime: seven days.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24 * 7;

/// Claims carried by every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Claims {
    /// Subject: the user id.
    sub: String,
    /// Issued at, seconds since the Unix epoch.
    iat: u64,
    /// Expiry, seconds since the Unix epoch.
    exp: u64,
}

/// Token issuer signing with a shared HMAC secret.
pub struct JwtTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtTokenIssuer {
    /// Build an issuer from raw key bytes.
    pub fn new(secret: &[u8], ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
            clock,
        }
    }
}

fn epoch_seconds(value: chrono::DateTime<chrono::Utc>) -> Result<u64, TokenError> {
    u64::try_from(value.timestamp())
        .map_err(|_| TokenError::signing("timestamp precedes the Unix epoch"))
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user: &UserId) -> Result<AccessToken, TokenError> {
        let issued_at = self.clock.utc();
        let claims = Claims {
            sub: user.to_string(),
            iat: epoch_seconds(issued_at)?,
            exp: epoch_seconds(issued_at + self.ttl)?,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map(AccessToken::new)
            .map_err(|err| TokenError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::invalid(err.to_string()),
            }
        })?;
        UserId::new(&data.claims.sub).map_err(|err| TokenError::invalid(err.to_string()))
    }
}
