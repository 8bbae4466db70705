//! Signed session tokens (JSON Web Tokens) that bind a user ID.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, UserID};

/// How long a session token stays valid by default.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::days(30);

/// The keys for signing and verifying session tokens.
#[derive(Clone)]
pub struct TokenKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenKeys {
    /// Derive the HS256 signing and verification keys from `secret`.
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// The contents of a session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub id: UserID,
    /// The time the token was issued, as a Unix timestamp.
    pub iat: i64,
    /// The expiry time of the token, as a Unix timestamp.
    pub exp: i64,
}

/// Create a signed token for `user_id` that expires after `lifetime`.
///
/// # Errors
///
/// Returns [Error::TokenCreation] if the token could not be signed.
pub fn encode_token(
    user_id: UserID,
    lifetime: Duration,
    keys: &TokenKeys,
) -> Result<String, Error> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        id: user_id,
        iat: now.unix_timestamp(),
        exp: (now + lifetime).unix_timestamp(),
    };

    encode(&Header::default(), &claims, &keys.encoding_key)
        .map_err(|error| Error::TokenCreation(error.to_string()))
}

/// Verify `token` and return its claims.
///
/// # Errors
///
/// Returns [Error::Unauthenticated] if the token is malformed, expired or has
/// an invalid signature.
pub fn decode_token(token: &str, keys: &TokenKeys) -> Result<Claims, Error> {
    decode::<Claims>(token, &keys.decoding_key, &Validation::default())
        .map(|token_data| token_data.claims)
        .map_err(|error| {
            tracing::debug!("Rejected session token: {error}");
            Error::Unauthenticated
        })
}
