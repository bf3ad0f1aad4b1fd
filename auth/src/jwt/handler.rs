use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;

/// Session token handler: issues and verifies HS256 tokens.
///
/// Holds no record of issued tokens. Every token signed with the configured
/// secret is valid until its `exp`, and changing the secret invalidates all of
/// them at once.
pub struct TokenHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl TokenHandler {
    /// Lifetime of tokens issued by [`TokenHandler::new`].
    pub const DEFAULT_LIFETIME_SECS: i64 = 60 * 60;

    /// Create a token handler with the default one hour token lifetime.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    pub fn new(secret: &[u8]) -> Self {
        Self::with_lifetime(secret, Duration::seconds(Self::DEFAULT_LIFETIME_SECS))
    }

    /// Create a token handler issuing tokens that expire after `lifetime`.
    pub fn with_lifetime(secret: &[u8], lifetime: Duration) -> Self {
        let algorithm = Algorithm::HS256;

        let mut validation = Validation::new(algorithm);
        // Expiry is exact
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            lifetime,
        }
    }

    /// Issue a token for a user, expiring one lifetime from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, user_id: i64, username: &str) -> Result<String, TokenError> {
        self.encode(&Claims::for_user(user_id, username, self.lifetime))
    }

    /// Sign the given claims as-is.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        let header = Header::new(self.validation.algorithms[0]);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify signature and expiry, then return the embedded claims.
    ///
    /// # Errors
    /// * `BadSignature` - Token was not signed with this handler's secret
    /// * `Expired` - Token `exp` is in the past
    /// * `Malformed` - Token cannot be decoded or lacks required claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            })
    }
}
