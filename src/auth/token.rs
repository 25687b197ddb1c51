use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{json, Value};

use super::AuthError;
use crate::config;

/// Verifies bearer tokens against the configured secret, issuer and
/// audience. Pure given the token and the clock; no I/O.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    secret: String,
    issuer: String,
    audience: String,
}

impl TokenVerifier {
    pub fn new(
        secret: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    pub fn from_config() -> Result<Self, AuthError> {
        let security = &config::config().security;

        if security.jwt_secret.is_empty() {
            return Err(AuthError::InvalidToken("JWT secret not configured".into()));
        }

        Ok(Self::new(
            &security.jwt_secret,
            &security.jwt_issuer,
            &security.jwt_audience,
        ))
    }

    /// Decode and cryptographically verify a token, checking signature,
    /// expiry, issuer and audience. Returns the raw claim set; shape
    /// normalization happens later in `principal::resolve`.
    pub fn verify(&self, token: &str) -> Result<Value, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let key = DecodingKey::from_secret(self.secret.as_bytes());

        match decode::<Value>(token, &key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => Err(AuthError::ExpiredToken),
                _ => Err(AuthError::InvalidToken(e.to_string())),
            },
        }
    }

    /// Sign a claim set, stamping the standard iss/aud/iat/exp fields over
    /// whatever the caller provides. Used by login fixtures and the test
    /// suite; request handling only ever consumes tokens.
    pub fn sign(&self, mut claims: Value, ttl: Duration) -> Result<String, AuthError> {
        let now = Utc::now();

        let obj = claims
            .as_object_mut()
            .ok_or_else(|| AuthError::InvalidToken("claims must be a JSON object".into()))?;
        obj.insert("iss".into(), json!(self.issuer));
        obj.insert("aud".into(), json!(self.audience));
        obj.insert("iat".into(), json!(now.timestamp()));
        obj.insert("exp".into(), json!((now + ttl).timestamp()));

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}
