// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bearer token claims.
//!
//! Only the middle segment of the token is read: it is base64url-decoded and
//! parsed as JSON. The signature is never checked; this is an expiry
//! *prediction*, not verification.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Reasons a token's claims could not be read.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClaimsError {
    /// The token is not three dot-separated segments.
    #[error("token has {0} segments, expected 3")]
    Segments(usize),

    /// The payload segment is not valid base64url.
    #[error("payload is not base64url: {0}")]
    Base64(String),

    /// The payload is not a JSON object of the expected shape.
    #[error("payload is not valid JSON claims: {0}")]
    Json(String),

    /// The payload has no `exp` claim.
    #[error("token has no exp claim")]
    MissingExp,
}

/// Decoded token payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiration time (Unix seconds).
    #[serde(
        default,
        deserialize_with = "numeric_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub exp: Option<i64>,

    /// Issued at (Unix seconds).
    #[serde(
        default,
        deserialize_with = "numeric_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub iat: Option<i64>,

    /// Subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<serde_json::Value>,

    /// Role claim, when the backend includes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Everything else.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TokenClaims {
    /// Decodes the payload of `token`.
    pub fn decode(token: &str) -> Result<Self, ClaimsError> {
        let segments: Vec<&str> = token.trim().split('.').collect();
        if segments.len() != 3 {
            return Err(ClaimsError::Segments(segments.len()));
        }

        let payload = segments[1].trim_end_matches('=');
        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|e| ClaimsError::Base64(e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| ClaimsError::Json(e.to_string()))
    }

    /// Returns the `exp` claim or [`ClaimsError::MissingExp`].
    pub fn expires_at(&self) -> Result<i64, ClaimsError> {
        self.exp.ok_or(ClaimsError::MissingExp)
    }

    /// Returns the expiration as a `DateTime`.
    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// Returns the issued-at time as a `DateTime`.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.and_then(|iat| DateTime::from_timestamp(iat, 0))
    }

    /// Seconds left until expiry at `now`, negative once expired.
    pub fn seconds_remaining(&self, now: i64) -> Option<i64> {
        self.exp.map(|exp| exp.saturating_sub(now))
    }
}

/// Reads a JWT NumericDate: an integer or a fractional number of seconds.
///
/// Fractions are floored and out-of-range values saturate at the `i64` bounds.
fn numeric_date<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if let Some(secs) = number.as_i64() {
        return Ok(Some(secs));
    }
    if number.as_u64().is_some() {
        return Ok(Some(i64::MAX));
    }
    match number.as_f64() {
        Some(secs) if secs.is_finite() => Ok(Some(secs.floor() as i64)),
        _ => Err(D::Error::custom(format!("{} is not a NumericDate", number))),
    }
}

/// Reads the `exp` claim of `token`.
pub fn expires_at(token: &str) -> Result<i64, ClaimsError> {
    TokenClaims::decode(token)?.expires_at()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with(payload: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_decode_exp() {
        let token = token_with(r#"{"sub": 12, "exp": 1700000000, "role": "teacher"}"#);
        let claims = TokenClaims::decode(&token).unwrap();

        assert_eq!(claims.exp, Some(1_700_000_000));
        assert_eq!(claims.role.as_deref(), Some("teacher"));
        assert_eq!(expires_at(&token), Ok(1_700_000_000));
        assert!(claims.expiration().is_some());
    }

    #[test]
    fn test_decode_tolerates_padding() {
        let payload = URL_SAFE_NO_PAD.encode(r#"{"exp": 10}"#);
        let token = format!("h.{}==.s", payload);
        assert_eq!(expires_at(&token), Ok(10));
    }

    #[test]
    fn test_missing_exp() {
        let token = token_with(r#"{"sub": "x"}"#);
        assert_eq!(expires_at(&token), Err(ClaimsError::MissingExp));
    }

    #[test]
    fn test_malformed_tokens() {
        assert_eq!(expires_at("opaque"), Err(ClaimsError::Segments(1)));
        assert_eq!(expires_at("a.b.c.d"), Err(ClaimsError::Segments(4)));
        assert!(matches!(expires_at("a.!!!.c"), Err(ClaimsError::Base64(_))));

        let not_json = format!("a.{}.c", URL_SAFE_NO_PAD.encode("hello"));
        assert!(matches!(expires_at(&not_json), Err(ClaimsError::Json(_))));

        let bad_exp = token_with(r#"{"exp": "tomorrow"}"#);
        assert!(matches!(expires_at(&bad_exp), Err(ClaimsError::Json(_))));
    }

    #[test]
    fn test_seconds_remaining() {
        let claims = TokenClaims::decode(&token_with(r#"{"exp": 100}"#)).unwrap();
        assert_eq!(claims.seconds_remaining(70), Some(30));
        assert_eq!(claims.seconds_remaining(105), Some(-5));
    }

    #[test]
    fn test_seconds_remaining_saturates() {
        let past = TokenClaims::decode(&token_with(r#"{"exp": -9223372036854775808}"#)).unwrap();
        assert_eq!(past.seconds_remaining(1_800_000_000), Some(i64::MIN));

        let future = TokenClaims::decode(&token_with(r#"{"exp": 9223372036854775807}"#)).unwrap();
        assert_eq!(future.seconds_remaining(-10), Some(i64::MAX));
    }

    #[test]
    fn test_numeric_date_forms() {
        assert_eq!(expires_at(&token_with(r#"{"exp": 1700000000.75}"#)), Ok(1_700_000_000));
        assert_eq!(expires_at(&token_with(r#"{"exp": -1.5}"#)), Ok(-2));
        assert_eq!(expires_at(&token_with(r#"{"exp": 1e300}"#)), Ok(i64::MAX));
        assert_eq!(
            expires_at(&token_with(r#"{"exp": 18446744073709551615}"#)),
            Ok(i64::MAX)
        );
        assert_eq!(expires_at(&token_with(r#"{"exp": null}"#)), Err(ClaimsError::MissingExp));
    }
}
