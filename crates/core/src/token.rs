//! Access token payload decoding
//!
//! Tokens are never verified on the client. The payload segment is only
//! decoded to learn when the token expires, so anything that fails to decode
//! is reported as `None` and callers treat it as already expired.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Serialize};

/// base64url, with or without trailing `=`
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Latest `exp` taken at face value, 9999-12-31T23:59:59Z
const MAX_EXP_SECS: f64 = 253_402_300_799.0;

/// Claims carried by an access token payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiry, Unix seconds
    #[serde(default)]
    pub exp: Option<f64>,
    /// Issued at, Unix seconds
    #[serde(default)]
    pub iat: Option<f64>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, rename = "type")]
    pub token_type: Option<String>,
}

impl TokenClaims {
    /// Expiry in Unix milliseconds. An `exp` of zero, or outside
    /// `±MAX_EXP_SECS`, counts as missing.
    #[allow(clippy::cast_possible_truncation)]
    pub fn expires_at_millis(&self) -> Option<i64> {
        self.exp
            .filter(|exp| exp.is_finite() && *exp != 0.0 && exp.abs() <= MAX_EXP_SECS)
            .map(|exp| (exp * 1000.0) as i64)
    }
}

/// Decode the payload segment of a dot-separated token
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let payload = token.split('.').nth(1)?;
    let bytes = PAYLOAD_ENGINE.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Expiry of `token` in Unix milliseconds, if it carries one
pub fn expires_at_millis(token: &str) -> Option<i64> {
    decode_claims(token)?.expires_at_millis()
}

/// Whether `token` is expired, or will be within `skew_millis` of `now_millis`.
///
/// Undecodable tokens and tokens without `exp` are expired.
pub fn is_expired(token: &str, now_millis: i64, skew_millis: i64) -> bool {
    expires_at_millis(token)
        .is_none_or(|expires_at| expires_at <= now_millis.saturating_add(skew_millis))
}
