use chrono::{DateTime, Utc};
use recordbase_encoding::B64Url;

/// Extracts the expiration instant embedded in a JWT-style token.
///
/// Tokens are opaque to the store and not guaranteed to be JWTs; any
/// missing segment, malformed encoding or absent `exp` claim yields `None`
/// rather than an error, and the caller treats the expiration as unknown.
///
/// Only the payload position (second dot-separated segment) is inspected.
/// The segment count is not validated: an unsigned two-segment token whose
/// payload decodes still yields its `exp` claim.
pub fn token_expiration(token: &str) -> Option<DateTime<Utc>> {
    let payload = token.split('.').nth(1)?;
    let payload: B64Url = payload.parse().ok()?;
    let claims: serde_json::Value = serde_json::from_slice(payload.as_bytes()).ok()?;
    let exp = claims.get("exp")?.as_i64()?;
    DateTime::from_timestamp(exp, 0)
}
