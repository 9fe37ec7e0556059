use recordbase_encoding::{B64, NotB64Encoded};
use serde::Serialize;

/// Opaque user-identity payload attached to an auth token.
///
/// The store never interprets its contents; it is carried for the host
/// application and compared/forwarded as a whole.
pub type AuthRecord = serde_json::Map<String, serde_json::Value>;

/// The `{token, record}` pair serialized into the auth cookie value.
///
/// Constructed fresh on every save and discarded after encoding; the cookie
/// medium only ever sees the flat encoded string.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AuthEnvelope {
    /// The raw auth token.
    pub token: String,
    /// The user record, serialized as `null` when absent.
    pub record: Option<AuthRecord>,
}

/// A persisted cookie value could not be decoded back into an
/// [`AuthEnvelope`].
#[allow(missing_docs)]
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    NotB64Encoded(#[from] NotB64Encoded),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("Encoded value has no string `token` field")]
    MissingToken,
    #[error("Encoded value has no `record` field")]
    MissingRecord,
    #[error("Encoded `record` field is neither an object nor null")]
    InvalidRecord,
}

/// An in-memory auth state could not be serialized for persistence.
#[derive(Debug, thiserror::Error)]
#[error("Failed to serialize auth state: {0}")]
pub struct EncodeError(#[from] serde_json::Error);

/// Packs an envelope into the opaque string stored as the cookie value.
///
/// The cookie medium is a flat string with character-set restrictions, so
/// the JSON form is wrapped in standard base64.
pub fn encode(envelope: &AuthEnvelope) -> Result<String, EncodeError> {
    let json = serde_json::to_vec(envelope)?;
    Ok(B64::from(json).to_string())
}

/// Unpacks a previously persisted cookie value.
///
/// Decoding is strict about shape: the decoded JSON must be an object with a
/// string `token` and a `record` key (null allowed). Partially-shaped input
/// is rejected rather than defaulted, so a format change surfaces as a
/// decode failure and the value is treated as absent. The historical `model`
/// key is accepted as an alias for `record` on input only.
pub fn decode(value: &str) -> Result<AuthEnvelope, DecodeError> {
    let bytes: B64 = value.parse()?;
    let parsed: serde_json::Value = serde_json::from_slice(bytes.as_bytes())?;

    let serde_json::Value::Object(mut fields) = parsed else {
        return Err(DecodeError::MissingToken);
    };

    let token = match fields.get("token") {
        Some(serde_json::Value::String(token)) => token.clone(),
        _ => return Err(DecodeError::MissingToken),
    };

    let record = fields
        .remove("record")
        .or_else(|| fields.remove("model"))
        .ok_or(DecodeError::MissingRecord)?;

    let record = match record {
        serde_json::Value::Null => None,
        serde_json::Value::Object(record) => Some(record),
        _ => return Err(DecodeError::InvalidRecord),
    };

    Ok(AuthEnvelope { token, record })
}
