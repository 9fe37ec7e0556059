use std::{fmt, str::FromStr};

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use crate::FromStrVisitor;

/// Bytes encoded with the standard base64 alphabet, with padding.
///
/// The [`fmt::Display`] and serde representations are the encoded string
/// form; the wrapped value is the raw bytes.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct B64(Vec<u8>);

/// The provided input was not valid standard-alphabet base64.
#[derive(Debug, thiserror::Error)]
#[error("Input is not valid base64")]
pub struct NotB64Encoded;

impl B64 {
    /// Returns the raw decoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the value, returning the raw decoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Display for B64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&STANDARD.encode(&self.0))
    }
}

impl FromStr for B64 {
    type Err = NotB64Encoded;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        STANDARD.decode(s).map(Self).map_err(|_| NotB64Encoded)
    }
}

impl From<Vec<u8>> for B64 {
    fn from(src: Vec<u8>) -> Self {
        Self(src)
    }
}

impl From<&[u8]> for B64 {
    fn from(src: &[u8]) -> Self {
        Self(src.to_vec())
    }
}

impl<'de> Deserialize<'de> for B64 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(FromStrVisitor::new())
    }
}

impl Serialize for B64 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_with_padding() {
        let value = B64::from(b"hello".as_slice());
        assert_eq!(value.to_string(), "aGVsbG8=");
    }

    #[test]
    fn round_trips() {
        let value = B64::from(vec![0, 1, 2, 250, 255]);
        let parsed: B64 = value.to_string().parse().unwrap();
        assert_eq!(parsed, value);
    }

    #[test]
    fn rejects_invalid_input() {
        assert!("not-base64!".parse::<B64>().is_err());
    }

    #[test]
    fn serde_uses_encoded_form() {
        let value = B64::from(b"hi".as_slice());
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "\"aGk=\"");

        let parsed: B64 = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, value);
    }
}
