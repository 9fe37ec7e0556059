use std::{fmt, str::FromStr};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};

use crate::FromStrVisitor;

/// Bytes encoded with the URL-safe base64 alphabet, without padding.
///
/// Parsing is forgiving about trailing padding so that values produced by
/// padded encoders (JWT segments from some issuers, for example) still
/// decode; serialization always emits the unpadded form.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct B64Url(Vec<u8>);

/// The provided input was not valid URL-safe base64.
#[derive(Debug, thiserror::Error)]
#[error("Input is not valid URL-safe base64")]
pub struct NotB64UrlEncoded;

impl B64Url {
    /// Returns the raw decoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the value, returning the raw decoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Display for B64Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&URL_SAFE_NO_PAD.encode(&self.0))
    }
}

impl FromStr for B64Url {
    type Err = NotB64UrlEncoded;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        URL_SAFE_NO_PAD
            .decode(s.trim_end_matches('='))
            .map(Self)
            .map_err(|_| NotB64UrlEncoded)
    }
}

impl From<Vec<u8>> for B64Url {
    fn from(src: Vec<u8>) -> Self {
        Self(src)
    }
}

impl From<&[u8]> for B64Url {
    fn from(src: &[u8]) -> Self {
        Self(src.to_vec())
    }
}

impl<'de> Deserialize<'de> for B64Url {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(FromStrVisitor::new())
    }
}

impl Serialize for B64Url {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}
