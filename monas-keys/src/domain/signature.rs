use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::error::FormatError;

/// Raw signature bytes as produced by a signing operation.
///
/// Its text form (and its JSON form) is the standard, padded base64 encoding of the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(Box<[u8]>);

impl Signature {
    pub fn new(bytes: impl Into<Box<[u8]>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_text(&self) -> String {
        to_text(&self.0)
    }

    pub fn from_text(text: &str) -> Result<Self, FormatError> {
        from_text(text).map(Self::new)
    }
}

pub fn to_text(signature: &[u8]) -> String {
    BASE64_STANDARD.encode(signature)
}

pub fn from_text(text: &str) -> Result<Vec<u8>, FormatError> {
    BASE64_STANDARD
        .decode(text)
        .map_err(|e| FormatError::InvalidBase64(e.to_string()))
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Signature {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl FromStr for Signature {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_text())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_text(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod signature_tests {
    use super::*;

    #[test]
    fn text_round_trip() {
        for len in [0usize, 1, 2, 3, 64, 255, 256, 512] {
            let bytes: Vec<u8> = (0..len).map(|i| (i % 256) as u8).collect();
            let sig = Signature::new(bytes.clone());
            let restored = Signature::from_text(&sig.to_text()).unwrap();
            assert_eq!(restored.as_bytes(), bytes.as_slice());
        }
    }

    #[test]
    fn text_is_standard_padded_base64() {
        let sig = Signature::new(vec![0xfb, 0xff, 0x00, 0x68, 0x69]);
        assert_eq!(sig.to_text(), "+/8AaGk=");
        assert_eq!(sig.to_string(), sig.to_text());
        assert!(!sig.to_text().contains("-----"));
    }

    #[test]
    fn empty_signature_has_empty_text() {
        let sig = Signature::new(Vec::new());
        assert!(sig.is_empty());
        assert_eq!(sig.to_text(), "");
        assert_eq!(Signature::from_text("").unwrap(), sig);
    }

    #[test]
    fn invalid_text_is_a_format_error() {
        for text in ["not base64!", "abc", "a===", "aGVsbG8"] {
            assert!(
                matches!(Signature::from_text(text), Err(FormatError::InvalidBase64(_))),
                "{text} should be rejected"
            );
        }
    }

    #[test]
    fn parses_with_from_str() {
        let sig: Signature = "aGVsbG8=".parse().unwrap();
        assert_eq!(sig.as_bytes(), b"hello");
    }

    #[test]
    fn serializes_as_json_string() {
        let sig = Signature::new(b"hello".to_vec());
        let json = serde_json::to_string(&sig).unwrap();
        assert_eq!(json, "\"aGVsbG8=\"");

        let restored: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, sig);
    }

    #[test]
    fn rejects_invalid_json_string() {
        let result = serde_json::from_str::<Signature>("\"%%%\"");
        assert!(result.is_err());
        let result = serde_json::from_str::<Signature>("[1,2,3]");
        assert!(result.is_err());
    }
}
