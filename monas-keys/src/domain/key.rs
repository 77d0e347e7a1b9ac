use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::ProviderError;

/// RSA exponent 65537 as a big-endian byte string.
pub const DEFAULT_PUBLIC_EXPONENT: [u8; 3] = [0x01, 0x00, 0x01];
pub const DEFAULT_MODULUS_BITS: usize = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyAlgorithm {
    #[serde(rename = "RSA-OAEP")]
    RsaOaep,
    #[serde(rename = "RSASSA-PKCS1-v1_5")]
    RsassaPkcs1v15,
}

impl KeyAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            KeyAlgorithm::RsaOaep => "RSA-OAEP",
            KeyAlgorithm::RsassaPkcs1v15 => "RSASSA-PKCS1-v1_5",
        }
    }

    /// Usages a key pair of this algorithm may carry.
    pub fn allowed_usages(&self) -> &'static [KeyUsage] {
        match self {
            KeyAlgorithm::RsaOaep => &[KeyUsage::Encrypt, KeyUsage::Decrypt],
            KeyAlgorithm::RsassaPkcs1v15 => &[KeyUsage::Sign, KeyUsage::Verify],
        }
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeyAlgorithm {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "RSA-OAEP" => Ok(KeyAlgorithm::RsaOaep),
            "RSASSA-PKCS1-V1_5" => Ok(KeyAlgorithm::RsassaPkcs1v15),
            _ => Err(ProviderError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    #[default]
    #[serde(rename = "SHA-256")]
    Sha256,
    #[serde(rename = "SHA-384")]
    Sha384,
    #[serde(rename = "SHA-512")]
    Sha512,
}

impl HashAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha384 => "SHA-384",
            HashAlgorithm::Sha512 => "SHA-512",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SHA-256" => Ok(HashAlgorithm::Sha256),
            "SHA-384" => Ok(HashAlgorithm::Sha384),
            "SHA-512" => Ok(HashAlgorithm::Sha512),
            _ => Err(ProviderError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyUsage {
    Encrypt,
    Decrypt,
    Sign,
    Verify,
}

impl KeyUsage {
    /// Whether the usage belongs on the private half of a pair.
    pub fn is_private(&self) -> bool {
        matches!(self, KeyUsage::Decrypt | KeyUsage::Sign)
    }
}

impl fmt::Display for KeyUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyUsage::Encrypt => "encrypt",
            KeyUsage::Decrypt => "decrypt",
            KeyUsage::Sign => "sign",
            KeyUsage::Verify => "verify",
        };
        f.write_str(name)
    }
}

/// Parameters handed to a provider to generate an RSA key pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyGenParams {
    pub algorithm: KeyAlgorithm,
    pub modulus_bits: usize,
    pub public_exponent: Vec<u8>,
    pub hash: HashAlgorithm,
    pub usages: Vec<KeyUsage>,
}

impl KeyGenParams {
    /// Parameters with exponent 65537 and every usage the algorithm allows.
    pub fn new(algorithm: KeyAlgorithm, modulus_bits: usize, hash: HashAlgorithm) -> Self {
        Self {
            algorithm,
            modulus_bits,
            public_exponent: DEFAULT_PUBLIC_EXPONENT.to_vec(),
            hash,
            usages: algorithm.allowed_usages().to_vec(),
        }
    }
}

/// Parameters describing DER key material on import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyImportParams {
    pub algorithm: KeyAlgorithm,
    pub hash: HashAlgorithm,
}

impl KeyImportParams {
    pub fn new(algorithm: KeyAlgorithm, hash: HashAlgorithm) -> Self {
        Self { algorithm, hash }
    }
}

/// Key-encoding bytes (PKCS#8 or SubjectPublicKeyInfo DER) as exported by a provider.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial(Vec<u8>);

impl KeyMaterial {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyMaterial({} bytes)", self.0.len())
    }
}

#[derive(Debug, Clone)]
pub struct KeyPair<Private, Public> {
    pub private_key: Private,
    pub public_key: Public,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PemKeyPair {
    pub private_key: String,
    pub public_key: String,
}

#[cfg(test)]
mod key_tests {
    use super::*;

    #[test]
    fn algorithm_names_parse() {
        assert_eq!("RSA-OAEP".parse::<KeyAlgorithm>().unwrap(), KeyAlgorithm::RsaOaep);
        assert_eq!(
            "RSASSA-PKCS1-v1_5".parse::<KeyAlgorithm>().unwrap(),
            KeyAlgorithm::RsassaPkcs1v15
        );
        assert_eq!("sha-512".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha512);
    }

    #[test]
    fn unknown_algorithm_is_unsupported() {
        assert!(matches!(
            "RSA-PSS".parse::<KeyAlgorithm>(),
            Err(ProviderError::UnsupportedAlgorithm(name)) if name == "RSA-PSS"
        ));
        assert!(matches!(
            "MD5".parse::<HashAlgorithm>(),
            Err(ProviderError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn names_round_trip_through_display() {
        for alg in [KeyAlgorithm::RsaOaep, KeyAlgorithm::RsassaPkcs1v15] {
            assert_eq!(alg.to_string().parse::<KeyAlgorithm>().unwrap(), alg);
        }
        for hash in [HashAlgorithm::Sha256, HashAlgorithm::Sha384, HashAlgorithm::Sha512] {
            assert_eq!(hash.to_string().parse::<HashAlgorithm>().unwrap(), hash);
        }
    }

    #[test]
    fn serde_uses_webcrypto_names() {
        let json = serde_json::to_string(&KeyAlgorithm::RsassaPkcs1v15).unwrap();
        assert_eq!(json, "\"RSASSA-PKCS1-v1_5\"");
        let hash: HashAlgorithm = serde_json::from_str("\"SHA-384\"").unwrap();
        assert_eq!(hash, HashAlgorithm::Sha384);
    }

    #[test]
    fn gen_params_default_to_65537_and_all_usages() {
        let params = KeyGenParams::new(KeyAlgorithm::RsaOaep, 2048, HashAlgorithm::Sha256);
        assert_eq!(params.public_exponent, vec![0x01, 0x00, 0x01]);
        assert_eq!(params.usages, vec![KeyUsage::Encrypt, KeyUsage::Decrypt]);
    }

    #[test]
    fn key_material_debug_hides_bytes() {
        let material = KeyMaterial::new(vec![0xde, 0xad]);
        assert_eq!(format!("{material:?}"), "KeyMaterial(2 bytes)");
    }
}
