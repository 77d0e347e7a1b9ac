//! Key generation and signing defaults

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::key::{HashAlgorithm, KeyAlgorithm, DEFAULT_MODULUS_BITS};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeysConfig {
    /// RSA modulus length in bits
    #[serde(default = "default_modulus_bits")]
    pub modulus_bits: usize,

    /// Digest bound to generated keys
    #[serde(default)]
    pub hash: HashAlgorithm,

    /// Algorithm used by `KeyService::sign`
    #[serde(default = "default_signature_algorithm")]
    pub signature_algorithm: KeyAlgorithm,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            modulus_bits: default_modulus_bits(),
            hash: HashAlgorithm::default(),
            signature_algorithm: default_signature_algorithm(),
        }
    }
}

fn default_modulus_bits() -> usize {
    DEFAULT_MODULUS_BITS
}

fn default_signature_algorithm() -> KeyAlgorithm {
    KeyAlgorithm::RsassaPkcs1v15
}

impl KeysConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))
    }

    pub fn key_gen_options(&self) -> KeyGenOptions {
        KeyGenOptions {
            modulus_bits: self.modulus_bits,
            hash: self.hash,
        }
    }
}

/// Size and digest of a key pair to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyGenOptions {
    pub modulus_bits: usize,
    pub hash: HashAlgorithm,
}

impl Default for KeyGenOptions {
    fn default() -> Self {
        Self {
            modulus_bits: DEFAULT_MODULUS_BITS,
            hash: HashAlgorithm::Sha256,
        }
    }
}

/// Configuration error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Serialize error: {0}")]
    Serialize(String),
}
