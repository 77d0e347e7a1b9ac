pub mod application_service;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod port;

pub use application_service::key_service::{KeyService, KeyServiceError};
pub use config::{ConfigError, KeyGenOptions, KeysConfig};
pub use domain::key::{HashAlgorithm, KeyAlgorithm, KeyImportParams, KeyPair, PemKeyPair};
pub use domain::pem::{decode_pem, encode_pem, PemBlock, PRIVATE_LABEL, PUBLIC_LABEL};
pub use domain::signature::Signature;
pub use domain::{FormatError, ProviderError};
pub use infrastructure::rsa_provider::RsaCryptoProvider;
pub use port::CryptoProvider;
