pub mod crypto_provider;

pub use crypto_provider::{CryptoProvider, ProviderError};
