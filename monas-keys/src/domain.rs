pub mod error;
pub mod key;
pub mod pem;
pub mod signature;

pub use error::{FormatError, ProviderError};
