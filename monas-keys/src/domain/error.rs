use thiserror::Error;

/// Raised when text that should carry key material or a signature is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("missing PEM begin marker")]
    MissingBeginMarker,
    #[error("missing PEM end marker")]
    MissingEndMarker,
    #[error("PEM markers disagree: BEGIN {begin} / END {end}")]
    LabelMismatch { begin: String, end: String },
    #[error("expected a {expected} KEY block, found {found} KEY")]
    UnexpectedLabel { expected: String, found: String },
    #[error("invalid base64: {0}")]
    InvalidBase64(String),
    #[error("unexpected data after PEM end marker")]
    TrailingData,
    #[error("PEM label must be a single line: {0:?}")]
    InvalidLabel(String),
}

/// Failure reported by a crypto provider. Passed to callers unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("key cannot be used for this operation: {0}")]
    InvalidAccess(String),
    #[error("key generation failed: {0}")]
    KeyGeneration(String),
    #[error("key export failed: {0}")]
    Export(String),
    #[error("key import failed: {0}")]
    Import(String),
    #[error("operation failed: {0}")]
    Operation(String),
}
