use crate::domain::key::{KeyAlgorithm, KeyGenParams, KeyImportParams, KeyMaterial, KeyPair};

pub use crate::domain::error::ProviderError;

/// Asymmetric primitives the key service delegates to.
///
/// Implementations own the actual RSA math and padding schemes; callers only
/// arrange parameters and reformat what comes back.
pub trait CryptoProvider {
    type PrivateKey;
    type PublicKey;

    fn generate_key_pair(
        &self,
        params: &KeyGenParams,
    ) -> Result<KeyPair<Self::PrivateKey, Self::PublicKey>, ProviderError>;

    /// PKCS#8 DER of the private half.
    fn export_private_key(&self, key: &Self::PrivateKey) -> Result<KeyMaterial, ProviderError>;

    /// SubjectPublicKeyInfo DER of the public half.
    fn export_public_key(&self, key: &Self::PublicKey) -> Result<KeyMaterial, ProviderError>;

    fn import_private_key(
        &self,
        der: &KeyMaterial,
        params: &KeyImportParams,
    ) -> Result<Self::PrivateKey, ProviderError>;

    fn import_public_key(
        &self,
        der: &KeyMaterial,
        params: &KeyImportParams,
    ) -> Result<Self::PublicKey, ProviderError>;

    fn sign(
        &self,
        algorithm: KeyAlgorithm,
        key: &Self::PrivateKey,
        data: &[u8],
    ) -> Result<Vec<u8>, ProviderError>;

    /// `Ok(false)` for a well-formed call whose signature does not match.
    fn verify(
        &self,
        algorithm: KeyAlgorithm,
        key: &Self::PublicKey,
        signature: &[u8],
        data: &[u8],
    ) -> Result<bool, ProviderError>;

    fn encrypt(&self, key: &Self::PublicKey, data: &[u8]) -> Result<Vec<u8>, ProviderError>;

    fn decrypt(&self, key: &Self::PrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>, ProviderError>;
}
