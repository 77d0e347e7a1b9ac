use thiserror::Error;
use tracing::debug;

use crate::config::{KeyGenOptions, KeysConfig};
use crate::domain::error::{FormatError, ProviderError};
use crate::domain::key::{
    KeyAlgorithm, KeyGenParams, KeyImportParams, KeyMaterial, KeyPair, PemKeyPair,
};
use crate::domain::pem::{decode_pem_with_label, encode_pem, PRIVATE_LABEL, PUBLIC_LABEL};
use crate::domain::signature::Signature;
use crate::port::crypto_provider::CryptoProvider;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyServiceError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Key-pair facade over a [`CryptoProvider`].
///
/// Generation, signing and encryption are passed straight to the provider;
/// the service only fills in parameters and turns the results into PEM text
/// or [`Signature`] values. Provider errors are returned as-is.
pub struct KeyService<P> {
    provider: P,
    config: KeysConfig,
}

pub type ProviderKeyPair<P> =
    KeyPair<<P as CryptoProvider>::PrivateKey, <P as CryptoProvider>::PublicKey>;

impl<P: CryptoProvider> KeyService<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, KeysConfig::default())
    }

    pub fn with_config(provider: P, config: KeysConfig) -> Self {
        Self { provider, config }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// RSA-OAEP pair: the public half encrypts, the private half decrypts.
    pub fn generate_encryption_key_pair(
        &self,
        options: KeyGenOptions,
    ) -> Result<ProviderKeyPair<P>, ProviderError> {
        self.generate(KeyAlgorithm::RsaOaep, options)
    }

    /// RSASSA-PKCS1-v1_5 pair: the private half signs, the public half verifies.
    pub fn generate_signing_key_pair(
        &self,
        options: KeyGenOptions,
    ) -> Result<ProviderKeyPair<P>, ProviderError> {
        self.generate(KeyAlgorithm::RsassaPkcs1v15, options)
    }

    /// [`Self::generate_encryption_key_pair`] with the size and hash from the config.
    pub fn generate_encryption_key_pair_from_config(
        &self,
    ) -> Result<ProviderKeyPair<P>, ProviderError> {
        self.generate_encryption_key_pair(self.config.key_gen_options())
    }

    /// [`Self::generate_signing_key_pair`] with the size and hash from the config.
    pub fn generate_signing_key_pair_from_config(
        &self,
    ) -> Result<ProviderKeyPair<P>, ProviderError> {
        self.generate_signing_key_pair(self.config.key_gen_options())
    }

    fn generate(
        &self,
        algorithm: KeyAlgorithm,
        options: KeyGenOptions,
    ) -> Result<ProviderKeyPair<P>, ProviderError> {
        let params = KeyGenParams::new(algorithm, options.modulus_bits, options.hash);
        debug!(%algorithm, modulus_bits = options.modulus_bits, hash = %options.hash, "requesting key pair");
        self.provider.generate_key_pair(&params)
    }

    pub fn to_pem(&self, pair: &ProviderKeyPair<P>) -> Result<PemKeyPair, ProviderError> {
        Ok(PemKeyPair {
            private_key: self.private_key_to_pem(&pair.private_key)?,
            public_key: self.public_key_to_pem(&pair.public_key)?,
        })
    }

    pub fn private_key_to_pem(&self, key: &P::PrivateKey) -> Result<String, ProviderError> {
        let der = self.provider.export_private_key(key)?;
        Ok(encode_pem(der.as_bytes(), PRIVATE_LABEL))
    }

    pub fn public_key_to_pem(&self, key: &P::PublicKey) -> Result<String, ProviderError> {
        let der = self.provider.export_public_key(key)?;
        Ok(encode_pem(der.as_bytes(), PUBLIC_LABEL))
    }

    pub fn import_private_key_pem(
        &self,
        pem: &str,
        params: &KeyImportParams,
    ) -> Result<P::PrivateKey, KeyServiceError> {
        let der = KeyMaterial::new(decode_pem_with_label(pem, PRIVATE_LABEL)?);
        Ok(self.provider.import_private_key(&der, params)?)
    }

    pub fn import_public_key_pem(
        &self,
        pem: &str,
        params: &KeyImportParams,
    ) -> Result<P::PublicKey, KeyServiceError> {
        let der = KeyMaterial::new(decode_pem_with_label(pem, PUBLIC_LABEL)?);
        Ok(self.provider.import_public_key(&der, params)?)
    }

    /// Signs with the configured signature algorithm.
    pub fn sign(&self, key: &P::PrivateKey, data: &[u8]) -> Result<Signature, ProviderError> {
        self.sign_with(self.config.signature_algorithm, key, data)
    }

    pub fn sign_with(
        &self,
        algorithm: KeyAlgorithm,
        key: &P::PrivateKey,
        data: &[u8],
    ) -> Result<Signature, ProviderError> {
        self.provider.sign(algorithm, key, data).map(Signature::from)
    }

    pub fn verify(
        &self,
        key: &P::PublicKey,
        signature: &Signature,
        data: &[u8],
    ) -> Result<bool, ProviderError> {
        self.verify_with(self.config.signature_algorithm, key, signature, data)
    }

    pub fn verify_with(
        &self,
        algorithm: KeyAlgorithm,
        key: &P::PublicKey,
        signature: &Signature,
        data: &[u8],
    ) -> Result<bool, ProviderError> {
        self.provider
            .verify(algorithm, key, signature.as_bytes(), data)
    }

    pub fn encrypt(&self, key: &P::PublicKey, data: &[u8]) -> Result<Vec<u8>, ProviderError> {
        self.provider.encrypt(key, data)
    }

    pub fn decrypt(&self, key: &P::PrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>, ProviderError> {
        self.provider.decrypt(key, ciphertext)
    }
}
