use std::fmt;

use rand_core::OsRng;
use rsa::pkcs1v15::{Signature as Pkcs1v15Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::{Sha256, Sha384, Sha512};
use tracing::{debug, info, warn};

use crate::domain::key::{
    HashAlgorithm, KeyAlgorithm, KeyGenParams, KeyImportParams, KeyMaterial, KeyPair, KeyUsage,
};
use crate::port::crypto_provider::{CryptoProvider, ProviderError};

pub const MIN_MODULUS_BITS: usize = 1024;
pub const MAX_MODULUS_BITS: usize = 4096;

/// Private half of an RSA key pair, bound to one algorithm and hash.
#[derive(Clone)]
pub struct RsaPrivateCryptoKey {
    key: RsaPrivateKey,
    algorithm: KeyAlgorithm,
    hash: HashAlgorithm,
    usages: Vec<KeyUsage>,
}

impl RsaPrivateCryptoKey {
    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    pub fn hash(&self) -> HashAlgorithm {
        self.hash
    }

    pub fn usages(&self) -> &[KeyUsage] {
        &self.usages
    }

    pub fn modulus_bits(&self) -> usize {
        self.key.size() * 8
    }
}

impl fmt::Debug for RsaPrivateCryptoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateCryptoKey")
            .field("algorithm", &self.algorithm)
            .field("hash", &self.hash)
            .field("usages", &self.usages)
            .field("modulus_bits", &self.modulus_bits())
            .finish_non_exhaustive()
    }
}

impl PartialEq for RsaPrivateCryptoKey {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

/// Public half of an RSA key pair.
#[derive(Debug, Clone, PartialEq)]
pub struct RsaPublicCryptoKey {
    key: RsaPublicKey,
    algorithm: KeyAlgorithm,
    hash: HashAlgorithm,
    usages: Vec<KeyUsage>,
}

impl RsaPublicCryptoKey {
    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    pub fn hash(&self) -> HashAlgorithm {
        self.hash
    }

    pub fn usages(&self) -> &[KeyUsage] {
        &self.usages
    }

    pub fn modulus_bits(&self) -> usize {
        self.key.size() * 8
    }
}

/// `CryptoProvider` backed by the RustCrypto `rsa` crate and the OS RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RsaCryptoProvider;

impl RsaCryptoProvider {
    pub fn new() -> Self {
        Self
    }

    fn validate(params: &KeyGenParams) -> Result<(), ProviderError> {
        if params.modulus_bits % 8 != 0
            || !(MIN_MODULUS_BITS..=MAX_MODULUS_BITS).contains(&params.modulus_bits)
        {
            return Err(ProviderError::InvalidParameters(format!(
                "modulus length must be a multiple of 8 in {MIN_MODULUS_BITS}..={MAX_MODULUS_BITS}, got {}",
                params.modulus_bits
            )));
        }

        match params.public_exponent.last() {
            Some(last) if last & 1 == 1 => {}
            _ => {
                return Err(ProviderError::InvalidParameters(
                    "public exponent must be a non-empty odd integer".to_string(),
                ))
            }
        }

        if params.usages.is_empty() {
            return Err(ProviderError::InvalidParameters(
                "at least one key usage is required".to_string(),
            ));
        }
        let allowed = params.algorithm.allowed_usages();
        if let Some(usage) = params.usages.iter().find(|u| !allowed.contains(*u)) {
            return Err(ProviderError::InvalidParameters(format!(
                "usage {usage} is not valid for {}",
                params.algorithm
            )));
        }
        Ok(())
    }
}

fn check_access(
    usage: KeyUsage,
    requested: Option<KeyAlgorithm>,
    algorithm: KeyAlgorithm,
    usages: &[KeyUsage],
) -> Result<(), ProviderError> {
    if let Some(requested) = requested {
        if requested != algorithm {
            warn!(%requested, key_algorithm = %algorithm, "rejected algorithm mismatch");
            return Err(ProviderError::InvalidAccess(format!(
                "{requested} requested with a {algorithm} key"
            )));
        }
    }
    if !usages.contains(&usage) {
        warn!(%usage, key_algorithm = %algorithm, "rejected key usage");
        return Err(ProviderError::InvalidAccess(format!(
            "key does not allow {usage}"
        )));
    }
    Ok(())
}

fn split_usages(usages: &[KeyUsage]) -> (Vec<KeyUsage>, Vec<KeyUsage>) {
    usages.iter().partition(|u| u.is_private())
}

fn oaep(hash: HashAlgorithm) -> Oaep {
    match hash {
        HashAlgorithm::Sha256 => Oaep::new::<Sha256>(),
        HashAlgorithm::Sha384 => Oaep::new::<Sha384>(),
        HashAlgorithm::Sha512 => Oaep::new::<Sha512>(),
    }
}

fn pkcs1v15_sign(
    key: &RsaPrivateKey,
    hash: HashAlgorithm,
    data: &[u8],
) -> Result<Pkcs1v15Signature, rsa::signature::Error> {
    match hash {
        HashAlgorithm::Sha256 => SigningKey::<Sha256>::new(key.clone()).try_sign(data),
        HashAlgorithm::Sha384 => SigningKey::<Sha384>::new(key.clone()).try_sign(data),
        HashAlgorithm::Sha512 => SigningKey::<Sha512>::new(key.clone()).try_sign(data),
    }
}

fn pkcs1v15_verify(
    key: &RsaPublicKey,
    hash: HashAlgorithm,
    signature: &Pkcs1v15Signature,
    data: &[u8],
) -> Result<(), rsa::signature::Error> {
    match hash {
        HashAlgorithm::Sha256 => VerifyingKey::<Sha256>::new(key.clone()).verify(data, signature),
        HashAlgorithm::Sha384 => VerifyingKey::<Sha384>::new(key.clone()).verify(data, signature),
        HashAlgorithm::Sha512 => VerifyingKey::<Sha512>::new(key.clone()).verify(data, signature),
    }
}

impl CryptoProvider for RsaCryptoProvider {
    type PrivateKey = RsaPrivateCryptoKey;
    type PublicKey = RsaPublicCryptoKey;

    fn generate_key_pair(
        &self,
        params: &KeyGenParams,
    ) -> Result<KeyPair<Self::PrivateKey, Self::PublicKey>, ProviderError> {
        Self::validate(params)?;

        let exponent = BigUint::from_bytes_be(&params.public_exponent);
        let key = RsaPrivateKey::new_with_exp(&mut OsRng, params.modulus_bits, &exponent)
            .map_err(|e| ProviderError::KeyGeneration(e.to_string()))?;
        let public = key.to_public_key();

        info!(
            algorithm = %params.algorithm,
            modulus_bits = params.modulus_bits,
            hash = %params.hash,
            "generated RSA key pair"
        );

        let (private_usages, public_usages) = split_usages(&params.usages);
        Ok(KeyPair {
            private_key: RsaPrivateCryptoKey {
                key,
                algorithm: params.algorithm,
                hash: params.hash,
                usages: private_usages,
            },
            public_key: RsaPublicCryptoKey {
                key: public,
                algorithm: params.algorithm,
                hash: params.hash,
                usages: public_usages,
            },
        })
    }

    fn export_private_key(&self, key: &Self::PrivateKey) -> Result<KeyMaterial, ProviderError> {
        let document = key
            .key
            .to_pkcs8_der()
            .map_err(|e| ProviderError::Export(e.to_string()))?;
        Ok(KeyMaterial::new(document.as_bytes().to_vec()))
    }

    fn export_public_key(&self, key: &Self::PublicKey) -> Result<KeyMaterial, ProviderError> {
        let document = key
            .key
            .to_public_key_der()
            .map_err(|e| ProviderError::Export(e.to_string()))?;
        Ok(KeyMaterial::new(document.as_bytes().to_vec()))
    }

    fn import_private_key(
        &self,
        der: &KeyMaterial,
        params: &KeyImportParams,
    ) -> Result<Self::PrivateKey, ProviderError> {
        let key = RsaPrivateKey::from_pkcs8_der(der.as_bytes())
            .map_err(|e| ProviderError::Import(e.to_string()))?;
        debug!(algorithm = %params.algorithm, hash = %params.hash, "imported private key");

        let (usages, _) = split_usages(params.algorithm.allowed_usages());
        Ok(RsaPrivateCryptoKey {
            key,
            algorithm: params.algorithm,
            hash: params.hash,
            usages,
        })
    }

    fn import_public_key(
        &self,
        der: &KeyMaterial,
        params: &KeyImportParams,
    ) -> Result<Self::PublicKey, ProviderError> {
        let key = RsaPublicKey::from_public_key_der(der.as_bytes())
            .map_err(|e| ProviderError::Import(e.to_string()))?;
        debug!(algorithm = %params.algorithm, hash = %params.hash, "imported public key");

        let (_, usages) = split_usages(params.algorithm.allowed_usages());
        Ok(RsaPublicCryptoKey {
            key,
            algorithm: params.algorithm,
            hash: params.hash,
            usages,
        })
    }

    fn sign(
        &self,
        algorithm: KeyAlgorithm,
        key: &Self::PrivateKey,
        data: &[u8],
    ) -> Result<Vec<u8>, ProviderError> {
        check_access(KeyUsage::Sign, Some(algorithm), key.algorithm, &key.usages)?;
        debug!(%algorithm, hash = %key.hash, len = data.len(), "signing");

        let signature = pkcs1v15_sign(&key.key, key.hash, data)
            .map_err(|e| ProviderError::Operation(e.to_string()))?;
        Ok(signature.to_vec())
    }

    fn verify(
        &self,
        algorithm: KeyAlgorithm,
        key: &Self::PublicKey,
        signature: &[u8],
        data: &[u8],
    ) -> Result<bool, ProviderError> {
        check_access(KeyUsage::Verify, Some(algorithm), key.algorithm, &key.usages)?;
        debug!(%algorithm, hash = %key.hash, len = data.len(), "verifying");

        let Ok(signature) = Pkcs1v15Signature::try_from(signature) else {
            return Ok(false);
        };
        Ok(pkcs1v15_verify(&key.key, key.hash, &signature, data).is_ok())
    }

    fn encrypt(&self, key: &Self::PublicKey, data: &[u8]) -> Result<Vec<u8>, ProviderError> {
        check_access(KeyUsage::Encrypt, None, key.algorithm, &key.usages)?;
        debug!(hash = %key.hash, len = data.len(), "encrypting");

        key.key
            .encrypt(&mut OsRng, oaep(key.hash), data)
            .map_err(|e| ProviderError::Operation(e.to_string()))
    }

    fn decrypt(&self, key: &Self::PrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>, ProviderError> {
        check_access(KeyUsage::Decrypt, None, key.algorithm, &key.usages)?;
        debug!(hash = %key.hash, len = ciphertext.len(), "decrypting");

        key.key
            .decrypt(oaep(key.hash), ciphertext)
            .map_err(|e| ProviderError::Operation(e.to_string()))
    }
}
