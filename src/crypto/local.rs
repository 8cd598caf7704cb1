//! In-memory Ed25519 signer.
//!
//! Stands in for the key-management service in tests and offline demos.
//! Signatures are formatted `ed25519:v1:<base64>`.

use crate::client::backend::SigningBackend;
use crate::errors::SignerFault;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;

/// Prefix of every signature produced by [`LocalEd25519Signer`].
pub const SIGNATURE_PREFIX: &str = "ed25519:v1:";

/// Ed25519 signer holding its key in process memory.
pub struct LocalEd25519Signer {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl std::fmt::Debug for LocalEd25519Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalEd25519Signer")
            .field("verifying_key", &self.verifying_key_hex())
            .finish_non_exhaustive()
    }
}

impl LocalEd25519Signer {
    /// Build a signer from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Build a signer from a hex-encoded 32-byte seed.
    pub fn from_seed_hex(hex_seed: &str) -> Result<Self, SignerFault> {
        let bytes = hex::decode(hex_seed.trim())
            .map_err(|e| SignerFault::Key(format!("Invalid seed hex: {}", e)))?;

        let seed: [u8; 32] = bytes
            .try_into()
            .map_err(|_| SignerFault::Key("Seed must be 32 bytes".to_string()))?;

        Ok(Self::from_seed(&seed))
    }

    /// Build a signer with a freshly generated key.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Hex encoding of the public half of the key.
    pub fn verifying_key_hex(&self) -> String {
        hex::encode(self.verifying_key.as_bytes())
    }

    fn decode_signature(signature: &str) -> Option<Signature> {
        let encoded = signature.strip_prefix(SIGNATURE_PREFIX)?;
        let bytes = STANDARD.decode(encoded).ok()?;
        let array: [u8; 64] = bytes.try_into().ok()?;
        Some(Signature::from_bytes(&array))
    }
}

#[async_trait]
impl SigningBackend for LocalEd25519Signer {
    async fn sign(&self, payload: &[u8]) -> Result<String, SignerFault> {
        let signature = self.signing_key.sign(payload);
        Ok(format!(
            "{}{}",
            SIGNATURE_PREFIX,
            STANDARD.encode(signature.to_bytes())
        ))
    }

    async fn verify(&self, payload: &[u8], signature: &str) -> Result<bool, SignerFault> {
        // An undecodable signature is simply not a valid one.
        let Some(signature) = Self::decode_signature(signature) else {
            return Ok(false);
        };
        Ok(self.verifying_key.verify(payload, &signature).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 8032 test vector 1 (DO NOT USE IN PRODUCTION)
    const TEST_SEED_HEX: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
    const TEST_PUBLIC_KEY_HEX: &str =
        "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";

    #[test]
    fn test_from_seed_hex_derives_public_key() {
        let signer = LocalEd25519Signer::from_seed_hex(TEST_SEED_HEX).unwrap();
        assert_eq!(signer.verifying_key_hex(), TEST_PUBLIC_KEY_HEX);
    }

    #[test]
    fn test_from_seed_hex_invalid_hex() {
        let result = LocalEd25519Signer::from_seed_hex("not-valid-hex");
        assert!(matches!(result, Err(SignerFault::Key(_))));
    }

    #[test]
    fn test_from_seed_hex_wrong_length() {
        let result = LocalEd25519Signer::from_seed_hex("0000");
        assert!(matches!(result, Err(SignerFault::Key(_))));
    }

    #[test]
    fn test_debug_hides_private_key() {
        let signer = LocalEd25519Signer::from_seed_hex(TEST_SEED_HEX).unwrap();
        let rendered = format!("{:?}", signer);
        assert!(rendered.contains(TEST_PUBLIC_KEY_HEX));
        assert!(!rendered.contains(TEST_SEED_HEX));
    }

    #[tokio::test]
    async fn test_sign_then_verify() {
        let signer = LocalEd25519Signer::from_seed_hex(TEST_SEED_HEX).unwrap();
        let signature = signer.sign(b"payload").await.unwrap();
        assert!(signature.starts_with(SIGNATURE_PREFIX));
        assert!(signer.verify(b"payload", &signature).await.unwrap());
        assert!(!signer.verify(b"payload!", &signature).await.unwrap());
    }

    #[tokio::test]
    async fn test_signature_from_other_key_rejected() {
        let signer = LocalEd25519Signer::from_seed_hex(TEST_SEED_HEX).unwrap();
        let other = LocalEd25519Signer::generate();
        let signature = other.sign(b"payload").await.unwrap();
        assert!(!signer.verify(b"payload", &signature).await.unwrap());
    }

    #[tokio::test]
    async fn test_garbage_signatures_are_invalid_not_errors() {
        let signer = LocalEd25519Signer::generate();
        for garbage in ["", "vault:v1:abc", "ed25519:v1:!!!", "ed25519:v1:dGVzdA=="] {
            assert!(!signer.verify(b"payload", garbage).await.unwrap());
        }
        let zeros = format!("{}{}", SIGNATURE_PREFIX, STANDARD.encode([0u8; 64]));
        assert!(!signer.verify(b"payload", &zeros).await.unwrap());
    }
}
