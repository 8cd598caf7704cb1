//! Capability interface for the external signer/verifier.

use crate::errors::SignerFault;
use async_trait::async_trait;
use std::sync::Arc;

/// An asymmetric-key signer/verifier that works on raw payload bytes.
///
/// Implementations report every failure as a [`SignerFault`]; deciding
/// whether that failure is loud (sign) or closed (verify) belongs to
/// [`SigningClient`](crate::client::signing::SigningClient).
#[async_trait]
pub trait SigningBackend: Send + Sync {
    /// Produce a detached signature over `payload`.
    async fn sign(&self, payload: &[u8]) -> Result<String, SignerFault>;

    /// Check a detached signature over `payload`.
    async fn verify(&self, payload: &[u8], signature: &str) -> Result<bool, SignerFault>;
}

#[async_trait]
impl<B: SigningBackend + ?Sized> SigningBackend for Arc<B> {
    async fn sign(&self, payload: &[u8]) -> Result<String, SignerFault> {
        (**self).sign(payload).await
    }

    async fn verify(&self, payload: &[u8], signature: &str) -> Result<bool, SignerFault> {
        (**self).verify(payload, signature).await
    }
}
