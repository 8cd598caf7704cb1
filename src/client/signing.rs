//! Signing client: canonicalizes drafts and calls the signing backend.
//!
//! The two calls deliberately fail differently:
//! - `sign` fails loud: any backend failure becomes `SigningUnavailable`.
//! - `verify` fails closed: any failure becomes `false`, never an error.

use crate::client::backend::SigningBackend;
use crate::config::DEFAULT_TIMEOUT;
use crate::crypto::{canonical, digest::fingerprint};
use crate::errors::SignerFault;
use crate::protocol::models::LicenseDraft;
use crate::LicensorError;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Timeout-bounded wrapper around a [`SigningBackend`].
#[derive(Debug, Clone)]
pub struct SigningClient<B> {
    backend: B,
    timeout: Duration,
}

impl<B: SigningBackend> SigningClient<B> {
    /// Wrap a backend with the default 30 second bound.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the bound applied to every backend call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The bound applied to every backend call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The wrapped backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Sign the canonical encoding of a draft.
    ///
    /// # Errors
    /// * `InvalidRequest` - The draft cannot be canonicalized
    /// * `SigningUnavailable` - Transport failure, non-2xx, malformed body, or timeout
    pub async fn sign(&self, draft: &LicenseDraft) -> Result<String, LicensorError> {
        self.sign_before(draft, Instant::now() + self.timeout).await
    }

    /// Sign like [`sign`](Self::sign), giving up at `deadline` instead of
    /// after one timeout period.
    ///
    /// A missed deadline is reported as `SignerFault::Timeout` carrying the
    /// configured bound.
    pub async fn sign_before(
        &self,
        draft: &LicenseDraft,
        deadline: Instant,
    ) -> Result<String, LicensorError> {
        let payload = canonical::encode(draft)?;
        debug!(
            license_id = %draft.license_id,
            payload = %fingerprint(&payload),
            "signing license payload"
        );

        let outcome = tokio::time::timeout_at(deadline, self.backend.sign(&payload)).await;
        let result = match outcome {
            Ok(Ok(signature)) if !signature.trim().is_empty() => Ok(signature),
            Ok(Ok(_)) => Err(SignerFault::MalformedResponse(
                "signer returned an empty signature".to_string(),
            )),
            Ok(Err(fault)) => Err(fault),
            Err(_) => Err(SignerFault::Timeout(self.timeout)),
        };

        result.map_err(|cause| {
            warn!(license_id = %draft.license_id, error = %cause, "license signing failed");
            LicensorError::SigningUnavailable { cause }
        })
    }

    /// Verify a detached signature over the canonical encoding of a draft.
    ///
    /// Returns `false` when the signature does not match and also when the
    /// verifier cannot be consulted at all.
    pub async fn verify(&self, draft: &LicenseDraft, signature: &str) -> bool {
        self.verify_before(draft, signature, Instant::now() + self.timeout).await
    }

    /// Verify like [`verify`](Self::verify), failing closed at `deadline`.
    pub async fn verify_before(
        &self,
        draft: &LicenseDraft,
        signature: &str,
        deadline: Instant,
    ) -> bool {
        let payload = match canonical::encode(draft) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(license_id = %draft.license_id, error = %e, "verification failed closed");
                return false;
            }
        };

        let outcome =
            tokio::time::timeout_at(deadline, self.backend.verify(&payload, signature)).await;
        match outcome {
            Ok(Ok(valid)) => {
                debug!(
                    license_id = %draft.license_id,
                    payload = %fingerprint(&payload),
                    valid,
                    "license signature checked"
                );
                valid
            }
            Ok(Err(fault)) => {
                warn!(license_id = %draft.license_id, error = %fault, "verification failed closed");
                false
            }
            Err(_) => {
                warn!(
                    license_id = %draft.license_id,
                    timeout = ?self.timeout,
                    "verification timed out, failing closed"
                );
                false
            }
        }
    }
}
