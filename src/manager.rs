//! License Authority - the main public API for Licensor.
//!
//! The `LicenseAuthority` implements the license lifecycle:
//! - Issue: build a draft, sign its canonical encoding, attach the signature
//! - Validate: re-verify the signature and evaluate expiry
//! - Renew: re-verify the old license, then sign a successor pointing back at it
//!
//! Every operation is stateless; the caller holds issued licenses between calls.

use crate::client::backend::SigningBackend;
use crate::client::signing::SigningClient;
use crate::client::vault::VaultTransitClient;
use crate::clock::{Clock, SystemClock};
use crate::config::LicensorConfig;
use crate::policy::expiry::check_expiry;
use crate::policy::preconditions::{check_issue_inputs, require_signature};
use crate::protocol::models::{License, LicenseDraft, ValidationReport};
use crate::protocol::requests::{IssueRequest, RenewRequest, ValidateRequest};
use crate::LicensorError;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

/// Issues, validates and renews signed licenses.
///
/// Create one instance per signer and share it; it holds no per-license state.
pub struct LicenseAuthority<B> {
    signer: SigningClient<B>,
    clock: Arc<dyn Clock>,
}

impl LicenseAuthority<VaultTransitClient> {
    /// Create an authority backed by the Vault transit engine described by `config`.
    ///
    /// # Errors
    /// Returns `ConfigError` if the configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn from_config(config: &LicensorConfig) -> Result<Self, LicensorError> {
        let backend = VaultTransitClient::new(config)?;
        Ok(Self::new(backend).with_timeout(config.timeout))
    }
}

impl<B: SigningBackend> LicenseAuthority<B> {
    /// Create an authority over any signing backend, using the system clock.
    pub fn new(backend: B) -> Self {
        Self::with_clock(backend, Arc::new(SystemClock))
    }

    /// Create an authority with a custom clock.
    pub fn with_clock(backend: B, clock: Arc<dyn Clock>) -> Self {
        Self {
            signer: SigningClient::new(backend),
            clock,
        }
    }

    /// Bound every operation by `timeout`.
    ///
    /// `issue` and `validate` make one backend call each. `renew` makes two,
    /// verify then sign, and both share a single deadline of `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.signer = self.signer.with_timeout(timeout);
        self
    }

    /// The signing client used by this authority.
    pub fn signer(&self) -> &SigningClient<B> {
        &self.signer
    }

    /// Issue a new signed license.
    ///
    /// # Errors
    /// - `InvalidRequest` - Blank customer, no modules, or a blank module
    /// - `SigningUnavailable` - The signer could not produce a signature
    pub async fn issue(
        &self,
        customer: &str,
        modules: &[String],
        expires_at: DateTime<Utc>,
    ) -> Result<License, LicensorError> {
        check_issue_inputs(customer, modules)?;

        let now = self.clock.now_utc();
        if expires_at <= now {
            warn!(%customer, %expires_at, "issuing a license that is already expired");
        }

        let draft = LicenseDraft {
            license_id: new_license_id(),
            customer: customer.to_string(),
            modules: modules.to_vec(),
            issued_at: now,
            expires_at,
            renewed_from: None,
        };

        let signature = self.signer.sign(&draft).await?;
        let license = draft.seal(signature);

        info!(
            license_id = %license.license_id,
            customer = %license.customer,
            expires_at = %license.expires_at,
            "license issued"
        );
        Ok(license)
    }

    /// Check a license's signature and expiry.
    ///
    /// An unauthentic or expired license is reported in the result, not as
    /// an error. A verifier that cannot be reached yields
    /// `signature_valid = false`.
    ///
    /// # Errors
    /// - `InvalidRequest` - The license carries no signature
    pub async fn validate(&self, license: &License) -> Result<ValidationReport, LicensorError> {
        let signature = require_signature(license)?;
        let (draft, _) = license.split();

        let signature_valid = self.signer.verify(&draft, signature).await;
        let (expired, checked_at) = check_expiry(license.expires_at, self.clock.as_ref());

        Ok(ValidationReport {
            valid: signature_valid && !expired,
            signature_valid,
            expired,
            checked_at,
            license: license.clone(),
        })
    }

    /// Renew a license, producing a new license that points back at it.
    ///
    /// The existing license must verify; its expiry is not checked, so an
    /// expired but authentic license can be renewed. The existing license
    /// is not modified.
    ///
    /// Verification and signing together finish within the configured
    /// timeout. A verifier that uses up the deadline leaves the signer none,
    /// and the renewal fails with `SigningUnavailable`.
    ///
    /// # Errors
    /// - `InvalidRequest` - The license carries no signature
    /// - `InvalidLicense` - The existing signature did not verify
    /// - `SigningUnavailable` - The signer could not sign the successor
    pub async fn renew(
        &self,
        license: &License,
        new_expires_at: DateTime<Utc>,
    ) -> Result<License, LicensorError> {
        let signature = require_signature(license)?;
        let (previous, _) = license.split();
        let deadline = Instant::now() + self.signer.timeout();

        if !self.signer.verify_before(&previous, signature, deadline).await {
            warn!(license_id = %license.license_id, "refusing to renew unverified license");
            return Err(LicensorError::InvalidLicense);
        }

        let now = self.clock.now_utc();
        if new_expires_at <= now {
            warn!(
                license_id = %license.license_id,
                %new_expires_at,
                "renewing to an expiry that has already passed"
            );
        }

        let draft = LicenseDraft {
            license_id: new_license_id(),
            issued_at: now,
            expires_at: new_expires_at,
            renewed_from: Some(previous.license_id.clone()),
            ..previous
        };

        let signature = self.signer.sign_before(&draft, deadline).await?;
        let renewed = draft.seal(signature);

        info!(
            license_id = %renewed.license_id,
            renewed_from = renewed.renewed_from.as_deref().unwrap_or_default(),
            chained = license.is_renewal(),
            customer = %renewed.customer,
            expires_at = %renewed.expires_at,
            "license renewed"
        );
        Ok(renewed)
    }

    /// Issue from a wire request.
    pub async fn issue_request(&self, request: IssueRequest) -> Result<License, LicensorError> {
        let params = request.into_params()?;
        self.issue(&params.customer, &params.modules, params.expires_at)
            .await
    }

    /// Validate from a wire request.
    pub async fn validate_request(
        &self,
        request: ValidateRequest,
    ) -> Result<ValidationReport, LicensorError> {
        let license = request.into_license()?;
        self.validate(&license).await
    }

    /// Renew from a wire request.
    pub async fn renew_request(&self, request: RenewRequest) -> Result<License, LicensorError> {
        let (license, new_expires_at) = request.into_parts()?;
        self.renew(&license, new_expires_at).await
    }
}

fn new_license_id() -> String {
    Uuid::new_v4().to_string()
}
