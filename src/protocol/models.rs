//! License records and validation reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A license as handed to and returned by callers.
///
/// `signature` is detached: it covers the canonical encoding of every other
/// field and is absent until the license has been signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct License {
    /// Identifier assigned by the authority at issuance or renewal.
    pub license_id: String,

    /// Opaque identifier of the license holder.
    pub customer: String,

    /// Entitlement identifiers granted by this license.
    pub modules: Vec<String>,

    /// When this version of the license was created.
    pub issued_at: DateTime<Utc>,

    /// Instant after which the license is no longer valid.
    pub expires_at: DateTime<Utc>,

    /// `license_id` of the license this one supersedes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renewed_from: Option<String>,

    /// Detached signature over the canonical encoding of the other fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl License {
    /// Separate the signed fields from the signature.
    pub fn split(&self) -> (LicenseDraft, Option<&str>) {
        let draft = LicenseDraft {
            license_id: self.license_id.clone(),
            customer: self.customer.clone(),
            modules: self.modules.clone(),
            issued_at: self.issued_at,
            expires_at: self.expires_at,
            renewed_from: self.renewed_from.clone(),
        };
        (draft, self.signature.as_deref())
    }

    /// The signature, if present and non-empty.
    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Whether this license was produced by a renewal.
    pub fn is_renewal(&self) -> bool {
        self.renewed_from.is_some()
    }
}

/// The signed payload of a license: every field except the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseDraft {
    /// See [`License::license_id`].
    pub license_id: String,
    /// See [`License::customer`].
    pub customer: String,
    /// See [`License::modules`].
    pub modules: Vec<String>,
    /// See [`License::issued_at`].
    pub issued_at: DateTime<Utc>,
    /// See [`License::expires_at`].
    pub expires_at: DateTime<Utc>,
    /// See [`License::renewed_from`].
    pub renewed_from: Option<String>,
}

impl LicenseDraft {
    /// Attach a signature, producing a complete license.
    pub fn seal(self, signature: String) -> License {
        License {
            license_id: self.license_id,
            customer: self.customer,
            modules: self.modules,
            issued_at: self.issued_at,
            expires_at: self.expires_at,
            renewed_from: self.renewed_from,
            signature: Some(signature),
        }
    }
}

/// Outcome of validating a license.
///
/// An invalid or expired license is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// `signature_valid && !expired`.
    pub valid: bool,

    /// Whether the verifier accepted the signature. `false` when the verifier
    /// could not be reached.
    pub signature_valid: bool,

    /// Whether the evaluation time is strictly after `expires_at`.
    pub expired: bool,

    /// Time the expiry check was evaluated against.
    pub checked_at: DateTime<Utc>,

    /// The license that was checked, echoed back unchanged.
    pub license: License,
}
