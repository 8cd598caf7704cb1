//! Canonical encoding of a license for signing and verification.
//!
//! The signer compares raw bytes, so the encoding is fixed:
//! ```text
//! {"license_id":..,"customer":..,"modules":[..],"issued_at":..,
//!  "expires_at":..[,"renewed_from":..]}
//! ```
//! - Compact JSON, fields in exactly this order
//! - Timestamps in UTC, RFC 3339 with `Z` and only the fractional digits needed
//! - `renewed_from` present only on renewals
//! - The signature is never part of its own payload

use crate::protocol::models::LicenseDraft;
use crate::LicensorError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

#[derive(Serialize)]
struct CanonicalLicense<'a> {
    license_id: &'a str,
    customer: &'a str,
    modules: &'a [String],
    issued_at: String,
    expires_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    renewed_from: Option<&'a str>,
}

/// Encode a draft into the bytes that get signed.
pub fn encode(draft: &LicenseDraft) -> Result<Vec<u8>, LicensorError> {
    let canonical = CanonicalLicense {
        license_id: &draft.license_id,
        customer: &draft.customer,
        modules: &draft.modules,
        issued_at: canonical_timestamp(&draft.issued_at),
        expires_at: canonical_timestamp(&draft.expires_at),
        renewed_from: draft.renewed_from.as_deref(),
    };

    serde_json::to_vec(&canonical).map_err(|e| {
        LicensorError::InvalidRequest(format!("License cannot be canonicalized: {}", e))
    })
}

/// Render a timestamp the way the canonical encoding does.
pub fn canonical_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
