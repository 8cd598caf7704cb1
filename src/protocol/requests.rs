//! Request bodies as received from the API layer.
//!
//! Every field is optional on the wire so that a missing field is reported
//! as `InvalidRequest` naming it, instead of a generic parse failure.

use crate::policy::expiry::parse_timestamp;
use crate::protocol::models::License;
use crate::LicensorError;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Body of an issue request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueRequest {
    /// License holder.
    pub customer: Option<String>,
    /// Entitlements to grant.
    pub modules: Option<Vec<String>>,
    /// Expiry, RFC 3339 or `YYYY-MM-DD`.
    pub expires_at: Option<String>,
}

/// Body of a validate request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidateRequest {
    /// The license to check, including its signature.
    pub license: Option<License>,
}

/// Body of a renew request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenewRequest {
    /// The license being renewed, including its signature.
    pub license: Option<License>,
    /// Expiry of the new license, RFC 3339 or `YYYY-MM-DD`.
    pub new_expires_at: Option<String>,
}

/// Validated issue parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueParams {
    /// License holder.
    pub customer: String,
    /// Entitlements to grant.
    pub modules: Vec<String>,
    /// Expiry.
    pub expires_at: DateTime<Utc>,
}

impl IssueRequest {
    /// Check presence of every field and parse the expiry.
    pub fn into_params(self) -> Result<IssueParams, LicensorError> {
        let mut missing = Vec::new();
        if self.customer.is_none() {
            missing.push("customer");
        }
        if self.modules.is_none() {
            missing.push("modules");
        }
        if self.expires_at.is_none() {
            missing.push("expires_at");
        }

        match (self.customer, self.modules, self.expires_at) {
            (Some(customer), Some(modules), Some(expires_at)) => Ok(IssueParams {
                customer,
                modules,
                expires_at: parse_timestamp("expires_at", &expires_at)?,
            }),
            _ => Err(missing_fields(&missing)),
        }
    }
}

impl ValidateRequest {
    /// Extract the license, which must be present.
    pub fn into_license(self) -> Result<License, LicensorError> {
        self.license.ok_or_else(|| missing_fields(&["license"]))
    }
}

impl RenewRequest {
    /// Extract the license and parse the new expiry.
    pub fn into_parts(self) -> Result<(License, DateTime<Utc>), LicensorError> {
        match (self.license, self.new_expires_at) {
            (Some(license), Some(raw)) => {
                Ok((license, parse_timestamp("new_expires_at", &raw)?))
            }
            (None, None) => Err(missing_fields(&["license", "new_expires_at"])),
            (None, Some(_)) => Err(missing_fields(&["license"])),
            (Some(_), None) => Err(missing_fields(&["new_expires_at"])),
        }
    }
}

/// Parse a JSON request body.
pub fn parse_request<T: DeserializeOwned>(body: &[u8]) -> Result<T, LicensorError> {
    serde_json::from_slice(body)
        .map_err(|e| LicensorError::InvalidRequest(format!("Malformed request body: {}", e)))
}

fn missing_fields(fields: &[&str]) -> LicensorError {
    LicensorError::InvalidRequest(format!("Missing required fields: {}", fields.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_request_complete() {
        let request: IssueRequest = parse_request(
            br#"{"customer":"acme","modules":["core","api"],"expires_at":"2027-01-01"}"#,
        )
        .unwrap();
        let params = request.into_params().unwrap();
        assert_eq!(params.customer, "acme");
        assert_eq!(params.modules, vec!["core", "api"]);
        assert_eq!(params.expires_at.to_rfc3339(), "2027-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_issue_request_lists_every_missing_field() {
        let request: IssueRequest = parse_request(br#"{"customer":"acme"}"#).unwrap();
        match request.into_params() {
            Err(LicensorError::InvalidRequest(msg)) => {
                assert_eq!(msg, "Missing required fields: modules, expires_at");
            }
            other => panic!("expected InvalidRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_issue_request_bad_expiry() {
        let request: IssueRequest =
            parse_request(br#"{"customer":"acme","modules":["core"],"expires_at":"soon"}"#)
                .unwrap();
        assert!(matches!(
            request.into_params(),
            Err(LicensorError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_validate_request_without_license() {
        let request: ValidateRequest = parse_request(b"{}").unwrap();
        assert!(matches!(
            request.into_license(),
            Err(LicensorError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_renew_request_missing_expiry() {
        let request: RenewRequest = parse_request(
            br#"{"license":{"license_id":"a","customer":"acme","modules":["core"],
                "issued_at":"2025-01-01T00:00:00Z","expires_at":"2026-01-01T00:00:00Z",
                "signature":"sig"}}"#,
        )
        .unwrap();
        match request.into_parts() {
            Err(LicensorError::InvalidRequest(msg)) => assert!(msg.contains("new_expires_at")),
            other => panic!("expected InvalidRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_body() {
        let result = parse_request::<IssueRequest>(b"not json");
        assert!(matches!(result, Err(LicensorError::InvalidRequest(_))));
    }

    #[test]
    fn test_malformed_license_timestamp_is_invalid_request() {
        let result = parse_request::<ValidateRequest>(
            br#"{"license":{"license_id":"a","customer":"acme","modules":["core"],
                "issued_at":"yesterday","expires_at":"2026-01-01T00:00:00Z",
                "signature":"sig"}}"#,
        );
        assert!(matches!(result, Err(LicensorError::InvalidRequest(_))));
    }
}
