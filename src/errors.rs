//! Licensor error types.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while issuing, validating or renewing a license.
#[derive(Debug, Error)]
pub enum LicensorError {
    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Caller input is malformed or incomplete.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The supplied license failed signature verification.
    #[error("Cannot renew invalid license")]
    InvalidLicense,

    /// The external signer could not produce a signature.
    #[error("Signing unavailable: {cause}")]
    SigningUnavailable {
        /// Underlying signer failure.
        #[source]
        cause: SignerFault,
    },

    /// A diagnostic call against the key-management service failed.
    #[error("Key management error: {0}")]
    KeyManagement(#[source] SignerFault),
}

impl LicensorError {
    /// Whether the caller may reasonably retry the same request later.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::SigningUnavailable { cause } | Self::KeyManagement(cause) => cause.is_transient(),
            _ => false,
        }
    }
}

/// Failure talking to a signing backend.
///
/// Messages never carry the signer address or the credential.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerFault {
    /// The request never produced an HTTP response.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The call did not complete within the configured bound.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The signer answered with a non-success status.
    #[error("signer returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// First error message reported by the signer, if any.
        message: String,
    },

    /// The signer answered 2xx but the body was not what we expected.
    #[error("malformed signer response: {0}")]
    MalformedResponse(String),

    /// Local key material is unusable.
    #[error("key error: {0}")]
    Key(String),
}

impl SignerFault {
    /// Transient faults are worth retrying; the rest point at misconfiguration.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::MalformedResponse(_) | Self::Key(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_faults_are_retryable() {
        let err = LicensorError::SigningUnavailable {
            cause: SignerFault::Timeout(Duration::from_secs(1)),
        };
        assert!(err.is_retryable());

        let err = LicensorError::SigningUnavailable {
            cause: SignerFault::Status {
                status: 503,
                message: "sealed".to_string(),
            },
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn misconfiguration_is_not_retryable() {
        let err = LicensorError::SigningUnavailable {
            cause: SignerFault::Status {
                status: 403,
                message: "permission denied".to_string(),
            },
        };
        assert!(!err.is_retryable());
        assert!(!LicensorError::InvalidLicense.is_retryable());
        assert!(!LicensorError::InvalidRequest("customer".into()).is_retryable());
    }

    #[test]
    fn signing_unavailable_carries_cause_in_message() {
        let err = LicensorError::SigningUnavailable {
            cause: SignerFault::Transport("connection refused".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Signing unavailable: transport failure: connection refused"
        );
    }
}
