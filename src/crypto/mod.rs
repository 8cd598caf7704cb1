//! Canonical encoding, payload fingerprints, and the in-memory signer.

pub mod canonical;
pub mod digest;
pub mod local;
