//! License policy: expiration and request preconditions.

pub mod expiry;
pub mod preconditions;
