//! Utility modules.

/// Username, domain and password derivation for new accounts.
pub mod generator;
