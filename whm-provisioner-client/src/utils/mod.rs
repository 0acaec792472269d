//! Utility modules.

/// Log sanitization utilities to prevent secrets from reaching logs.
pub mod log_sanitizer;
