//! Log sanitization utilities
//!
//! Keeps passwords, API tokens and oversized response bodies out of
//! debug/error logs.

/// Maximum number of characters to include in truncated log output.
const TRUNCATE_LIMIT: usize = 256;

/// Parameter names whose values never reach the logs.
const SECRET_PARAMS: &[&str] = &["password", "pass", "token"];

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a string for safe logging.
///
/// Returns the original string if it's within the limit,
/// otherwise returns the first `TRUNCATE_LIMIT` characters with a suffix
/// indicating the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Mask a secret, keeping only its first two characters.
pub fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(2).collect();
    if secret.chars().count() <= 2 {
        "***".to_string()
    } else {
        format!("{visible}***")
    }
}

/// Render request parameters for logging with secret values masked.
pub fn params_for_log<'a>(params: impl IntoIterator<Item = (&'a String, &'a String)>) -> String {
    params
        .into_iter()
        .map(|(k, v)| {
            if SECRET_PARAMS.contains(&k.as_str()) {
                format!("{k}={}", mask_secret(v))
            } else {
                format!("{k}={v}")
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}
