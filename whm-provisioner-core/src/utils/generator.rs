//! Derivation of control-panel identifiers and secrets
//!
//! Usernames are the first characters of the platform username plus a short
//! random number. This keeps them under the control panel's length limit and
//! makes collisions between similar platform usernames unlikely, though not
//! impossible.

use rand::Rng;
use rand::distr::Alphanumeric;
use rand::seq::SliceRandom;

use crate::error::{CoreError, CoreResult};

/// Characters kept from the platform username.
pub const USERNAME_PREFIX_LEN: usize = 6;
/// Inclusive range of the numeric username suffix (2 or 3 digits).
pub const USERNAME_SUFFIX_RANGE: std::ops::RangeInclusive<u16> = 10..=999;
/// Minimum password length accepted by `change_password`.
pub const MIN_PASSWORD_LEN: usize = 8;
/// Length of generated passwords unless configured otherwise.
pub const DEFAULT_PASSWORD_LEN: usize = 12;

/// Username prefix derived from a platform username.
///
/// Lower-cased, reduced to ASCII alphanumerics and cut to
/// [`USERNAME_PREFIX_LEN`] characters. Control-panel usernames must start with
/// a letter, so a leading digit gets a `u` in front; an empty result becomes
/// `user`.
pub fn username_prefix(platform_username: &str) -> String {
    let mut cleaned: String = platform_username
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if cleaned.is_empty() {
        cleaned.push_str("user");
    } else if cleaned.starts_with(|c: char| c.is_ascii_digit()) {
        cleaned.insert(0, 'u');
    }

    cleaned.chars().take(USERNAME_PREFIX_LEN).collect()
}

/// Control-panel username for a new account: prefix plus a two or three digit suffix.
pub fn derive_username<R: Rng + ?Sized>(platform_username: &str, rng: &mut R) -> String {
    let suffix = rng.random_range(USERNAME_SUFFIX_RANGE);
    format!("{}{suffix}", username_prefix(platform_username))
}

/// Domain for a new account: the order's domain, else `<username>.com`.
pub fn derive_domain(order_domain: Option<&str>, platform_username: &str) -> String {
    order_domain
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map_or_else(
            || format!("{}.com", platform_username.trim().to_lowercase()),
            ToString::to_string,
        )
}

/// Random alphanumeric password.
///
/// Always contains a digit, a lower-case and an upper-case letter, so it
/// passes [`validate_password`]. Lengths below [`MIN_PASSWORD_LEN`] are raised
/// to it.
pub fn generate_password<R: Rng + ?Sized>(length: usize, rng: &mut R) -> String {
    let length = length.max(MIN_PASSWORD_LEN);

    let mut chars: Vec<char> = vec![
        char::from(b'0' + rng.random_range(0..10u8)),
        char::from(b'a' + rng.random_range(0..26u8)),
        char::from(b'A' + rng.random_range(0..26u8)),
    ];
    chars.extend((0..length - chars.len()).map(|_| char::from(rng.sample(Alphanumeric))));
    chars.shuffle(rng);
    chars.into_iter().collect()
}

/// Password policy for customer-chosen passwords: at least
/// [`MIN_PASSWORD_LEN`] characters and at least one digit.
pub fn validate_password(password: &str) -> CoreResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(CoreError::Validation(
            "Password must contain at least one number".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    // ---- username ----

    #[test]
    fn prefix_is_first_six_chars() {
        assert_eq!(username_prefix("alice123"), "alice1");
    }

    #[test]
    fn prefix_keeps_short_names() {
        assert_eq!(username_prefix("bob"), "bob");
    }

    #[test]
    fn prefix_strips_symbols_and_case() {
        assert_eq!(username_prefix("J.Doe-Smith"), "jdoesm");
    }

    #[test]
    fn prefix_never_starts_with_digit() {
        assert_eq!(username_prefix("42answers"), "u42ans");
    }

    #[test]
    fn prefix_of_empty_name() {
        assert_eq!(username_prefix("@@@"), "user");
    }

    #[test]
    fn derived_username_has_two_or_three_digit_suffix() {
        let mut rng = rng();
        for _ in 0..500 {
            let name = derive_username("alice123", &mut rng);
            let suffix = name.strip_prefix("alice1").unwrap();
            assert!((2..=3).contains(&suffix.len()), "bad suffix in {name}");
            let n: u16 = suffix.parse().unwrap();
            assert!(USERNAME_SUFFIX_RANGE.contains(&n));
        }
    }

    // ---- domain ----

    #[test]
    fn domain_falls_back_to_username() {
        assert_eq!(derive_domain(None, "alice123"), "alice123.com");
        assert_eq!(derive_domain(Some("  "), "alice123"), "alice123.com");
    }

    #[test]
    fn domain_uses_order_domain() {
        assert_eq!(derive_domain(Some("shop.example.org"), "alice123"), "shop.example.org");
    }

    // ---- password ----

    #[test]
    fn generated_password_shape() {
        let mut rng = rng();
        for _ in 0..200 {
            let pw = generate_password(DEFAULT_PASSWORD_LEN, &mut rng);
            assert_eq!(pw.chars().count(), 12);
            assert!(pw.chars().all(|c| c.is_ascii_alphanumeric()));
            assert!(pw.chars().any(|c| c.is_ascii_digit()));
            assert!(pw.chars().any(|c| c.is_ascii_lowercase()));
            assert!(pw.chars().any(|c| c.is_ascii_uppercase()));
            assert!(validate_password(&pw).is_ok());
        }
    }

    #[test]
    fn generated_password_minimum_length() {
        let pw = generate_password(3, &mut rng());
        assert_eq!(pw.len(), MIN_PASSWORD_LEN);
    }

    #[test]
    fn generated_passwords_differ() {
        let mut rng = rng();
        let a = generate_password(DEFAULT_PASSWORD_LEN, &mut rng);
        let b = generate_password(DEFAULT_PASSWORD_LEN, &mut rng);
        assert_ne!(a, b);
    }

    #[test]
    fn password_policy() {
        assert!(validate_password("Secr3tPW").is_ok());
        assert!(matches!(validate_password("Sh0rt"), Err(CoreError::Validation(_))));
        assert!(matches!(
            validate_password("NoDigitsHere"),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(validate_password(""), Err(CoreError::Validation(_))));
    }
}
