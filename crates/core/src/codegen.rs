//! Random identifier generation for account, recharge, and transaction codes.
//!
//! Codes are drawn uniformly from a contiguous slice of a fixed 62-character
//! set (26 upper, 26 lower, 10 digits). Generation is NOT cryptographically
//! secure and does not prevent collisions; every caller that needs a unique
//! code runs the bounded generate-check-regenerate protocol against its
//! store, failing with an exhausted-keyspace error past [`CodePolicy::max_attempts`].

use rand::Rng;

/// The full character set. Alpha occupies indices [0, 52), numeric [52, 62).
const CHARSET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Character class a code is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Letters only: `A-Za-z`.
    Alpha,
    /// Digits only: `0-9`.
    Numeric,
    /// Letters and digits.
    Alphanumeric,
}

impl CharClass {
    /// Returns the `[start, end)` slice of [`CHARSET`] for this class.
    const fn range(self) -> (usize, usize) {
        match self {
            Self::Alpha => (0, 52),
            Self::Numeric => (52, 62),
            Self::Alphanumeric => (0, 62),
        }
    }

    /// Returns the characters this class draws from.
    #[must_use]
    pub fn alphabet(self) -> &'static [u8] {
        let (start, end) = self.range();
        &CHARSET[start..end]
    }
}

/// Generates a random code of `length` characters from the given class.
///
/// A zero `length` yields the empty string; callers must never treat an
/// empty result as a usable code.
#[must_use]
pub fn generate(length: usize, class: CharClass) -> String {
    generate_with(&mut rand::rng(), length, class)
}

/// Generates a code using a caller-supplied RNG (deterministic in tests).
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, length: usize, class: CharClass) -> String {
    let (start, end) = class.range();
    let mut code = String::with_capacity(length);
    for _ in 0..length {
        let idx = rng.random_range(start..end);
        code.push(char::from(CHARSET[idx]));
    }
    code
}

/// Bound on the generate-check-regenerate uniqueness protocol.
///
/// The keyspaces in use (e.g. 62^10 account codes) are large relative to
/// any plausible record count, so repeated collisions signal a broken RNG
/// or a store gone wrong; giving up loudly beats blocking forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodePolicy {
    /// Maximum attempts before the caller reports an exhausted keyspace.
    pub max_attempts: u32,
}

impl Default for CodePolicy {
    fn default() -> Self {
        Self { max_attempts: 32 }
    }
}

impl CodePolicy {
    /// Creates a policy with an explicit attempt bound.
    #[must_use]
    pub const fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_length() {
        for len in [1, 10, 16, 22] {
            assert_eq!(generate(len, CharClass::Alphanumeric).len(), len);
        }
    }

    #[test]
    fn test_zero_length_is_empty() {
        assert_eq!(generate(0, CharClass::Alpha), "");
        assert_eq!(generate(0, CharClass::Numeric), "");
        assert_eq!(generate(0, CharClass::Alphanumeric), "");
    }

    #[test]
    fn test_numeric_codes_are_digits_only() {
        let code = generate(100, CharClass::Numeric);
        assert!(code.bytes().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn test_alpha_codes_are_letters_only() {
        let code = generate(100, CharClass::Alpha);
        assert!(code.bytes().all(|b| b.is_ascii_alphabetic()));
    }

    #[test]
    fn test_alphabet_slices() {
        assert_eq!(CharClass::Alpha.alphabet().len(), 52);
        assert_eq!(CharClass::Numeric.alphabet().len(), 10);
        assert_eq!(CharClass::Alphanumeric.alphabet().len(), 62);
        assert_eq!(CharClass::Numeric.alphabet(), b"0123456789");
    }

    #[test]
    fn test_default_policy_bound() {
        assert_eq!(CodePolicy::default().max_attempts, 32);
    }

    proptest! {
        /// Generated codes only ever contain characters from their class.
        #[test]
        fn prop_codes_stay_in_alphabet(len in 1usize..64) {
            for class in [CharClass::Alpha, CharClass::Numeric, CharClass::Alphanumeric] {
                let code = generate(len, class);
                let alphabet = class.alphabet();
                prop_assert!(code.bytes().all(|b| alphabet.contains(&b)));
            }
        }

        /// A batch of freshly generated 16-character codes has no duplicates.
        /// The keyspace (62^16) dwarfs the batch size, so a collision here
        /// indicates a broken sampler rather than bad luck.
        #[test]
        fn prop_batch_has_no_collisions(n in 1usize..200) {
            let mut seen = HashSet::new();
            for _ in 0..n {
                let code = generate(16, CharClass::Alphanumeric);
                prop_assert!(seen.insert(code));
            }
        }
    }
}
