//! Seeds for the deterministic PRNG.
//!
//! A [`Seed`] is either a plain 32-bit number or a text phrase. Phrases that
//! spell a number are treated as that number; anything else is folded into a
//! `u32` with a polynomial rolling hash, so `"sunset"` always names the same
//! random sequence.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GridError;

/// Multiplier of the polynomial rolling hash used for phrase seeds.
const PHRASE_HASH_BASE: u32 = 31;

/// A numeric or textual PRNG seed.
///
/// Serializes untagged: `42` and `"sunset"` are both valid JSON seeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seed {
    Number(u32),
    Phrase(String),
}

impl Seed {
    /// Resolves the seed to the 32-bit value that initializes the PRNG.
    pub fn value(&self) -> u32 {
        match self {
            Seed::Number(n) => *n,
            Seed::Phrase(s) => s
                .trim()
                .parse::<u32>()
                .unwrap_or_else(|_| hash_phrase(s)),
        }
    }

    /// Interprets a JSON value as a seed.
    ///
    /// Accepts non-negative integers that fit in `u32` and strings. Returns
    /// `GridError::InvalidSeed` for anything else.
    pub fn from_json(value: &Value) -> Result<Self, GridError> {
        match value {
            Value::Number(n) => n
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .map(Seed::Number)
                .ok_or_else(|| GridError::InvalidSeed(format!("{n} is not a u32"))),
            Value::String(s) => Ok(Seed::Phrase(s.clone())),
            other => Err(GridError::InvalidSeed(format!(
                "expected number or string, got {other}"
            ))),
        }
    }
}

impl Default for Seed {
    fn default() -> Self {
        Seed::Number(0)
    }
}

impl From<u32> for Seed {
    fn from(n: u32) -> Self {
        Seed::Number(n)
    }
}

impl From<&str> for Seed {
    fn from(s: &str) -> Self {
        match s.trim().parse::<u32>() {
            Ok(n) => Seed::Number(n),
            Err(_) => Seed::Phrase(s.to_string()),
        }
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seed::Number(n) => write!(f, "{n}"),
            Seed::Phrase(s) => write!(f, "{s}"),
        }
    }
}

/// Folds a phrase into a `u32` with the rolling hash `h = h * 31 + byte`.
pub fn hash_phrase(phrase: &str) -> u32 {
    phrase.bytes().fold(0u32, |h, b| {
        h.wrapping_mul(PHRASE_HASH_BASE).wrapping_add(u32::from(b))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_seed_resolves_to_itself() {
        assert_eq!(Seed::Number(1234).value(), 1234);
    }

    #[test]
    fn numeric_phrase_parses_as_number() {
        assert_eq!(Seed::Phrase("77".into()).value(), 77);
        assert_eq!(Seed::from(" 77 "), Seed::Number(77));
    }

    #[test]
    fn phrase_hash_matches_rolling_hash() {
        // "ab" = 97 * 31 + 98
        assert_eq!(hash_phrase("ab"), 97 * 31 + 98);
        assert_eq!(Seed::from("ab").value(), 97 * 31 + 98);
    }

    #[test]
    fn empty_phrase_hashes_to_zero() {
        assert_eq!(hash_phrase(""), 0);
    }

    #[test]
    fn long_phrase_wraps_without_panicking() {
        let long = "the quick brown fox jumps over the lazy dog ".repeat(20);
        let a = hash_phrase(&long);
        let b = hash_phrase(&long);
        assert_eq!(a, b);
    }

    #[test]
    fn different_phrases_give_different_values() {
        assert_ne!(Seed::from("sunset").value(), Seed::from("sunrise").value());
    }

    #[test]
    fn json_round_trip_untagged() {
        let n: Seed = serde_json::from_value(json!(42)).unwrap();
        let p: Seed = serde_json::from_value(json!("sunset")).unwrap();
        assert_eq!(n, Seed::Number(42));
        assert_eq!(p, Seed::Phrase("sunset".into()));
        assert_eq!(serde_json::to_value(&n).unwrap(), json!(42));
        assert_eq!(serde_json::to_value(&p).unwrap(), json!("sunset"));
    }

    #[test]
    fn from_json_rejects_negative_and_oversized_numbers() {
        assert!(matches!(
            Seed::from_json(&json!(-1)),
            Err(GridError::InvalidSeed(_))
        ));
        assert!(matches!(
            Seed::from_json(&json!(5_000_000_000u64)),
            Err(GridError::InvalidSeed(_))
        ));
    }

    #[test]
    fn from_json_rejects_non_scalar() {
        assert!(Seed::from_json(&json!([1, 2])).is_err());
        assert!(Seed::from_json(&json!(null)).is_err());
    }

    #[test]
    fn display_shows_original_form() {
        assert_eq!(Seed::Number(5).to_string(), "5");
        assert_eq!(Seed::Phrase("moss".into()).to_string(), "moss");
    }
}
