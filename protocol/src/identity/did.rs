//! # DID (Decentralized Identifier)
//!
//! The validated text form of a Pramaan identifier.
//!
//! ## Format
//!
//! ```text
//! 3f1a...e09c   (exactly 64 characters, [0-9a-fA-F])
//! ```
//!
//! No `did:` prefix, no method segment; the value is the bare hex of the
//! biometric-derived hash, as enrollment writes it.
//!
//! ## Case
//!
//! Parsing is case-insensitive, but a `Did` keeps the text exactly as it was
//! given. Proofs sign `SHA-256(text)`, so normalizing case here would
//! silently invalidate every proof issued over an uppercase DID.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::split::SplitIdentifier;
use crate::config::{DID_HALF_HEX_LENGTH, DID_HEX_LENGTH};
use crate::crypto::hash::sha256_array;

/// Errors that can occur while validating a DID string.
///
/// Reports length and position only; the offending text is not echoed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DidError {
    /// The input is not exactly 64 characters long.
    #[error("DID must be exactly {expected} hex characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// The input contains a character outside `[0-9a-fA-F]`.
    #[error("DID contains a non-hexadecimal character at position {position}")]
    InvalidCharacter { position: usize },
}

/// A validated 64-hex-character DID.
///
/// Serializes as a plain JSON string, and deserialization runs the same
/// validation as [`Did::parse`], so a malformed record is rejected at the
/// storage boundary instead of deep inside verification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Did(String);

impl Did {
    /// Validate and wrap a DID string.
    pub fn parse(s: &str) -> Result<Self, DidError> {
        validate(s)?;
        Ok(Self(s.to_owned()))
    }

    /// Rebuild a DID from its split form. Always lowercase.
    pub fn from_split(split: &SplitIdentifier) -> Self {
        Self(split.to_hex())
    }

    /// The DID text, exactly as stored.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// SHA-256 of the DID text. This is the message a proof signs.
    pub fn digest(&self) -> [u8; 32] {
        sha256_array(self.0.as_bytes())
    }

    /// Split into high and low 128-bit halves.
    pub fn split(&self) -> SplitIdentifier {
        let (high, low) = self.0.split_at(DID_HALF_HEX_LENGTH);
        SplitIdentifier::new(parse_half(high), parse_half(low))
    }

    /// Lowercase rendering, for comparisons that should ignore case.
    pub fn to_lowercase(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

/// Parse 32 validated hex digits into a `u128`.
///
/// Only called on text that went through [`validate`], so every character
/// maps to a digit and 32 nibbles fit exactly in 128 bits.
fn parse_half(half: &str) -> u128 {
    half.chars()
        .filter_map(|c| c.to_digit(16))
        .fold(0u128, |acc, nibble| (acc << 4) | u128::from(nibble))
}

fn validate(s: &str) -> Result<(), DidError> {
    let actual = s.chars().count();
    if actual != DID_HEX_LENGTH {
        return Err(DidError::InvalidLength {
            expected: DID_HEX_LENGTH,
            actual,
        });
    }
    if let Some(position) = s.chars().position(|c| !c.is_ascii_hexdigit()) {
        return Err(DidError::InvalidCharacter { position });
    }
    Ok(())
}

impl TryFrom<String> for Did {
    type Error = DidError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate(&value)?;
        Ok(Self(value))
    }
}

impl From<Did> for String {
    fn from(did: Did) -> Self {
        did.0
    }
}

impl FromStr for Did {
    type Err = DidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Did {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";

    #[test]
    fn parse_accepts_lowercase_and_uppercase() {
        assert!(Did::parse(SAMPLE).is_ok());
        assert!(Did::parse(&SAMPLE.to_uppercase()).is_ok());
    }

    #[test]
    fn parse_preserves_case() {
        let upper = SAMPLE.to_uppercase();
        let did = Did::parse(&upper).unwrap();
        assert_eq!(did.as_str(), upper);
        assert_eq!(did.to_lowercase(), SAMPLE);
    }

    #[test]
    fn parse_rejects_short_and_long() {
        assert_eq!(
            Did::parse(&SAMPLE[..63]).unwrap_err(),
            DidError::InvalidLength {
                expected: 64,
                actual: 63
            }
        );
        let long = format!("{}0", SAMPLE);
        assert!(matches!(
            Did::parse(&long),
            Err(DidError::InvalidLength { actual: 65, .. })
        ));
        assert!(matches!(
            Did::parse(""),
            Err(DidError::InvalidLength { actual: 0, .. })
        ));
    }

    #[test]
    fn parse_rejects_non_hex() {
        let mut bad = SAMPLE.to_string();
        bad.replace_range(10..11, "g");
        assert_eq!(
            Did::parse(&bad).unwrap_err(),
            DidError::InvalidCharacter { position: 10 }
        );
    }

    #[test]
    fn parse_rejects_sign_and_prefix() {
        // from_str_radix would accept a leading '+'; we must not.
        let plus = format!("+{}", &SAMPLE[1..]);
        assert!(matches!(
            Did::parse(&plus),
            Err(DidError::InvalidCharacter { position: 0 })
        ));
        let prefixed = format!("0x{}", &SAMPLE[2..]);
        assert!(matches!(
            Did::parse(&prefixed),
            Err(DidError::InvalidCharacter { position: 1 })
        ));
    }

    #[test]
    fn multibyte_characters_count_as_characters() {
        // 63 ASCII digits plus one 2-byte char: 64 chars, 65 bytes.
        let s = format!("{}é", &SAMPLE[..63]);
        assert_eq!(
            Did::parse(&s).unwrap_err(),
            DidError::InvalidCharacter { position: 63 }
        );
    }

    #[test]
    fn digest_is_over_text() {
        let did = Did::parse(SAMPLE).unwrap();
        assert_eq!(did.digest(), sha256_array(SAMPLE.as_bytes()));

        let upper = Did::parse(&SAMPLE.to_uppercase()).unwrap();
        assert_ne!(did.digest(), upper.digest());
    }

    #[test]
    fn serde_roundtrip_and_validation() {
        let did = Did::parse(SAMPLE).unwrap();
        let json = serde_json::to_string(&did).unwrap();
        assert_eq!(json, format!("\"{}\"", SAMPLE));
        let back: Did = serde_json::from_str(&json).unwrap();
        assert_eq!(back, did);

        let bad: Result<Did, _> = serde_json::from_str("\"abc\"");
        assert!(bad.is_err());
    }

    #[test]
    fn display_and_from_str() {
        let did: Did = SAMPLE.parse().unwrap();
        assert_eq!(did.to_string(), SAMPLE);
    }

    #[test]
    fn from_split_is_lowercase_inverse() {
        let did = Did::parse(&SAMPLE.to_uppercase()).unwrap();
        let rebuilt = Did::from_split(&did.split());
        assert_eq!(rebuilt.as_str(), SAMPLE);
    }
}
