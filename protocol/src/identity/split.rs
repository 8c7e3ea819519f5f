//! # Split Identifiers
//!
//! A 256-bit DID does not fit any native integer type, so downstream
//! consumers that want numbers get two `u128` halves instead:
//!
//! ```text
//! did  = "0000...0001" "ffff...ffff"
//!         \__ high __/ \__ low ___/
//! value = high * 2^128 + low
//! ```
//!
//! The transform is pure and lossless. [`encode`] rejects anything that is
//! not exactly 64 hex characters; it never truncates, pads or guesses,
//! because a silently misparsed half would corrupt the derived integers in
//! a way nobody downstream could detect.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use super::did::{Did, DidError};
use crate::config::SPLIT_HALF_BITS;

/// Errors from the identifier encoder.
///
/// This is a usage error (the caller handed over something that isn't a
/// DID), distinct from any verification outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("input format error: {0}")]
    InputFormat(#[from] DidError),
}

/// A 256-bit identifier as two 128-bit halves.
///
/// Serializes both halves as decimal strings: JSON numbers lose precision
/// well before 128 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SplitIdentifier {
    /// Most-significant 128 bits (first 32 hex characters).
    #[serde(with = "decimal")]
    pub high: u128,
    /// Least-significant 128 bits (last 32 hex characters).
    #[serde(with = "decimal")]
    pub low: u128,
}

impl SplitIdentifier {
    pub fn new(high: u128, low: u128) -> Self {
        Self { high, low }
    }

    /// Canonical lowercase, zero-padded 64-character hex.
    pub fn to_hex(&self) -> String {
        format!("{:032x}{:032x}", self.high, self.low)
    }

    /// The full 256-bit value, big-endian.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out[..16].copy_from_slice(&self.high.to_be_bytes());
        out[16..].copy_from_slice(&self.low.to_be_bytes());
        out
    }

    /// Rebuild from 32 big-endian bytes.
    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        let mut high = [0u8; 16];
        let mut low = [0u8; 16];
        high.copy_from_slice(&bytes[..16]);
        low.copy_from_slice(&bytes[16..]);
        Self::new(u128::from_be_bytes(high), u128::from_be_bytes(low))
    }

    /// Number of significant bits in the combined 256-bit value.
    pub fn bit_length(&self) -> u32 {
        if self.high != 0 {
            SPLIT_HALF_BITS + (u128::BITS - self.high.leading_zeros())
        } else {
            u128::BITS - self.low.leading_zeros()
        }
    }
}

impl fmt::Display for SplitIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.high, self.low)
    }
}

/// Split a 64-character hex hash into its high and low halves.
///
/// # Example
///
/// ```
/// use pramaan_protocol::identity::encode;
///
/// let split = encode(&"0".repeat(64)).unwrap();
/// assert_eq!((split.high, split.low), (0, 0));
/// ```
pub fn encode(hash: &str) -> Result<SplitIdentifier, EncodeError> {
    Ok(Did::parse(hash)?.split())
}

/// Split every entry of a DID table, ordered by user identifier.
pub fn convert_table(dids: &BTreeMap<String, Did>) -> Vec<(String, SplitIdentifier)> {
    dids.iter()
        .map(|(user_id, did)| (user_id.clone(), did.split()))
        .collect()
}

/// Serde adapter: `u128` as a decimal string.
mod decimal {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<u128>().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reference value of a 64-hex string as (high, low), computed nibble by
    /// nibble over the whole string with a 256-bit shift register.
    fn reference(hex: &str) -> (u128, u128) {
        let mut high = 0u128;
        let mut low = 0u128;
        for c in hex.chars() {
            let nibble = u128::from(c.to_digit(16).unwrap());
            high = (high << 4) | (low >> 124);
            low = (low << 4) | nibble;
        }
        (high, low)
    }

    #[test]
    fn all_zeros_encodes_to_zero_pair() {
        let split = encode(&"0".repeat(64)).unwrap();
        assert_eq!(split, SplitIdentifier::new(0, 0));
    }

    #[test]
    fn all_fs_encodes_to_max_pair() {
        let split = encode(&"f".repeat(64)).unwrap();
        assert_eq!(split, SplitIdentifier::new(u128::MAX, u128::MAX));
        assert_eq!(encode(&"F".repeat(64)).unwrap(), split);
    }

    #[test]
    fn halves_are_positional() {
        let hex = format!("{}{}", "0".repeat(63), "1");
        assert_eq!(encode(&hex).unwrap(), SplitIdentifier::new(0, 1));

        let hex = format!("{}1{}", "0".repeat(31), "0".repeat(32));
        assert_eq!(encode(&hex).unwrap(), SplitIdentifier::new(1, 0));
    }

    #[test]
    fn matches_reference_value() {
        let samples = [
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08",
            "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855",
            "00000000000000000000000000000001fffffffffffffffffffffffffffffffe",
            "8000000000000000000000000000000000000000000000000000000000000000",
        ];
        for hex in samples {
            let split = encode(hex).unwrap();
            assert_eq!((split.high, split.low), reference(hex), "hex: {}", hex);
        }
    }

    #[test]
    fn to_hex_inverts_encode() {
        let hex = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";
        assert_eq!(encode(hex).unwrap().to_hex(), hex);

        let upper = hex.to_uppercase();
        assert_eq!(encode(&upper).unwrap().to_hex(), hex);
    }

    #[test]
    fn to_hex_zero_pads() {
        let split = SplitIdentifier::new(1, 2);
        let hex = split.to_hex();
        assert_eq!(hex.len(), 64);
        assert_eq!(encode(&hex).unwrap(), split);
    }

    #[test]
    fn be_bytes_match_hex() {
        let hex = "00112233445566778899aabbccddeeff0123456789abcdeffedcba9876543210";
        let split = encode(hex).unwrap();
        assert_eq!(hex::encode(split.to_be_bytes()), hex);
        assert_eq!(SplitIdentifier::from_be_bytes(split.to_be_bytes()), split);
    }

    #[test]
    fn format_errors_are_reported() {
        assert!(matches!(
            encode("abc"),
            Err(EncodeError::InputFormat(DidError::InvalidLength { .. }))
        ));
        let bad = format!("{}z", "0".repeat(63));
        assert_eq!(
            encode(&bad).unwrap_err(),
            EncodeError::InputFormat(DidError::InvalidCharacter { position: 63 })
        );
        assert!(encode(&" ".repeat(64)).is_err());
    }

    #[test]
    fn bit_length() {
        assert_eq!(SplitIdentifier::new(0, 0).bit_length(), 0);
        assert_eq!(SplitIdentifier::new(0, 1).bit_length(), 1);
        assert_eq!(SplitIdentifier::new(1, 0).bit_length(), 129);
        assert_eq!(SplitIdentifier::new(u128::MAX, 0).bit_length(), 256);
    }

    #[test]
    fn serde_uses_decimal_strings() {
        let split = SplitIdentifier::new(u128::MAX, 7);
        let json = serde_json::to_value(split).unwrap();
        assert_eq!(json["high"], u128::MAX.to_string());
        assert_eq!(json["low"], "7");
        let back: SplitIdentifier = serde_json::from_value(json).unwrap();
        assert_eq!(back, split);
    }

    #[test]
    fn display_is_decimal_pair() {
        assert_eq!(SplitIdentifier::new(3, 4).to_string(), "(3, 4)");
    }

    #[test]
    fn convert_table_orders_by_user() {
        let mut table = BTreeMap::new();
        table.insert("zoe".to_string(), Did::parse(&"f".repeat(64)).unwrap());
        table.insert("adam".to_string(), Did::parse(&"0".repeat(64)).unwrap());

        let converted = convert_table(&table);
        assert_eq!(converted.len(), 2);
        assert_eq!(converted[0].0, "adam");
        assert_eq!(converted[0].1, SplitIdentifier::new(0, 0));
        assert_eq!(converted[1].0, "zoe");
        assert_eq!(converted[1].1, SplitIdentifier::new(u128::MAX, u128::MAX));
    }
}
