//! # Identity Module
//!
//! A Pramaan identity is a DID: the 64-character hex text of a 256-bit
//! value derived from a biometric hash at enrollment. This module owns the
//! two representations of that value:
//!
//! 1. **Did** — the validated text form. This is what gets stored, and the
//!    exact bytes of this text are what a proof signs (after SHA-256).
//! 2. **SplitIdentifier** — the same 256 bits as two `u128` halves, for
//!    consumers that want compact numeric fields (contracts, circuits).
//!
//! The split is lossless in both directions; see [`split::encode`].

pub mod did;
pub mod split;

pub use did::{Did, DidError};
pub use split::{convert_table, encode, EncodeError, SplitIdentifier};
