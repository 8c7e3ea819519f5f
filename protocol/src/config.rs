//! # Protocol Configuration & Constants
//!
//! Every magic number in Pramaan lives here. Changing any of the identifier
//! or digest constants breaks every proof that was ever issued, so treat the
//! first two sections as frozen.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Protocol Version
// ---------------------------------------------------------------------------

/// Library version string, reported by the CLI and the HTTP service.
pub const PROTOCOL_VERSION: &str = "0.1.0";

// ---------------------------------------------------------------------------
// Identifier Parameters
// ---------------------------------------------------------------------------

/// A DID is the hex text of a 256-bit value: exactly 64 characters.
pub const DID_HEX_LENGTH: usize = 64;

/// Each half of a split identifier covers 32 hex characters.
pub const DID_HALF_HEX_LENGTH: usize = DID_HEX_LENGTH / 2;

/// Bit width of each half. High half is shifted by this much.
pub const SPLIT_HALF_BITS: u32 = 128;

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Digest applied to the DID text before signing.
pub const DIGEST_ALGORITHM: &str = "SHA-256";

/// SHA-256 output length in bytes.
pub const HASH_OUTPUT_LENGTH: usize = 32;

/// Signature scheme for proofs. Deterministic: the same key and DID always
/// yield the same proof bytes.
pub const SIGNATURE_SCHEME: &str = "RSASSA-PKCS1-v1_5";

/// Modulus size used when generating fresh keypairs.
pub const DEFAULT_RSA_KEY_BITS: usize = 2048;

/// Smallest RSA modulus accepted from storage or for key generation.
/// Anything below 1024 bits is factorable on a budget.
pub const MIN_RSA_KEY_BITS: usize = 1024;

/// Largest RSA modulus accepted from storage. Enrollment tooling in the
/// field issues keys up to 8192 bits.
pub const MAX_RSA_KEY_BITS: usize = 16384;

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Default file name of the DID table (`user_id -> did`).
pub const DEFAULT_DID_STORE_FILE: &str = "did_storage.json";

/// Default file name of the key table (`user_id -> PEM public key`).
pub const DEFAULT_KEY_STORE_FILE: &str = "keys.json";

/// sled tree holding DIDs.
pub const DID_TREE: &str = "dids";

/// sled tree holding public keys.
pub const PUBLIC_KEY_TREE: &str = "public_keys";

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Default HTTP API port.
pub const DEFAULT_RPC_PORT: u16 = 8741;

/// Default metrics (Prometheus) port.
pub const DEFAULT_METRICS_PORT: u16 = 8742;

/// Upper bound on a single verification request served over HTTP. The core
/// imposes no timeout of its own.
pub const VERIFY_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
