//! # CLI Interface
//!
//! Defines the command-line argument structure for `pramaan` using `clap`
//! derive. Every store path and port has a `PRAMAAN_*` environment fallback
//! so the same binary can be configured from a shell or a unit file.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::logging::LogFormat;
use pramaan_protocol::config::{
    DEFAULT_DID_STORE_FILE, DEFAULT_KEY_STORE_FILE, DEFAULT_METRICS_PORT, DEFAULT_RPC_PORT,
    DEFAULT_RSA_KEY_BITS,
};

/// Pramaan biometric DID tooling and proof verifier.
///
/// Encodes DIDs into their split numeric form, checks proofs against the
/// enrolled identity tables, and serves verification over HTTP.
#[derive(Parser, Debug)]
#[command(
    name = "pramaan",
    about = "Pramaan biometric DID encoder and proof verifier",
    version,
    propagate_version = true
)]
pub struct PramaanCli {
    /// Log output format: `pretty` or `json`.
    #[arg(
        long,
        global = true,
        env = "PRAMAAN_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Pretty
    )]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the `pramaan` binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a 64-hex-character DID hash into two 128-bit integers.
    Encode(EncodeArgs),
    /// Print the split form of every DID in the DID table.
    Convert(ConvertArgs),
    /// Check a proof for a user. Exits 0 when valid, 1 when rejected.
    Verify(VerifyArgs),
    /// Sign a DID with a private key and print the proof hex.
    Prove(ProveArgs),
    /// Generate an RSA keypair for enrollment.
    Keygen(KeygenArgs),
    /// Copy the JSON identity tables into a sled database.
    Import(ImportArgs),
    /// Start the HTTP verification service.
    Serve(ServeArgs),
    /// Print version information and exit.
    Version,
}

/// Locations of the two JSON identity tables.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Path to the DID table (`user_id -> did`).
    #[arg(long, env = "PRAMAAN_DID_STORE", default_value = DEFAULT_DID_STORE_FILE)]
    pub did_store: PathBuf,

    /// Path to the public key table (`user_id -> PEM`).
    #[arg(long, env = "PRAMAAN_KEY_STORE", default_value = DEFAULT_KEY_STORE_FILE)]
    pub key_store: PathBuf,
}

/// Arguments for the `encode` subcommand.
#[derive(Parser, Debug)]
pub struct EncodeArgs {
    /// The 64-character hex hash.
    pub hash: String,
}

/// Arguments for the `convert` subcommand.
#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Path to the DID table.
    #[arg(long, env = "PRAMAAN_DID_STORE", default_value = DEFAULT_DID_STORE_FILE)]
    pub did_store: PathBuf,
}

/// Arguments for the `verify` subcommand.
#[derive(Parser, Debug)]
pub struct VerifyArgs {
    /// User whose enrolled identity the proof is checked against.
    #[arg(long)]
    pub user_id: String,

    /// Hex-encoded proof (case-insensitive).
    #[arg(long)]
    pub signature: String,

    /// Read identities from a sled database instead of the JSON tables.
    #[arg(long, env = "PRAMAAN_DB")]
    pub db: Option<PathBuf>,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Arguments for the `prove` subcommand.
#[derive(Parser, Debug)]
pub struct ProveArgs {
    /// PEM file holding the RSA private key (PKCS#8 or PKCS#1).
    #[arg(long)]
    pub private_key: PathBuf,

    /// The DID to sign, exactly as enrolled.
    #[arg(long)]
    pub did: String,
}

/// Arguments for the `keygen` subcommand.
#[derive(Parser, Debug)]
pub struct KeygenArgs {
    /// Where to write the private key (PKCS#8 PEM).
    #[arg(long, short = 'o')]
    pub out: PathBuf,

    /// RSA modulus size in bits.
    #[arg(long, default_value_t = DEFAULT_RSA_KEY_BITS)]
    pub bits: usize,
}

/// Arguments for the `import` subcommand.
#[derive(Parser, Debug)]
pub struct ImportArgs {
    /// sled database directory. Created if missing.
    #[arg(long, env = "PRAMAAN_DB")]
    pub db: PathBuf,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Arguments for the `serve` subcommand.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Port for the verification API.
    #[arg(long, short = 'p', env = "PRAMAAN_RPC_PORT", default_value_t = DEFAULT_RPC_PORT)]
    pub port: u16,

    /// Port for the Prometheus metrics endpoint.
    #[arg(long, env = "PRAMAAN_METRICS_PORT", default_value_t = DEFAULT_METRICS_PORT)]
    pub metrics_port: u16,

    /// Serve identities from a sled database instead of the JSON tables.
    #[arg(long, env = "PRAMAAN_DB")]
    pub db: Option<PathBuf>,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        PramaanCli::command().debug_assert();
    }

    #[test]
    fn verify_args_parse() {
        let cli = PramaanCli::try_parse_from([
            "pramaan",
            "verify",
            "--user-id",
            "alice",
            "--signature",
            "abcd",
            "--did-store",
            "/tmp/dids.json",
        ])
        .unwrap();

        match cli.command {
            Commands::Verify(args) => {
                assert_eq!(args.user_id, "alice");
                assert_eq!(args.signature, "abcd");
                assert_eq!(args.store.did_store, PathBuf::from("/tmp/dids.json"));
                assert!(args.db.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn encode_takes_positional_hash() {
        let cli = PramaanCli::try_parse_from(["pramaan", "encode", "00ff"]).unwrap();
        assert!(matches!(cli.command, Commands::Encode(EncodeArgs { ref hash }) if hash == "00ff"));
    }

    #[test]
    fn log_format_is_global() {
        let cli = PramaanCli::try_parse_from(["pramaan", "version", "--log-format", "json"]).unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let err = PramaanCli::try_parse_from(["pramaan", "--log-format", "yaml", "version"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
