// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Pramaan
//!
//! Entry point for the `pramaan` binary. Parses CLI arguments, initializes
//! logging, and dispatches to a subcommand:
//!
//! - `encode`  — split one DID hash into high/low integers
//! - `convert` — split every DID in the DID table
//! - `verify`  — check a proof against the enrolled identity
//! - `prove`   — sign a DID with a private key
//! - `keygen`  — generate an enrollment keypair
//! - `import`  — copy the JSON tables into a sled database
//! - `serve`   — run the HTTP verification service
//! - `version` — print build version information

mod api;
mod cli;
mod logging;
mod metrics;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::signal;

use pramaan_protocol::crypto::keys::PramaanKeypair;
use pramaan_protocol::identity::{convert_table, encode, Did, SplitIdentifier};
use pramaan_protocol::proof::{prove, ProofVerifier, VerificationError};
use pramaan_protocol::storage::json::load_did_file;
use pramaan_protocol::storage::{IdentityDb, JsonFileStore};

use cli::{Commands, PramaanCli};
use metrics::NodeMetrics;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = PramaanCli::parse();
    logging::init_logging(
        "pramaan=info,pramaan_protocol=warn,tower_http=info",
        cli.log_format,
    )?;

    match cli.command {
        Commands::Encode(args) => {
            let split = encode(&args.hash).context("cannot encode hash")?;
            println!("High: {}", split.high);
            println!("Low: {}", split.low);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Convert(args) => convert(&args.did_store),
        Commands::Verify(args) => verify(args),
        Commands::Prove(args) => prove_did(args),
        Commands::Keygen(args) => keygen(args),
        Commands::Import(args) => import(args),
        Commands::Serve(args) => serve(args).await,
        Commands::Version => {
            print_version();
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Prints the split form of every DID in the table, ordered by user id.
fn convert(did_store: &Path) -> Result<ExitCode> {
    let table = load_did_file(did_store)
        .with_context(|| format!("failed to load DID table from {}", did_store.display()))?;

    for (user_id, split) in convert_table(&table) {
        print!("{}", format_conversion(&user_id, &split));
    }
    Ok(ExitCode::SUCCESS)
}

/// One `convert` record.
fn format_conversion(user_id: &str, split: &SplitIdentifier) -> String {
    format!(
        "User ID: {}\n  High: {}\n  Low: {}\n-\n",
        user_id, split.high, split.low
    )
}

/// Exit status for a verification outcome: 0 accepted, 1 rejected, 2 when
/// the identity store could not be read.
fn verification_status(outcome: &Result<(), VerificationError>) -> u8 {
    match outcome {
        Ok(()) => 0,
        Err(VerificationError::StorageUnavailable) => 2,
        Err(_) => 1,
    }
}

fn verify(args: cli::VerifyArgs) -> Result<ExitCode> {
    let outcome = match &args.db {
        Some(path) => {
            let db = IdentityDb::open(path)
                .with_context(|| format!("failed to open database at {}", path.display()))?;
            ProofVerifier::new(db).check(&args.user_id, &args.signature)
        }
        None => ProofVerifier::new(JsonFileStore::new(
            &args.store.did_store,
            &args.store.key_store,
        ))
        .check(&args.user_id, &args.signature),
    };

    match outcome {
        Ok(()) => println!("valid"),
        Err(e) => println!("invalid ({})", e.reason()),
    }
    Ok(ExitCode::from(verification_status(&outcome)))
}

fn prove_did(args: cli::ProveArgs) -> Result<ExitCode> {
    let pem = std::fs::read_to_string(&args.private_key)
        .with_context(|| format!("failed to read {}", args.private_key.display()))?;
    let keypair = PramaanKeypair::from_pem(&pem).context("invalid private key")?;
    let did = Did::parse(&args.did).context("invalid DID")?;

    let proof = prove(&keypair, &did).context("signing failed")?;
    println!("{}", proof);
    Ok(ExitCode::SUCCESS)
}

/// Generates a keypair, writes the private half to disk and prints the
/// public PEM for the key table.
fn keygen(args: cli::KeygenArgs) -> Result<ExitCode> {
    let keypair = PramaanKeypair::generate(args.bits).context("key generation failed")?;
    let private_pem = keypair.to_pkcs8_pem()?;
    let public_pem = keypair.public_key().to_pem()?;

    std::fs::write(&args.out, private_pem)
        .with_context(|| format!("failed to write private key to {}", args.out.display()))?;

    // Restrict permissions on Unix.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&args.out, std::fs::Permissions::from_mode(0o600))?;
    }

    tracing::info!(
        bits = args.bits,
        fingerprint = %keypair.public_key().fingerprint(),
        path = %args.out.display(),
        "keypair generated"
    );
    print!("{}", public_pem);
    Ok(ExitCode::SUCCESS)
}

fn import(args: cli::ImportArgs) -> Result<ExitCode> {
    let db = IdentityDb::open(&args.db)
        .with_context(|| format!("failed to open database at {}", args.db.display()))?;
    let summary = db
        .import_json(&JsonFileStore::new(
            &args.store.did_store,
            &args.store.key_store,
        ))
        .context("import failed")?;

    println!("Imported {} DIDs and {} public keys.", summary.dids, summary.public_keys);
    println!("  Database : {}", args.db.display());
    Ok(ExitCode::SUCCESS)
}

/// Runs the HTTP API and the metrics endpoint until a shutdown signal.
async fn serve(args: cli::ServeArgs) -> Result<ExitCode> {
    let store: api::SharedStore = match &args.db {
        Some(path) => {
            let db = IdentityDb::open(path)
                .with_context(|| format!("failed to open database at {}", path.display()))?;
            tracing::info!(path = %path.display(), identities = db.identity_count(), "database opened");
            Arc::new(db)
        }
        None => {
            tracing::info!(
                did_store = %args.store.did_store.display(),
                key_store = %args.store.key_store.display(),
                "serving JSON identity tables"
            );
            Arc::new(JsonFileStore::new(
                &args.store.did_store,
                &args.store.key_store,
            ))
        }
    };

    let node_metrics = Arc::new(NodeMetrics::new());
    let app_state = api::AppState::new(store, Arc::clone(&node_metrics));

    // --- API server ---
    let api_router = api::create_router(app_state);
    let api_addr = format!("0.0.0.0:{}", args.port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind API listener on {}", api_addr))?;
    tracing::info!("API server listening on {}", api_addr);

    // --- Metrics server ---
    let metrics_router = axum::Router::new()
        .route("/metrics", axum::routing::get(metrics::metrics_handler))
        .with_state(Arc::clone(&node_metrics));
    let metrics_addr = format!("0.0.0.0:{}", args.metrics_port);
    let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {}", metrics_addr))?;
    tracing::info!("Metrics server listening on {}", metrics_addr);

    // --- Serve ---
    tokio::select! {
        res = axum::serve(api_listener, api_router) => {
            if let Err(e) = res {
                tracing::error!("API server error: {}", e);
            }
        }
        res = axum::serve(metrics_listener, metrics_router) => {
            if let Err(e) = res {
                tracing::error!("Metrics server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received");
        }
    }

    tracing::info!("pramaan stopped");
    Ok(ExitCode::SUCCESS)
}

/// Prints version information to stdout.
fn print_version() {
    println!("pramaan   {}", env!("CARGO_PKG_VERSION"));
    println!("protocol  {}", pramaan_protocol::config::PROTOCOL_VERSION);
    println!(
        "proofs    {} over {}",
        pramaan_protocol::config::SIGNATURE_SCHEME,
        pramaan_protocol::config::DIGEST_ALGORITHM
    );
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_record_format() {
        let split = SplitIdentifier::new(1, 340282366920938463463374607431768211455);
        assert_eq!(
            format_conversion("alice", &split),
            "User ID: alice\n  High: 1\n  Low: 340282366920938463463374607431768211455\n-\n"
        );
    }

    #[test]
    fn exit_status_follows_outcome() {
        assert_eq!(verification_status(&Ok(())), 0);
        assert_eq!(
            verification_status(&Err(VerificationError::SignatureInvalid)),
            1
        );
        assert_eq!(verification_status(&Err(VerificationError::UnknownUser)), 1);
        assert_eq!(
            verification_status(&Err(VerificationError::StorageUnavailable)),
            2
        );
    }
}
