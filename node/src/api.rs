//! # REST API
//!
//! Builds the axum router that exposes proof verification over HTTP.
//! All endpoints share application state through axum's `State` extractor.
//!
//! ## Endpoints
//!
//! | Method | Path                         | Description                        |
//! |--------|------------------------------|------------------------------------|
//! | GET    | `/health`                    | Liveness probe                     |
//! | POST   | `/verify`                    | Check a proof for a user           |
//! | POST   | `/encode`                    | Split a DID hash into high/low     |
//! | GET    | `/identities/:user_id/split` | Split form of an enrolled DID      |
//!
//! Verification reads the identity store and does RSA arithmetic, both
//! blocking, so handlers hand it to `spawn_blocking`. A rejected proof is
//! a normal answer (200 with `valid: false`); only an unreadable store is
//! reported as a server-side failure (503).

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use pramaan_protocol::config::VERIFY_REQUEST_TIMEOUT;
use pramaan_protocol::identity::encode;
use pramaan_protocol::{IdentityStore, ProofVerifier, VerificationError};

use crate::metrics::SharedMetrics;

// ---------------------------------------------------------------------------
// Application State
// ---------------------------------------------------------------------------

/// Type-erased identity store, so the JSON and sled backends share one router.
pub type SharedStore = Arc<dyn IdentityStore>;

/// Shared application state available to all request handlers.
///
/// Cheap to clone: everything behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The verifier over the configured identity store.
    pub verifier: Arc<ProofVerifier<SharedStore>>,
    /// Reference to Prometheus metrics for in-handler recording.
    pub metrics: SharedMetrics,
}

impl AppState {
    pub fn new(store: SharedStore, metrics: SharedMetrics) -> Self {
        Self {
            verifier: Arc::new(ProofVerifier::new(store)),
            metrics,
        }
    }
}

// ---------------------------------------------------------------------------
// Router Construction
// ---------------------------------------------------------------------------

/// Builds the full axum [`Router`] with all API routes, CORS, tracing and
/// the request timeout.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/verify", post(verify_handler))
        .route("/encode", post(encode_handler))
        .route("/identities/:user_id/split", get(split_handler))
        .layer(TimeoutLayer::new(VERIFY_REQUEST_TIMEOUT))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / Response Types
// ---------------------------------------------------------------------------

/// Body of `POST /verify`.
#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub user_id: String,
    /// Hex-encoded proof.
    pub signature: String,
}

/// Response payload for `POST /verify`.
#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub user_id: String,
    pub valid: bool,
    /// Rejection reason code; absent when `valid` is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// RFC 3339 timestamp of the decision.
    pub verified_at: String,
}

/// Body of `POST /encode`.
#[derive(Debug, Serialize, Deserialize)]
pub struct EncodeRequest {
    pub hash: String,
}

/// Response payload for `GET /identities/:user_id/split`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SplitResponse {
    pub user_id: String,
    pub did: String,
    /// Upper 128 bits, decimal.
    pub high: String,
    /// Lower 128 bits, decimal.
    pub low: String,
}

/// Generic error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /health`: returns 200 if the service is alive.
///
/// Does not touch the identity store.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// `POST /verify`: check a proof.
async fn verify_handler(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> Response {
    let verifier = Arc::clone(&state.verifier);
    let user_id = req.user_id.clone();
    let started = Instant::now();

    let outcome =
        match tokio::task::spawn_blocking(move || verifier.check(&req.user_id, &req.signature))
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("verification task failed: {}", e);
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, "verification failed");
            }
        };
    state
        .metrics
        .record_verification(&outcome, started.elapsed());

    let status = match outcome {
        Err(VerificationError::StorageUnavailable) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    };
    let resp = VerifyResponse {
        user_id,
        valid: outcome.is_ok(),
        reason: outcome.err().map(|e| e.reason().to_string()),
        verified_at: chrono::Utc::now().to_rfc3339(),
    };
    (status, Json(resp)).into_response()
}

/// `POST /encode`: split a 64-hex hash. 400 on malformed input.
async fn encode_handler(
    State(state): State<AppState>,
    Json(req): Json<EncodeRequest>,
) -> Response {
    match encode(&req.hash) {
        Ok(split) => {
            state.metrics.encodes_total.inc();
            (StatusCode::OK, Json(split)).into_response()
        }
        Err(e) => {
            state.metrics.encode_errors_total.inc();
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}

/// `GET /identities/:user_id/split`: the split form of an enrolled DID.
///
/// Returns 404 if the user has no DID, 503 if the store cannot be read.
async fn split_handler(Path(user_id): Path<String>, State(state): State<AppState>) -> Response {
    let verifier = Arc::clone(&state.verifier);
    let lookup_id = user_id.clone();
    let lookup =
        tokio::task::spawn_blocking(move || verifier.store().find_did(&lookup_id)).await;

    match lookup {
        Ok(Ok(Some(did))) => {
            let split = did.split();
            let resp = SplitResponse {
                user_id,
                did: did.to_string(),
                high: split.high.to_string(),
                low: split.low.to_string(),
            };
            (StatusCode::OK, Json(resp)).into_response()
        }
        Ok(Ok(None)) => error_response(
            StatusCode::NOT_FOUND,
            format!("No DID enrolled for user {}", user_id),
        ),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "identity store read failed");
            error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                VerificationError::StorageUnavailable.to_string(),
            )
        }
        Err(e) => {
            tracing::error!("lookup task failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "lookup failed")
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
