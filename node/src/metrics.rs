//! # Prometheus Metrics
//!
//! Verification and encoding counters for the `serve` subcommand, scraped
//! at `/metrics` on the metrics port.
//!
//! All metrics are registered in a dedicated [`prometheus::Registry`] so they
//! do not collide with any default global registry consumers.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::Duration;

use pramaan_protocol::VerificationError;

/// Outcome label for accepted proofs.
pub const OUTCOME_VALID: &str = "valid";

/// Holds all Prometheus metric handles for the service.
#[derive(Clone)]
pub struct NodeMetrics {
    /// Prometheus registry that owns all metrics below.
    registry: Registry,
    /// Verifications by outcome: `valid` or a rejection reason code.
    pub verifications_total: IntCounterVec,
    /// Successful `/encode` calls.
    pub encodes_total: IntCounter,
    /// `/encode` calls rejected for malformed input.
    pub encode_errors_total: IntCounter,
    /// Time spent inside the verifier, store reads included.
    pub verification_latency_seconds: Histogram,
}

impl NodeMetrics {
    /// Creates and registers all metrics. Call once at startup.
    pub fn new() -> Self {
        let registry = Registry::new_custom(Some("pramaan".into()), None)
            .expect("failed to create prometheus registry");

        let verifications_total = IntCounterVec::new(
            Opts::new(
                "verifications_total",
                "Proof verifications by outcome (valid or rejection reason)",
            ),
            &["outcome"],
        )
        .expect("metric creation");
        registry
            .register(Box::new(verifications_total.clone()))
            .expect("metric registration");

        let encodes_total = IntCounter::new("encodes_total", "DID hashes split into high/low")
            .expect("metric creation");
        registry
            .register(Box::new(encodes_total.clone()))
            .expect("metric registration");

        let encode_errors_total = IntCounter::new(
            "encode_errors_total",
            "Encode requests rejected for malformed input",
        )
        .expect("metric creation");
        registry
            .register(Box::new(encode_errors_total.clone()))
            .expect("metric registration");

        // RSA verification is sub-millisecond; the upper buckets catch slow
        // stores.
        let verification_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "verification_latency_seconds",
                "Proof verification latency in seconds",
            )
            .buckets(vec![
                0.0001, 0.00025, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.05, 0.25, 1.0,
            ]),
        )
        .expect("metric creation");
        registry
            .register(Box::new(verification_latency_seconds.clone()))
            .expect("metric registration");

        Self {
            registry,
            verifications_total,
            encodes_total,
            encode_errors_total,
            verification_latency_seconds,
        }
    }

    /// Count one verification and its latency.
    pub fn record_verification(&self, outcome: &Result<(), VerificationError>, elapsed: Duration) {
        let label = match outcome {
            Ok(()) => OUTCOME_VALID,
            Err(e) => e.reason(),
        };
        self.verifications_total.with_label_values(&[label]).inc();
        self.verification_latency_seconds
            .observe(elapsed.as_secs_f64());
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared metrics state passed to axum handlers.
pub type SharedMetrics = Arc<NodeMetrics>;

/// Axum handler that renders `/metrics` in Prometheus text format.
///
/// Returns HTTP 500 if encoding fails.
pub async fn metrics_handler(
    axum::extract::State(metrics): axum::extract::State<SharedMetrics>,
) -> impl IntoResponse {
    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed").into_response()
        }
    }
}
