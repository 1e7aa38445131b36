use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::time::Duration;

use crate::error::ApiError;

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    upstream_requests: IntCounterVec,
    upstream_duration: HistogramVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let upstream_requests = IntCounterVec::new(
            Opts::new(
                "gateway_upstream_requests_total",
                "Requests forwarded to the RAG backend",
            ),
            &["route", "outcome"],
        )?;
        let upstream_duration = HistogramVec::new(
            HistogramOpts::new(
                "gateway_upstream_duration_seconds",
                "Time spent waiting on the RAG backend",
            ),
            &["route"],
        )?;

        registry.register(Box::new(upstream_requests.clone()))?;
        registry.register(Box::new(upstream_duration.clone()))?;

        Ok(Self { registry, upstream_requests, upstream_duration })
    }

    pub fn observe(&self, route: &str, outcome: &str, elapsed: Duration) {
        self.upstream_requests
            .with_label_values(&[route, outcome])
            .inc();
        self.upstream_duration
            .with_label_values(&[route])
            .observe(elapsed.as_secs_f64());
    }

    /// Prometheus text exposition of everything in the registry.
    pub fn encode(&self) -> Result<(Vec<u8>, String), ApiError> {
        let encoder = TextEncoder::new();
        let mut buffer = vec![];
        encoder
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| ApiError::InternalError(format!("metrics encoding failed: {}", e)))?;
        Ok((buffer, encoder.format_type().to_string()))
    }
}
