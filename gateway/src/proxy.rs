//! Forwarding to the RAG backend.
//!
//! Every outbound call goes through [`Forwarder::forward`]: one request out,
//! the backend's status and body back, nothing re-shaped. The only check made
//! on the way back is that the body parses as JSON.

use bytes::Bytes;
use reqwest::Method;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{error, info};
use uuid::Uuid;
use warp::http::StatusCode;

use crate::error::ApiError;
use crate::metrics::Metrics;
use crate::models::{QueryRequest, QueryResponse};

/// What came back from the backend.
#[derive(Debug, Clone)]
pub struct Relayed {
    pub status: StatusCode,
    pub body: Bytes,
}

impl Relayed {
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

#[derive(Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    backend_url: String,
    metrics: Metrics,
}

impl Forwarder {
    pub fn new(
        backend_url: impl Into<String>,
        timeout: Option<Duration>,
        metrics: Metrics,
    ) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            backend_url: backend_url.into(),
            metrics,
        })
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    /// Issues one request to `{backend_url}{path}` and relays status and body.
    pub async fn forward(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<Relayed, ApiError> {
        let request_id = Uuid::new_v4();
        let route = path.trim_start_matches('/');
        let url = format!("{}{}", self.backend_url, path);
        info!("Forwarding [{}] {} {}", request_id, method, url);

        let started = Instant::now();
        let result = self.send(method, &url, payload).await;
        let elapsed = started.elapsed();

        match &result {
            Ok(relayed) => {
                info!(
                    "Backend answered [{}] {} in {:?}",
                    request_id, relayed.status, elapsed
                );
                self.metrics.observe(route, "ok", elapsed);
            }
            Err(e) => {
                error!("Backend call failed [{}]: {}", request_id, e);
                self.metrics.observe(route, e.kind(), elapsed);
            }
        }

        result
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        payload: Option<&Value>,
    ) -> Result<Relayed, ApiError> {
        let mut request = self.client.request(method, url);
        if let Some(payload) = payload {
            // .json() also sets Content-Type: application/json
            request = request.json(payload);
        }

        let res = request.send().await?;
        let status = res.status();
        let body = res.bytes().await?;

        if let Err(cause) = serde_json::from_slice::<serde::de::IgnoredAny>(&body) {
            return Err(ApiError::MalformedUpstream {
                status: status.as_u16(),
                cause,
            });
        }

        Ok(Relayed { status, body })
    }

    /// `POST /query` with `{ "query": ... }`.
    pub async fn query(&self, request: &QueryRequest) -> Result<Relayed, ApiError> {
        let payload = serde_json::to_value(request)?;
        self.forward(Method::POST, "/query", Some(&payload)).await
    }

    /// Typed search used by the server-rendered page. A non-2xx answer is an
    /// error here, since there are no results to show.
    pub async fn search(&self, request: &QueryRequest) -> Result<QueryResponse, ApiError> {
        let relayed = self.query(request).await?;
        if !relayed.status.is_success() {
            return Err(ApiError::UpstreamStatus(relayed.status.as_u16()));
        }
        relayed.json()
    }

    /// `GET /debug` on the backend.
    pub async fn debug(&self) -> Result<Relayed, ApiError> {
        self.forward(Method::GET, "/debug", None).await
    }
}
