use thiserror::Error;
use warp::{http::StatusCode, reject::Reject, Reply, Rejection};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Backend unreachable: {0}")]
    Upstream(reqwest::Error),

    #[error("Backend timed out: {0}")]
    UpstreamTimeout(reqwest::Error),

    #[error("Backend returned a non-JSON body (status {status}): {cause}")]
    MalformedUpstream {
        status: u16,
        cause: serde_json::Error,
    },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Backend answered with status {0}")]
    UpstreamStatus(u16),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    RenderError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::UpstreamTimeout(err)
        } else {
            ApiError::Upstream(err)
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Upstream(_)
            | ApiError::MalformedUpstream { .. }
            | ApiError::UpstreamStatus(_) => StatusCode::BAD_GATEWAY,
            ApiError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Outcome label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Upstream(_) => "upstream_unreachable",
            ApiError::UpstreamTimeout(_) => "upstream_timeout",
            ApiError::MalformedUpstream { .. } => "upstream_malformed",
            ApiError::UpstreamStatus(_) => "upstream_status",
            ApiError::BadRequest(_) => "bad_request",
            _ => "internal",
        }
    }
}

impl Reject for ApiError {}

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Rejection> {
    if let Some(api_err) = err.find::<ApiError>() {
        let message = match api_err {
            ApiError::Upstream(_)
            | ApiError::MalformedUpstream { .. }
            | ApiError::UpstreamStatus(_) => "Bad gateway",
            ApiError::UpstreamTimeout(_) => "Gateway timeout",
            ApiError::BadRequest(_) => "Bad request",
            _ => "Internal server error",
        };

        let json = warp::reply::json(&serde_json::json!({
            "error": message,
            "details": api_err.to_string(),
        }));

        Ok(warp::reply::with_status(json, api_err.status()))
    } else {
        Err(err)
    }
}
