use bytes::Bytes;
use warp::{Rejection, Reply};
use tracing::info;

use crate::error::ApiError;
use crate::models::QueryRequest;
use crate::proxy::Forwarder;

pub async fn handle_query(
    body: Bytes,
    forwarder: Forwarder,
) -> Result<impl Reply, Rejection> {
    let request = QueryRequest::from_body(&body)
        .map_err(|e| warp::reject::custom(ApiError::BadRequest(e.to_string())))?;

    match &request.query {
        Some(query) => info!("Proxying query: {}", query),
        None => info!("Proxying request without a query field"),
    }

    let relayed = forwarder.query(&request).await.map_err(warp::reject::custom)?;
    Ok(super::relay(relayed))
}
