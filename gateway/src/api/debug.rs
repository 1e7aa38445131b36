use warp::{Rejection, Reply};
use tracing::info;

use crate::proxy::Forwarder;

pub async fn handle_debug(forwarder: Forwarder) -> Result<impl Reply, Rejection> {
    info!("Fetching backend debug snapshot");
    let relayed = forwarder.debug().await.map_err(warp::reject::custom)?;
    Ok(super::relay(relayed))
}
