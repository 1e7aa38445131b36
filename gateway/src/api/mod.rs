use warp::{Filter, Rejection, Reply};
use crate::proxy::{Forwarder, Relayed};

mod debug;
mod query;

pub fn routes(
    forwarder: Forwarder,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let api = warp::path("api");

    let query_route = api
        .and(warp::path("query"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::bytes())
        .and(with_forwarder(forwarder.clone()))
        .and_then(query::handle_query);

    let debug_route = api
        .and(warp::path("debug"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_forwarder(forwarder))
        .and_then(debug::handle_debug);

    query_route.or(debug_route)
}

fn with_forwarder(
    forwarder: Forwarder,
) -> impl Filter<Extract = (Forwarder,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || forwarder.clone())
}

/// Backend status and body, as JSON.
fn relay(relayed: Relayed) -> impl Reply {
    warp::reply::with_header(
        warp::reply::with_status(relayed.body.to_vec(), relayed.status),
        "content-type",
        "application/json",
    )
}
