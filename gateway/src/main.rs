use std::path::Path;
use warp::{Filter, Rejection, Reply};
use tracing::info;

mod api;
mod config;
mod error;
mod metrics;
mod middleware;
mod models;
mod page;
mod proxy;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = config::Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level))
        )
        .json()
        .init();

    info!("Starting RAG gateway");

    let metrics = metrics::Metrics::new()?;
    let forwarder = proxy::Forwarder::new(
        config.backend_url.clone(),
        config.backend_timeout,
        metrics.clone(),
    )?;
    info!("Forwarding to backend at {}", forwarder.backend_url());

    let renderer = page::Renderer::new()?;

    let routes = app(&config.public_dir, metrics, forwarder, renderer);
    info!("Serving static files from {}", config.public_dir.display());

    // Start server
    let addr = ([0, 0, 0, 0], config.port);
    info!("Server listening on {}", addr.1);

    warp::serve(routes)
        .run(addr)
        .await;

    Ok(())
}

fn app(
    public_dir: &Path,
    metrics: metrics::Metrics,
    forwarder: proxy::Forwarder,
    renderer: page::Renderer,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let api_routes = api::routes(forwarder.clone())
        .with(warp::log("api"))
        .with(middleware::cors());

    let page_routes = page::routes(renderer, forwarder);

    // Health check route
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({"status": "healthy"})));

    // Metrics route
    let metrics_route = warp::path("metrics")
        .and(warp::get())
        .and_then(move || {
            let metrics = metrics.clone();
            async move {
                let (buffer, content_type) = metrics.encode().map_err(warp::reject::custom)?;
                Ok::<_, Rejection>(warp::reply::with_header(
                    buffer,
                    "Content-Type",
                    content_type,
                ))
            }
        });

    // Images and anything else the backend's paths point at
    let assets = warp::get().and(warp::fs::dir(public_dir.to_path_buf()));

    health
        .or(metrics_route)
        .or(api_routes)
        .or(page_routes)
        .or(assets)
        .recover(error::handle_rejection)
}
