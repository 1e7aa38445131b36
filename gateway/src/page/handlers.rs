use warp::{Filter, Rejection, Reply};
use tracing::{info, warn};

use super::{QueryPage, Renderer, SearchState};
use crate::models::SearchForm;
use crate::proxy::Forwarder;

pub fn routes(
    renderer: Renderer,
    forwarder: Forwarder,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let index = warp::path::end()
        .and(warp::get())
        .and(with_renderer(renderer.clone()))
        .and_then(handle_index);

    let search = warp::path::end()
        .and(warp::post())
        .and(warp::body::form())
        .and(with_renderer(renderer))
        .and(with_forwarder(forwarder))
        .and_then(handle_search);

    index.or(search)
}

pub async fn handle_index(renderer: Renderer) -> Result<impl Reply, Rejection> {
    let html = renderer.render(&QueryPage::new()).map_err(warp::reject::custom)?;
    Ok(warp::reply::html(html))
}

/// Form submission without scripting: search in-process, render the outcome.
pub async fn handle_search(
    form: SearchForm,
    renderer: Renderer,
    forwarder: Forwarder,
) -> Result<impl Reply, Rejection> {
    let mut page = QueryPage::new();
    page.set_query(form.query);
    info!("Page search: {}", page.query());

    let request = page.submit();
    let outcome = forwarder.search(&request).await;
    page.apply(outcome);
    if let SearchState::Failed { error, .. } = page.state() {
        warn!("Page search failed: {}", error);
    }

    let html = renderer.render(&page).map_err(warp::reject::custom)?;
    Ok(warp::reply::html(html))
}

fn with_renderer(
    renderer: Renderer,
) -> impl Filter<Extract = (Renderer,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || renderer.clone())
}

fn with_forwarder(
    forwarder: Forwarder,
) -> impl Filter<Extract = (Forwarder,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || forwarder.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Metrics;
    use crate::proxy::testing::{dead_backend, spawn_backend};
    use serde_json::json;
    use warp::http::StatusCode;

    fn app(backend_url: String) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
        let forwarder = Forwarder::new(backend_url, None, Metrics::new().unwrap()).unwrap();
        routes(Renderer::new().unwrap(), forwarder)
    }

    #[tokio::test]
    async fn index_renders_an_empty_page() {
        let res = warp::test::request()
            .method("GET")
            .path("/")
            .reply(&app(dead_backend()))
            .await;

        assert_eq!(res.status(), StatusCode::OK);
        let html = String::from_utf8(res.body().to_vec()).unwrap();
        assert!(html.contains("Ask something from the PDF..."));
        assert!(!html.contains(r#"class="result""#));
    }

    #[tokio::test]
    async fn form_search_renders_backend_results() {
        let (url, seen) = spawn_backend(
            200,
            r#"{"results":[{"text":"Donate every 56 days.","images":["images/page2_img1.png "]}]}"#,
        );

        let res = warp::test::request()
            .method("POST")
            .path("/")
            .header("content-type", "application/x-www-form-urlencoded")
            .body("query=how+often+can+I+donate%3F")
            .reply(&app(url))
            .await;

        assert_eq!(res.status(), StatusCode::OK);
        let html = String::from_utf8(res.body().to_vec()).unwrap();
        assert!(html.contains("<p>Donate every 56 days.</p>"));
        assert!(html.contains(r#"src="/images/page2_img1.png""#));
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            [json!({"query": "how often can I donate?"})]
        );
    }

    #[tokio::test]
    async fn long_form_query_is_forwarded_whole() {
        let (url, seen) = spawn_backend(200, r#"{"results":[]}"#);
        let query = "b".repeat(64 * 1024);

        let res = warp::test::request()
            .method("POST")
            .path("/")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(format!("query={}", query))
            .reply(&app(url))
            .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(seen.lock().unwrap().as_slice(), [json!({ "query": query })]);
    }

    #[tokio::test]
    async fn form_search_surfaces_backend_failure() {
        let res = warp::test::request()
            .method("POST")
            .path("/")
            .header("content-type", "application/x-www-form-urlencoded")
            .body("query=anything")
            .reply(&app(dead_backend()))
            .await;

        assert_eq!(res.status(), StatusCode::OK);
        let html = String::from_utf8(res.body().to_vec()).unwrap();
        assert!(html.contains("Backend unreachable"));
        assert!(!html.contains(r#"class="error" hidden"#));
        assert!(html.contains(r#"value="anything""#));
    }
}
