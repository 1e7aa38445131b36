//! The query page: input, search button, results list.

mod handlers;
mod render;

pub use handlers::routes;
pub use render::Renderer;

use crate::models::{QueryRequest, QueryResponse, SearchResult};

/// Outcome of the last search the page applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SearchState {
    #[default]
    Idle,
    Loaded(Vec<SearchResult>),
    /// The last search failed; `previous` is what was on screen before it.
    Failed {
        error: String,
        previous: Vec<SearchResult>,
    },
}

/// Page state. A fresh value is built on every mount.
#[derive(Debug, Clone, Default)]
pub struct QueryPage {
    query: String,
    state: SearchState,
}

impl QueryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Request for the current query, sent as typed.
    pub fn submit(&self) -> QueryRequest {
        QueryRequest::new(self.query.clone())
    }

    /// Applies a finished search. Outcomes land in the order they resolve,
    /// so with overlapping searches the last one to resolve is what shows.
    pub fn apply<E: std::fmt::Display>(&mut self, outcome: Result<QueryResponse, E>) {
        self.state = match outcome {
            Ok(response) => SearchState::Loaded(response.results),
            Err(e) => SearchState::Failed {
                error: e.to_string(),
                previous: self.results().to_vec(),
            },
        };
    }

    /// Results currently on screen.
    pub fn results(&self) -> &[SearchResult] {
        match &self.state {
            SearchState::Idle => &[],
            SearchState::Loaded(results) => results,
            SearchState::Failed { previous, .. } => previous,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SearchState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Root-relative path for an image name returned by the backend.
pub fn image_src(name: &str) -> String {
    format!("/{}", name.trim().trim_start_matches('/'))
}
