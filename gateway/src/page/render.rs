use handlebars::Handlebars;
use serde::Serialize;
use std::sync::Arc;

use super::{image_src, QueryPage};
use crate::error::ApiError;
use crate::models::SearchResult;

const PAGE_TEMPLATE: &str = include_str!("../../templates/page.hbs");
const TITLE: &str = "📄 RAG Chatbot with Images";

#[derive(Serialize)]
struct PageView<'a> {
    title: &'a str,
    query: &'a str,
    error: Option<&'a str>,
    results: Vec<ResultView<'a>>,
}

#[derive(Serialize)]
struct ResultView<'a> {
    text: &'a str,
    caption: Option<String>,
    images: Vec<String>,
}

impl<'a> From<&'a SearchResult> for ResultView<'a> {
    fn from(result: &'a SearchResult) -> Self {
        let mut caption = Vec::new();
        if let Some(page) = result.page {
            caption.push(format!("page {}", page));
        }
        if let Some(distance) = result.distance {
            caption.push(format!("distance {:.3}", distance));
        }

        ResultView {
            text: &result.text,
            caption: (!caption.is_empty()).then(|| caption.join(" · ")),
            images: result.images.iter().map(|name| image_src(name)).collect(),
        }
    }
}

/// Compiled page template, shared across requests.
#[derive(Clone)]
pub struct Renderer {
    registry: Arc<Handlebars<'static>>,
}

impl Renderer {
    pub fn new() -> Result<Self, ApiError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry
            .register_template_string("page", PAGE_TEMPLATE)
            .map_err(|e| ApiError::RenderError(e.to_string()))?;

        Ok(Self { registry: Arc::new(registry) })
    }

    pub fn render(&self, page: &QueryPage) -> Result<String, ApiError> {
        let view = PageView {
            title: TITLE,
            query: page.query(),
            error: page.error(),
            results: page.results().iter().map(ResultView::from).collect(),
        };

        self.registry
            .render("page", &view)
            .map_err(|e| ApiError::RenderError(e.to_string()))
    }
}
