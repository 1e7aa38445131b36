use serde::{Deserialize, Serialize};
use serde_json::Value;

// API Request/Response models

/// Body of `POST /api/query`, forwarded to the backend as-is.
///
/// `query` is kept as raw JSON: whatever the caller sent is what the backend
/// sees. A missing field stays missing on the way out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Value>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: Some(Value::String(query.into())) }
    }

    /// Reads `query` out of any JSON body, whatever its Content-Type.
    /// A body that is valid JSON but not an object carries no query.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        let query = match serde_json::from_slice::<Value>(body)? {
            Value::Object(mut fields) => fields.remove("query"),
            _ => None,
        };
        Ok(Self { query })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

/// One snippet returned by the RAG backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Value>,
}

/// Form body of a no-script `POST /`.
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub query: String,
}
