//! Outbound request description.
//!
//! # Responsibilities
//! - Describe a single downstream call independent of the HTTP client
//! - Carry the body in the encoding the downstream expects
//!
//! # Design Decisions
//! - Requests are cloneable so every retry attempt sends the same bytes

use reqwest::Method;
use url::Url;

/// Request body encodings supported by the downstream services.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

/// A downstream HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub body: RequestBody,
}

impl HttpRequest {
    /// Build a bodiless GET.
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            body: RequestBody::Empty,
        }
    }

    /// Build a POST carrying `body`.
    pub fn post(url: Url, body: RequestBody) -> Self {
        Self {
            method: Method::POST,
            url,
            body,
        }
    }
}
