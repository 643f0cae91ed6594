//! HTTP transport seam
//!
//! The feed client talks to the wire through the [`HttpTransport`] trait so
//! the whole request/response path can be exercised in tests without a live
//! service. [`ReqwestTransport`] is the default implementation.

use crate::error::Result;

/// HTTP method of a feed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Wire form of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// A fully prepared request: resolved URL, headers attached, body encoded
#[derive(Debug, Clone)]
pub struct FeedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// The parts of a response the client inspects
#[derive(Debug, Clone)]
pub struct FeedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

/// Trait for HTTP backends
pub trait HttpTransport: Send {
    /// Execute one request and return status, content type and body.
    ///
    /// Implementations must not treat failure statuses as errors; status
    /// classification is the client's job.
    fn execute(&self, request: &FeedRequest) -> Result<FeedResponse>;
}

/// Default transport over a blocking reqwest client
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        ReqwestTransport {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for ReqwestTransport {
    fn execute(&self, request: &FeedRequest) -> Result<FeedResponse> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let body = response.text()?;

        Ok(FeedResponse {
            status,
            content_type,
            body,
        })
    }
}
