//! HTTP transport - executes the assembled request and captures the response

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;

/// Everything the transport hands back
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransportResponse {
    pub status_code: u16,
    /// Reason phrase, e.g. "Not Found"
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub elapsed: Duration,
    pub raw_body: Vec<u8>,
}

impl TransportResponse {
    /// First header value, case-insensitive
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// All values of a header, case-insensitive
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
            .collect()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE.as_str())
    }
}

/// What was sent, for display
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestSummary {
    pub method: String,
    pub url: String,
    pub body: String,
}

/// One request/response pair
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Exchange {
    pub request: RequestSummary,
    pub response: TransportResponse,
}

/// Sends one request; connection handling, TLS and redirects live behind it
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, method: &str, url: &str, body: Option<Vec<u8>>) -> Result<TransportResponse>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        HttpTransport {
            client: create_client(),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        HttpTransport { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    async fn send(&self, method: &str, url: &str, body: Option<Vec<u8>>) -> Result<TransportResponse> {
        let method = Method::from_bytes(method.to_uppercase().as_bytes())
            .with_context(|| format!("invalid HTTP method {:?}", method))?;

        let mut req_builder = self.client.request(method, url);
        if let Some(body) = body {
            req_builder = req_builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let start = Instant::now();
        let resp = req_builder.send().await.map_err(|e| {
            if e.is_connect() {
                anyhow::anyhow!("connection failed: {}", e)
            } else {
                anyhow::anyhow!("request failed: {}", e)
            }
        })?;

        let status = resp.status();
        let headers = resp
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let raw_body = resp.bytes().await.context("error reading body")?.to_vec();
        let elapsed = start.elapsed();

        Ok(TransportResponse {
            status_code: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            elapsed,
            raw_body,
        })
    }
}

/// Create an HTTP client with default configuration
pub fn create_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!("opcall/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
