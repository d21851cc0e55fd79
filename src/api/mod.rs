//! REST client for the museum registry backend.
//!
//! One handle per resource (`organizations()`, `museums()`, `activities()`,
//! `labor()`), all sharing a single `reqwest` client. Every read goes
//! through [`transform`] before it reaches the caller; failures come back as
//! [`ApiError`] and are never retried.

mod activities;
mod error;
mod labor;
mod museums;
mod organizations;
pub mod transform;

pub use activities::Activities;
pub use error::ApiError;
pub use labor::Labor;
pub use museums::{MuseumFilters, Museums};
pub use organizations::{OrganizationFilters, Organizations};

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;

/// HTTP client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        Self::with_base_url(&config.api_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn organizations(&self) -> Organizations<'_> {
        Organizations::new(self)
    }

    pub fn museums(&self) -> Museums<'_> {
        Museums::new(self)
    }

    pub fn activities(&self) -> Activities<'_> {
        Activities::new(self)
    }

    pub fn labor(&self) -> Labor<'_> {
        Labor::new(self)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!(%method, %url, "api request");
        self.client
            .request(method, url)
            .header("Content-Type", "application/json")
    }

    fn request_with_query(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
    ) -> RequestBuilder {
        let req = self.request(method, path);
        if query.is_empty() {
            req
        } else {
            req.query(query)
        }
    }

    /// GET and decode the body as raw JSON.
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        let response = self.request_with_query(Method::GET, path, query).send().await?;
        read_json(response).await
    }

    /// Send a JSON body and decode the JSON reply.
    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        let response = self.request(method, path).json(body).send().await?;
        read_json(response).await
    }

    /// Send a request whose reply body is ignored.
    async fn send_unit<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<(), ApiError> {
        let mut req = self.request_with_query(method, path, query);
        if let Some(body) = body {
            req = req.json(body);
        }
        let response = req.send().await?;
        check_status(response).await?;
        Ok(())
    }
}

/// Turn a non-2xx reply into `ApiError::Status`, keeping `{error}` if present.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let error = ApiError::from_status(status, &body);
    debug!(%status, %error, "api error response");
    Err(error)
}

async fn read_json(response: Response) -> Result<Value, ApiError> {
    let response = check_status(response).await?;
    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(&bytes)?)
}
