//! DigitalOcean API client
//!
//! Thin JSON-over-HTTP layer with Bearer token authentication. Non-2xx
//! responses are decoded here into a single `CloudError` shape.

use crate::api::ApiErrorBody;
use doproxy_cloud::{CloudError, Result};
use reqwest::{Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const DEFAULT_API_URL: &str = "https://api.digitalocean.com";

/// DigitalOcean API client
#[derive(Clone)]
pub struct DigitalOceanClient {
    client: reqwest::Client,
    api_token: String,
    base_url: String,
}

impl DigitalOceanClient {
    /// Create a client against the public API
    pub fn new(api_token: impl Into<String>) -> Self {
        Self::with_base_url(api_token, DEFAULT_API_URL)
    }

    /// Create a client against another endpoint (proxies, tests)
    pub fn with_base_url(api_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_token: api_token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v2{}", self.base_url, path)
    }

    /// GET a resource
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        tracing::debug!("GET {}", path);
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(http_error)?;

        decode(response).await
    }

    /// GET a resource that may not exist
    pub async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        tracing::debug!("GET {}", path);
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(http_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        decode(response).await.map(Some)
    }

    /// POST a JSON body
    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        tracing::debug!("POST {}", path);
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.api_token)
            .json(body)
            .send()
            .await
            .map_err(http_error)?;

        decode(response).await
    }

    /// DELETE a resource
    pub async fn delete(&self, path: &str) -> Result<()> {
        tracing::debug!("DELETE {}", path);
        let response = self
            .client
            .delete(self.url(path))
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(http_error)?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }

    let body = response.text().await.map_err(http_error)?;
    Ok(serde_json::from_str(&body)?)
}

async fn api_error(response: Response) -> CloudError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let (id, message) = match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(err) => (err.id, err.message),
        Err(_) => ("unknown".to_string(), body),
    };

    match status {
        StatusCode::UNPROCESSABLE_ENTITY => CloudError::Unprocessable(message),
        StatusCode::UNAUTHORIZED => CloudError::AuthenticationFailed(message),
        StatusCode::NOT_FOUND => CloudError::NotFound(message),
        _ => CloudError::Api {
            status: status.as_u16(),
            id,
            message,
        },
    }
}

fn http_error(e: reqwest::Error) -> CloudError {
    CloudError::Http(e.to_string())
}
