use reqwest::header::ACCEPT;
use reqwest::{Method, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, warn};

use super::errors::ApiError;
use super::retry::RetryPolicy;
use crate::config::Config;

const REFRESH_PATH: &str = "/auth/refresh";

/// Authenticated JSON client for the backend. Session credentials live in the
/// cookie store; a 401 triggers one refresh and one replay of the request.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    retry_policy: RetryPolicy,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        Self::with_base_url(
            config.api_base_url(),
            Duration::from_secs(config.api.request_timeout_secs),
        )
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(ApiError::from_reqwest)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry_policy: RetryPolicy::default(),
        })
    }

    /// Replace the retry policy used for reads
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET and decode, retrying transient failures
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.retry_policy
            .execute(&format!("GET {}", path), move || async move {
                let response = self.send(Method::GET, path, None).await?;
                response
                    .json::<T>()
                    .await
                    .map_err(|e| ApiError::Parse(e.to_string()))
            })
            .await
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.post_raw(path, body).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// POST when the response body does not matter
    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        self.post_raw(path, body).await.map(|_| ())
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(Method::DELETE, path, None).await.map(|_| ())
    }

    async fn post_raw<B: Serialize>(&self, path: &str, body: &B) -> Result<Response, ApiError> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Parse(e.to_string()))?;
        self.send(Method::POST, path, Some(&body)).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Response, ApiError> {
        let response = self.send_once(method.clone(), path, body).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::check(response).await;
        }

        debug!("{} {} returned 401, refreshing session", method, path);
        self.refresh_session().await?;

        let response = self.send_once(method, path, body).await?;
        Self::check(response).await
    }

    async fn send_once(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Response, ApiError> {
        let mut request = self
            .client
            .request(method, self.url(path))
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }
        request.send().await.map_err(ApiError::from_reqwest)
    }

    async fn refresh_session(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url(REFRESH_PATH))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        let status = response.status();
        if status.is_success() {
            debug!("Session refreshed");
            Ok(())
        } else {
            warn!("Session refresh failed with {}", status);
            Err(ApiError::Authentication {
                status: status.as_u16(),
                message: "session refresh failed".to_string(),
            })
        }
    }

    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status.as_u16(), body))
    }
}
