//! HTTP client implementation

use reqwest::{header, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::{
    config::HttpConfig,
    error::{HttpError, Result},
};

/// JSON client bound to one API root
pub struct HttpClient {
    inner: reqwest::Client,
    base_url: Url,
    config: HttpConfig,
}

impl HttpClient {
    /// Create a new HTTP client with configuration
    pub fn new(config: HttpConfig) -> Result<Self> {
        let mut base_url = config
            .base_url
            .parse::<Url>()
            .map_err(|e| HttpError::InvalidUrl(e.to_string()))?;
        // relative joins would otherwise replace the last path segment
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        if let Some(token) = &config.auth_token {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| HttpError::BuildError(e.to_string()))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .pool_idle_timeout(config.pool_idle_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| HttpError::BuildError(e.to_string()))?;

        Ok(Self {
            inner,
            base_url,
            config,
        })
    }

    /// Get configuration
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a path relative to the API root
    pub fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| HttpError::InvalidUrl(e.to_string()))
    }

    /// GET and decode a JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        decode(response).await
    }

    /// Send a JSON body and decode the JSON reply
    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self.send(method, path, Some(body)).await?;
        decode(response).await
    }

    /// Send a request whose reply body is ignored
    pub async fn send_empty<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<()>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.send(method, path, body).await?;
        Ok(())
    }

    /// Send a request and return the raw reply text
    pub async fn send_text<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<String>
    where
        B: Serialize + ?Sized + Sync,
    {
        let response = self.send(method, path, body).await?;
        Ok(response.text().await?)
    }

    async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Response>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.url(path)?;
        debug!("HTTP {}: {}", method, url);

        let mut request = self.inner.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(HttpError::RequestFailed)?;

        // Check for HTTP error status
        if !response.status().is_success() {
            return Err(HttpError::HttpStatus {
                status: response.status(),
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string()),
            });
        }

        Ok(response)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| HttpError::Decode(e.to_string()))
}
