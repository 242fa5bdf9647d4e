// src/utils/http.rs

//! HTTP fetch primitive with timeout, retries and rate-limit backoff.
//!
//! The pipeline only sees the [`Fetch`] trait: a URL goes in, a status code and
//! a body come out. Retry policy lives entirely in [`HttpFetcher`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, RETRY_AFTER};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::FetchConfig;

/// Raw response from a provider API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Opaque request/response primitive consumed by the provider connectors.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// GET `url` expecting JSON; transport failures are errors, HTTP statuses are not.
    async fn get(&self, url: &str) -> Result<FetchResponse>;
}

/// GET `url` and parse a 2xx JSON body; non-2xx becomes [`AppError::Fetch`].
pub async fn get_json(fetcher: &dyn Fetch, url: &str, context: &str) -> Result<Value> {
    let response = fetcher.get(url).await?;
    if !response.is_success() {
        return Err(AppError::fetch(context, response.status));
    }
    response.json()
}

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &FetchConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// reqwest-backed [`Fetch`] with bounded retries.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    retries: u32,
    retry_backoff: Duration,
    rate_limit_backoff: Duration,
    max_retry_wait: Duration,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        Ok(Self::with_client(create_async_client(config)?, config))
    }

    pub fn with_client(client: Client, config: &FetchConfig) -> Self {
        Self {
            client,
            retries: config.retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
            rate_limit_backoff: Duration::from_millis(config.rate_limit_backoff_ms),
            max_retry_wait: Duration::from_millis(config.max_retry_wait_ms),
        }
    }

    /// Wait before retrying a 429: `Retry-After` seconds, else linear backoff; capped.
    fn rate_limit_delay(&self, response: &Response, attempt: u32) -> Duration {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        retry_after
            .unwrap_or(self.rate_limit_backoff * (attempt + 1))
            .min(self.max_retry_wait)
    }

    fn retry_delay(&self, attempt: u32) -> Duration {
        (self.retry_backoff * (attempt + 1)).min(self.max_retry_wait)
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse> {
        let mut attempt = 0;

        loop {
            match self
                .client
                .get(url)
                .header(ACCEPT, "application/json")
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if attempt < self.retries {
                        if status == StatusCode::TOO_MANY_REQUESTS {
                            let delay = self.rate_limit_delay(&response, attempt);
                            log::debug!("{} rate limited, retrying in {:?}", url, delay);
                            tokio::time::sleep(delay).await;
                            attempt += 1;
                            continue;
                        }
                        if status.is_server_error() {
                            let delay = self.retry_delay(attempt);
                            log::debug!("{} responded {}, retrying in {:?}", url, status, delay);
                            tokio::time::sleep(delay).await;
                            attempt += 1;
                            continue;
                        }
                    }

                    let body = response.text().await?;
                    return Ok(FetchResponse::new(status.as_u16(), body));
                }
                Err(e) if attempt < self.retries => {
                    let delay = self.retry_delay(attempt);
                    log::debug!("{} failed ({}), retrying in {:?}", url, e, delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
