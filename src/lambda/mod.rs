// src/lambda/mod.rs

//! AWS Lambda handler for the search API.
//!
//! Accepts API Gateway proxy events:
//! - `POST` with the JSON query as the body
//! - `GET` with the URL-encoded JSON query in `?q=`
//! - any path ending in `/health` for a liveness probe
//! - `OPTIONS` answered with an empty 204

use std::collections::HashMap;
use std::sync::Arc;

use lambda_runtime::{Error as LambdaError, LambdaEvent};
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::error::Result;
use crate::models::{Config, Filters, HealthResponse, SearchResponse};
use crate::pipeline::SearchEngine;
use crate::utils::{HttpFetcher, LogSink};

/// API Gateway proxy request (only the fields we read).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    #[serde(default)]
    pub http_method: Option<String>,

    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
}

/// API Gateway proxy response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl ProxyResponse {
    fn json<T: Serialize>(status_code: u16, payload: &T) -> Self {
        match serde_json::to_string(payload) {
            Ok(body) => Self::with_body(status_code, body),
            Err(e) => {
                error!("Response serialization failed: {}", e);
                Self::with_body(500, r#"{"ok":false,"error":"Internal error"}"#.to_string())
            }
        }
    }

    fn with_body(status_code: u16, body: String) -> Self {
        let headers =
            HashMap::from([("Content-Type".to_string(), "application/json".to_string())]);
        Self {
            status_code,
            headers,
            body,
        }
    }

    fn no_content() -> Self {
        Self::with_body(204, String::new())
    }
}

impl ProxyRequest {
    fn method(&self) -> &str {
        self.http_method.as_deref().unwrap_or("GET")
    }

    fn is_health_check(&self) -> bool {
        self.path
            .as_deref()
            .is_some_and(|path| path.trim_end_matches('/').ends_with("/health"))
    }

    /// The raw `q` parameter, percent-decoded unless it is already JSON.
    fn query_param(&self) -> Option<String> {
        let raw = self.query_string_parameters.as_ref()?.get("q")?;
        if raw.trim_start().starts_with('{') {
            return Some(raw.clone());
        }
        match percent_decode_str(raw).decode_utf8() {
            Ok(decoded) => Some(decoded.into_owned()),
            Err(e) => {
                warn!("Query parameter is not valid UTF-8 once decoded: {}", e);
                Some(raw.clone())
            }
        }
    }

    /// Parse the search query from the body (POST) or `q` (everything else).
    pub fn filters(&self) -> Result<Filters> {
        let raw = if self.method().eq_ignore_ascii_case("POST") {
            self.body.clone()
        } else {
            self.query_param()
        };
        match raw.filter(|s| !s.trim().is_empty()) {
            Some(raw) => Filters::from_json(&raw),
            None => Ok(Filters::default()),
        }
    }
}

/// Build configuration from defaults plus environment overrides.
pub fn load_lambda_config() -> Result<Config> {
    let mut config = Config::default();
    config.apply_env(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}

/// Route one request through `engine`.
pub async fn respond(request: &ProxyRequest, engine: &SearchEngine) -> ProxyResponse {
    if request.method().eq_ignore_ascii_case("OPTIONS") {
        return ProxyResponse::no_content();
    }
    if request.is_health_check() {
        return ProxyResponse::json(200, &HealthResponse::now());
    }

    let result = match request.filters() {
        Ok(filters) => engine.search(&filters).await,
        Err(e) => Err(e),
    };
    let (status, payload) = SearchResponse::from_result(result);
    ProxyResponse::json(status, &payload)
}

/// Main Lambda handler function.
#[instrument(skip(event))]
pub async fn handler(
    event: LambdaEvent<ProxyRequest>,
) -> std::result::Result<ProxyResponse, LambdaError> {
    let start = std::time::Instant::now();
    let (request, _context) = event.into_parts();

    info!(
        "Received {} {}",
        request.method(),
        request.path.as_deref().unwrap_or("/")
    );

    let engine = match load_lambda_config().and_then(|config| {
        let fetcher = HttpFetcher::new(&config.fetch)?;
        Ok(SearchEngine::new(
            Arc::new(fetcher),
            Arc::new(LogSink),
            config.search,
        ))
    }) {
        Ok(engine) => engine,
        Err(e) => {
            error!("Lambda setup failed: {}", e);
            return Ok(ProxyResponse::json(500, &SearchResponse::failure("Internal error")));
        }
    };

    let response = respond(&request, &engine).await;
    info!(
        "Responded {} in {}ms",
        response.status_code,
        start.elapsed().as_millis()
    );
    Ok(response)
}
