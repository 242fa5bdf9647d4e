//! Shared fixtures for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{JobPosting, Provider};
use crate::utils::{ErrorSink, Fetch, FetchResponse};

enum Reply {
    Response(FetchResponse),
    NetworkError,
}

/// In-memory [`Fetch`]: canned replies per URL, 404 for anything unknown.
#[derive(Default)]
pub struct StubFetcher {
    replies: HashMap<String, Reply>,
    calls: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(self, url: &str, body: serde_json::Value) -> Self {
        self.with_body(url, body.to_string())
    }

    pub fn with_body(mut self, url: &str, body: impl Into<String>) -> Self {
        self.replies
            .insert(url.to_string(), Reply::Response(FetchResponse::new(200, body)));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.replies
            .insert(url.to_string(), Reply::Response(FetchResponse::new(status, "")));
        self
    }

    pub fn with_network_error(mut self, url: &str) -> Self {
        self.replies.insert(url.to_string(), Reply::NetworkError);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetch for StubFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.replies.get(url) {
            Some(Reply::Response(response)) => Ok(response.clone()),
            Some(Reply::NetworkError) => Err(AppError::internal(format!("connection reset: {url}"))),
            None => Ok(FetchResponse::new(404, "")),
        }
    }
}

/// [`ErrorSink`] that remembers every report.
#[derive(Default)]
pub struct RecordingSink {
    reports: Mutex<Vec<(String, String, String)>>,
}

impl RecordingSink {
    pub fn reports(&self) -> Vec<(String, String, String)> {
        self.reports.lock().unwrap().clone()
    }
}

impl ErrorSink for RecordingSink {
    fn report(&self, context: &str, id: &str, error: &AppError) {
        self.reports
            .lock()
            .unwrap()
            .push((context.to_string(), id.to_string(), error.to_string()));
    }
}

/// Minimal posting for pipeline tests.
pub fn posting(id: &str, company: &str, title: &str, location: &str) -> JobPosting {
    JobPosting {
        id: format!("lever:{}:{}", company.to_lowercase(), id),
        provider: Provider::Lever,
        company: company.to_string(),
        title: title.to_string(),
        location: location.to_string(),
        remote: false,
        url: format!("https://jobs.lever.co/{}/{}", company.to_lowercase(), id),
        posted_at: None,
        description_html: String::new(),
        summary: None,
        requirements: None,
        tags: Vec::new(),
    }
}
