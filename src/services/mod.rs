//! Provider connectors for the applicant tracking systems we search.
//!
//! Each connector knows three things about its provider:
//! - how to derive the organization identifier from a public board URL
//! - where the listing API lives
//! - how to map a raw posting onto [`JobPosting`], via explicit probe lists
//!
//! Connectors share no state. Raw payloads stay `serde_json::Value` because
//! providers rename and omit fields freely; probes are tried in order and the
//! first non-empty value wins.

pub mod ashby;
pub mod greenhouse;
pub mod lever;

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::{JobPosting, Provider, SourceInput};
use crate::utils::{ErrorSink, Fetch};

/// Title used when a posting has none.
pub const UNTITLED: &str = "Untitled";

static REMOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)remote").expect("valid remote regex"));

/// Whether any of the given fields mentions remote work.
pub(crate) fn mentions_remote<'a>(fields: impl IntoIterator<Item = &'a str>) -> bool {
    fields.into_iter().any(|field| REMOTE_RE.is_match(field))
}

/// JavaScript-style truthiness for raw JSON values.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        _ => true,
    }
}

/// First probe that yields a non-empty string.
pub(crate) fn probe_str<'a>(raw: &'a Value, probes: &[&str]) -> Option<&'a str> {
    probes
        .iter()
        .filter_map(|probe| raw.pointer(probe).and_then(Value::as_str))
        .find(|s| !s.is_empty())
}

/// First probe that yields a present value of any type.
pub(crate) fn probe_value<'a>(raw: &'a Value, probes: &[&str]) -> Option<&'a Value> {
    probes
        .iter()
        .filter_map(|probe| raw.pointer(probe))
        .find(|v| is_present(v))
}

/// First probe that yields an identifier (non-empty string or integer).
pub(crate) fn probe_id(raw: &Value, probes: &[&str]) -> Option<String> {
    probes.iter().find_map(|probe| match raw.pointer(probe)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// First probe that yields an array.
pub(crate) fn probe_array<'a>(raw: &'a Value, probes: &[&str]) -> &'a [Value] {
    probes
        .iter()
        .find_map(|probe| raw.pointer(probe).and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Deterministic stand-in id for postings that arrive without one.
pub(crate) fn fallback_id(title: &str, location: &str, url: &str) -> String {
    let digest = Sha256::digest(format!("{title}|{location}|{url}").as_bytes());
    let mut id = hex::encode(digest);
    id.truncate(16);
    id
}

/// Derive the provider-scoped organization identifier from a board URL.
pub fn parse_org(source: &SourceInput) -> Result<String> {
    match source.provider {
        Provider::Greenhouse => greenhouse::parse_board_url(&source.url),
        Provider::Lever => lever::parse_board_url(&source.url),
        Provider::Ashby => ashby::parse_board_url(&source.url),
    }
}

/// Fetch and normalize every posting for one source.
pub async fn fetch_source(
    fetcher: &dyn Fetch,
    sink: &dyn ErrorSink,
    source: &SourceInput,
) -> Result<Vec<JobPosting>> {
    match source.provider {
        Provider::Greenhouse => greenhouse::fetch_jobs(fetcher, &source.url).await,
        Provider::Lever => lever::fetch_jobs(fetcher, &source.url).await,
        Provider::Ashby => ashby::fetch_jobs(fetcher, sink, &source.url).await,
    }
}
