// src/services/ashby.rs

//! Ashby job board connector.
//!
//! The public listing endpoint changes shape between accounts and often omits
//! descriptions, so postings with an empty body get a per-posting detail lookup.
//! Detail failures never fail the source.

use std::sync::LazyLock;

use futures::future::join_all;
use regex::Regex;
use serde_json::Value;
use url::Url;

use super::{fallback_id, probe_array, probe_id, probe_str, probe_value, UNTITLED};
use crate::error::{AppError, Result};
use crate::models::{build_tags, JobPosting, Provider};
use crate::utils::http::get_json;
use crate::utils::time::normalize_timestamp;
use crate::utils::url::{first_segment, host_ends_with};
use crate::utils::{ErrorSink, Fetch};

const ASHBY_DOMAIN: &str = "ashbyhq.com";

const LIST_PROBES: &[&str] = &["", "/jobs", "/postings", "/data/postings"];
const ID_PROBES: &[&str] = &["/id", "/jobId", "/_id"];
const TITLE_PROBES: &[&str] = &["/title"];
const COMPANY_PROBES: &[&str] = &["/companyName"];
const URL_PROBES: &[&str] = &["/jobUrl", "/url"];
const POSTED_AT_PROBES: &[&str] = &["/createdAt", "/updatedAt"];
const DETAIL_POSTED_AT_PROBES: &[&str] = &["/createdAt"];
const DESCRIPTION_PROBES: &[&str] = &["/descriptionHtml", "/description"];
const REMOTE_HINT_PROBES: &[&str] = &["/workType", "/employmentType"];

static REMOTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)remote|anywhere|global").expect("valid ashby remote regex")
});

/// Extract the organization from an Ashby board URL.
pub fn parse_board_url(board_url: &str) -> Result<String> {
    let invalid = || AppError::config("Invalid Ashby URL");
    let url = Url::parse(board_url).map_err(|_| invalid())?;
    if !host_ends_with(&url, ASHBY_DOMAIN) {
        return Err(invalid());
    }
    first_segment(&url).ok_or_else(invalid)
}

pub fn api_url(org: &str) -> String {
    format!("https://jobs.ashbyhq.com/api/posting/{org}")
}

pub fn detail_url(org: &str, posting_id: &str) -> String {
    format!("https://jobs.ashbyhq.com/api/posting/{org}/{posting_id}")
}

/// Location, trying a plain string, then a `locations` list, then `primaryLocation`.
fn pick_location(raw: &Value) -> String {
    if let Some(location) = raw.get("location").and_then(Value::as_str) {
        if !location.is_empty() {
            return location.to_string();
        }
    }

    if let Some(locations) = raw.get("locations").and_then(Value::as_array) {
        let names: Vec<&str> = locations
            .iter()
            .filter_map(|entry| {
                entry
                    .as_str()
                    .or_else(|| entry.get("name").and_then(Value::as_str))
            })
            .filter(|name| !name.is_empty())
            .collect();
        if !names.is_empty() {
            return names.join(", ");
        }
    }

    raw.pointer("/primaryLocation/name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Map an Ashby listing payload to postings, whatever its envelope.
pub fn map_postings(org: &str, payload: &Value) -> Vec<JobPosting> {
    probe_array(payload, LIST_PROBES)
        .iter()
        .map(|raw| map_posting(org, raw))
        .collect()
}

fn map_posting(org: &str, raw: &Value) -> JobPosting {
    let title = probe_str(raw, TITLE_PROBES).unwrap_or(UNTITLED).to_string();
    let location = pick_location(raw);
    let listed_url = probe_str(raw, URL_PROBES).map(str::to_string);
    let posting_id = probe_id(raw, ID_PROBES).unwrap_or_else(|| {
        fallback_id(&title, &location, listed_url.as_deref().unwrap_or_default())
    });
    let url =
        listed_url.unwrap_or_else(|| format!("https://jobs.ashbyhq.com/{org}/job/{posting_id}"));

    let remote = REMOTE_RE.is_match(&location)
        || REMOTE_RE.is_match(&title)
        || REMOTE_HINT_PROBES
            .iter()
            .filter_map(|probe| raw.pointer(probe).and_then(Value::as_str))
            .any(|hint| REMOTE_RE.is_match(hint));

    JobPosting {
        id: JobPosting::make_id(Provider::Ashby, org, &posting_id),
        provider: Provider::Ashby,
        company: probe_str(raw, COMPANY_PROBES).unwrap_or(org).to_string(),
        remote,
        posted_at: normalize_timestamp(probe_value(raw, POSTED_AT_PROBES)),
        description_html: probe_str(raw, DESCRIPTION_PROBES)
            .unwrap_or_default()
            .to_string(),
        summary: None,
        requirements: None,
        tags: build_tags([title.as_str(), location.as_str()]),
        title,
        location,
        url,
    }
}

/// Fold a detail payload into a posting; only empty fields are filled.
///
/// `remote` is left alone: it was decided when the posting was mapped.
fn merge_detail(job: &mut JobPosting, detail: &Value) {
    if let Some(description) = probe_str(detail, DESCRIPTION_PROBES) {
        job.description_html = description.to_string();
    }
    if job.location.is_empty() {
        job.location = pick_location(detail);
    }
    if job.url.is_empty() {
        if let Some(url) = probe_str(detail, URL_PROBES) {
            job.url = url.to_string();
        }
    }
    if job.posted_at.is_none() {
        job.posted_at = normalize_timestamp(probe_value(detail, DETAIL_POSTED_AT_PROBES));
    }
}

/// Look up details for every posting without a description, concurrently.
async fn fill_descriptions(
    fetcher: &dyn Fetch,
    sink: &dyn ErrorSink,
    org: &str,
    jobs: &mut [JobPosting],
) {
    let lookups = jobs
        .iter_mut()
        .filter(|job| job.description_html.is_empty())
        .map(|job| async move {
            let url = detail_url(org, job.source_id());
            let context = format!("Ashby detail {org}");
            match get_json(fetcher, &url, &context).await {
                Ok(detail) => merge_detail(job, &detail),
                Err(e) => sink.report("ashby.detail", &job.id, &e),
            }
        });

    join_all(lookups).await;
}

/// Fetch every posting on an Ashby board, filling missing descriptions.
pub async fn fetch_jobs(
    fetcher: &dyn Fetch,
    sink: &dyn ErrorSink,
    board_url: &str,
) -> Result<Vec<JobPosting>> {
    let org = parse_board_url(board_url)?;
    let payload = get_json(fetcher, &api_url(&org), &format!("Ashby {org}")).await?;
    let mut jobs = map_postings(&org, &payload);
    fill_descriptions(fetcher, sink, &org, &mut jobs).await;
    log::debug!("Ashby {}: {} postings", org, jobs.len());
    Ok(jobs)
}
