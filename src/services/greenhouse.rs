// src/services/greenhouse.rs

//! Greenhouse job board connector.
//!
//! Board URLs look like `https://boards.greenhouse.io/{slug}`; the slug is the
//! last path segment.

use serde_json::Value;
use url::Url;

use super::{fallback_id, mentions_remote, probe_id, probe_str, probe_value, UNTITLED};
use crate::error::{AppError, Result};
use crate::models::{build_tags, JobPosting, Provider};
use crate::utils::http::get_json;
use crate::utils::time::normalize_timestamp;
use crate::utils::url::last_segment;
use crate::utils::Fetch;

const ID_PROBES: &[&str] = &["/id"];
const TITLE_PROBES: &[&str] = &["/title"];
const COMPANY_PROBES: &[&str] = &["/company/name"];
const LOCATION_PROBES: &[&str] = &["/location/name"];
const URL_PROBES: &[&str] = &["/absolute_url"];
const POSTED_AT_PROBES: &[&str] = &["/updated_at", "/created_at"];
const DESCRIPTION_PROBES: &[&str] = &["/content"];

/// Extract the board slug from a Greenhouse board URL.
pub fn parse_board_url(board_url: &str) -> Result<String> {
    let invalid = || AppError::config("Invalid Greenhouse URL");
    let url = Url::parse(board_url).map_err(|_| invalid())?;
    last_segment(&url).ok_or_else(invalid)
}

pub fn api_url(slug: &str) -> String {
    format!("https://boards-api.greenhouse.io/v1/boards/{slug}/jobs?content=true")
}

/// Map a Greenhouse listing payload (`{"jobs": [...]}`) to postings.
pub fn map_postings(slug: &str, payload: &Value) -> Vec<JobPosting> {
    payload
        .pointer("/jobs")
        .and_then(Value::as_array)
        .map(|jobs| jobs.iter().map(|raw| map_posting(slug, raw)).collect())
        .unwrap_or_default()
}

fn map_posting(slug: &str, raw: &Value) -> JobPosting {
    let title = probe_str(raw, TITLE_PROBES).unwrap_or(UNTITLED).to_string();
    let location = probe_str(raw, LOCATION_PROBES).unwrap_or_default().to_string();
    let absolute_url = probe_str(raw, URL_PROBES).map(str::to_string);
    let posting_id = probe_id(raw, ID_PROBES).unwrap_or_else(|| {
        fallback_id(&title, &location, absolute_url.as_deref().unwrap_or_default())
    });
    let url = absolute_url
        .unwrap_or_else(|| format!("https://boards.greenhouse.io/{slug}/jobs/{posting_id}"));

    JobPosting {
        id: JobPosting::make_id(Provider::Greenhouse, slug, &posting_id),
        provider: Provider::Greenhouse,
        company: probe_str(raw, COMPANY_PROBES).unwrap_or(slug).to_string(),
        remote: mentions_remote([location.as_str(), title.as_str()]),
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

/// Fetch every posting on a Greenhouse board.
pub async fn fetch_jobs(fetcher: &dyn Fetch, board_url: &str) -> Result<Vec<JobPosting>> {
    let slug = parse_board_url(board_url)?;
    let payload = get_json(fetcher, &api_url(&slug), &format!("Greenhouse {slug}")).await?;
    let jobs = map_postings(&slug, &payload);
    log::debug!("Greenhouse {}: {} postings", slug, jobs.len());
    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::StubFetcher;

    #[test]
    fn test_parse_board_url_takes_last_segment() {
        assert_eq!(
            parse_board_url("https://boards.greenhouse.io/stripe").unwrap(),
            "stripe"
        );
        assert_eq!(
            parse_board_url("https://job-boards.greenhouse.io/embed/stripe/").unwrap(),
            "stripe"
        );
    }

    #[test]
    fn test_parse_board_url_rejects_bad_input() {
        let err = parse_board_url("not a url").unwrap_err();
        assert_eq!(err.public_message(), "Invalid Greenhouse URL");
        assert!(parse_board_url("https://boards.greenhouse.io/").is_err());
    }

    #[test]
    fn test_map_posting_full_record() {
        let payload = json!({
            "jobs": [{
                "id": 4012345,
                "title": "Backend Engineer",
                "company": { "name": "Stripe" },
                "location": { "name": "Remote - US" },
                "absolute_url": "https://boards.greenhouse.io/stripe/jobs/4012345",
                "updated_at": "2024-05-01T12:00:00-04:00",
                "created_at": "2024-04-01T00:00:00Z",
                "content": "&lt;p&gt;Build APIs&lt;/p&gt;"
            }]
        });

        let jobs = map_postings("stripe", &payload);
        assert_eq!(jobs.len(), 1);
        let job = &jobs[0];
        assert_eq!(job.id, "greenhouse:stripe:4012345");
        assert_eq!(job.company, "Stripe");
        assert_eq!(job.location, "Remote - US");
        assert!(job.remote);
        assert_eq!(job.posted_at.as_deref(), Some("2024-05-01T16:00:00.000Z"));
        assert_eq!(job.description_html, "&lt;p&gt;Build APIs&lt;/p&gt;");
        assert_eq!(job.tags, vec!["backend", "engineer", "remote", "-", "us"]);
    }

    #[test]
    fn test_map_posting_sparse_record_uses_fallbacks() {
        let payload = json!({ "jobs": [{ "id": 7, "created_at": "2024-04-01T00:00:00Z" }] });

        let job = &map_postings("acme", &payload)[0];
        assert_eq!(job.title, "Untitled");
        assert_eq!(job.company, "acme");
        assert_eq!(job.location, "");
        assert!(!job.remote);
        assert_eq!(job.url, "https://boards.greenhouse.io/acme/jobs/7");
        assert_eq!(job.posted_at.as_deref(), Some("2024-04-01T00:00:00.000Z"));
    }

    #[test]
    fn test_map_postings_without_jobs_array() {
        assert!(map_postings("acme", &json!({ "meta": {} })).is_empty());
    }

    #[tokio::test]
    async fn test_fetch_jobs_calls_board_api() {
        let stub = StubFetcher::new().with_json(
            &api_url("acme"),
            json!({ "jobs": [{ "id": 1, "title": "Engineer" }] }),
        );

        let jobs = fetch_jobs(&stub, "https://boards.greenhouse.io/acme")
            .await
            .unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(stub.calls(), vec![api_url("acme")]);
    }

    #[tokio::test]
    async fn test_fetch_jobs_non_2xx_is_error() {
        let stub = StubFetcher::new().with_status(&api_url("acme"), 503);
        let err = fetch_jobs(&stub, "https://boards.greenhouse.io/acme")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Greenhouse acme responded 503");
    }
}
