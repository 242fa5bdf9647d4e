// src/services/lever.rs

//! Lever postings connector.
//!
//! Board URLs look like `https://jobs.lever.co/{account}`.

use serde_json::Value;
use url::Url;

use super::{fallback_id, mentions_remote, probe_id, probe_str, probe_value, UNTITLED};
use crate::error::{AppError, Result};
use crate::models::{build_tags, JobPosting, Provider};
use crate::utils::http::get_json;
use crate::utils::time::normalize_timestamp;
use crate::utils::url::first_segment;
use crate::utils::Fetch;

const ID_PROBES: &[&str] = &["/id"];
const TITLE_PROBES: &[&str] = &["/text"];
const LOCATION_PROBES: &[&str] = &["/categories/location"];
const TEAM_PROBES: &[&str] = &["/categories/team"];
const COMMITMENT_PROBES: &[&str] = &["/categories/commitment"];
const WORKPLACE_PROBES: &[&str] = &["/workplaceType"];
const URL_PROBES: &[&str] = &["/hostedUrl"];
const POSTED_AT_PROBES: &[&str] = &["/createdAt"];
const DESCRIPTION_PROBES: &[&str] = &["/description"];

/// Extract the account name from a Lever board URL.
pub fn parse_board_url(board_url: &str) -> Result<String> {
    let invalid = || AppError::config("Invalid Lever URL");
    let url = Url::parse(board_url).map_err(|_| invalid())?;
    first_segment(&url).ok_or_else(invalid)
}

pub fn api_url(account: &str) -> String {
    format!("https://api.lever.co/v0/postings/{account}?mode=json")
}

/// Map a Lever listing payload (a bare array) to postings.
pub fn map_postings(account: &str, payload: &Value) -> Vec<JobPosting> {
    payload
        .as_array()
        .map(|postings| postings.iter().map(|raw| map_posting(account, raw)).collect())
        .unwrap_or_default()
}

fn map_posting(account: &str, raw: &Value) -> JobPosting {
    let title = probe_str(raw, TITLE_PROBES).unwrap_or(UNTITLED).to_string();
    let location = probe_str(raw, LOCATION_PROBES).unwrap_or_default().to_string();
    let hosted_url = probe_str(raw, URL_PROBES).map(str::to_string);
    let posting_id = probe_id(raw, ID_PROBES).unwrap_or_else(|| {
        fallback_id(&title, &location, hosted_url.as_deref().unwrap_or_default())
    });
    let url =
        hosted_url.unwrap_or_else(|| format!("https://jobs.lever.co/{account}/{posting_id}"));

    let workplace_remote = probe_str(raw, WORKPLACE_PROBES)
        .is_some_and(|kind| kind.eq_ignore_ascii_case("remote"));
    let team = probe_str(raw, TEAM_PROBES).unwrap_or_default();
    let commitment = probe_str(raw, COMMITMENT_PROBES).unwrap_or_default();

    JobPosting {
        id: JobPosting::make_id(Provider::Lever, account, &posting_id),
        provider: Provider::Lever,
        company: account.to_string(),
        remote: workplace_remote || mentions_remote([location.as_str()]),
        posted_at: normalize_timestamp(probe_value(raw, POSTED_AT_PROBES)),
        description_html: probe_str(raw, DESCRIPTION_PROBES)
            .unwrap_or_default()
            .to_string(),
        summary: None,
        requirements: None,
        tags: build_tags([title.as_str(), team, location.as_str(), commitment]),
        title,
        location,
        url,
    }
}

/// Fetch every published posting for a Lever account.
pub async fn fetch_jobs(fetcher: &dyn Fetch, board_url: &str) -> Result<Vec<JobPosting>> {
    let account = parse_board_url(board_url)?;
    let payload = get_json(fetcher, &api_url(&account), &format!("Lever {account}")).await?;
    let jobs = map_postings(&account, &payload);
    log::debug!("Lever {}: {} postings", account, jobs.len());
    Ok(jobs)
}
