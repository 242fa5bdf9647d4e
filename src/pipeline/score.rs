// src/pipeline/score.rs

//! Relevance scoring.

use std::cmp::Reverse;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::models::{Filters, JobPosting};
use crate::utils::time::{age_in_days, parse_datetime};

pub const KEYWORD_IN_TITLE: i64 = 6;
pub const KEYWORD_IN_DESCRIPTION: i64 = 2;
pub const TECH_IN_TITLE: i64 = 4;
pub const TECH_IN_DESCRIPTION: i64 = 2;
pub const REMOTE_BONUS: i64 = 1;
pub const LOCAL_MARKET_BONUS: i64 = 1;
pub const LOW_EXPERIENCE_BONUS: i64 = 3;
pub const ENTRY_LEVEL_BONUS: i64 = 2;

/// Highest recency bonus; it drops by one every [`RECENCY_STEP_DAYS`].
pub const RECENCY_MAX: i64 = 6;
pub const RECENCY_STEP_DAYS: f64 = 3.0;

/// Postings asking for at most this many years get [`LOW_EXPERIENCE_BONUS`].
pub const LOW_EXPERIENCE_YEARS: u32 = 2;

static LOCAL_MARKET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)pakistan|islamabad|lahore|karachi").expect("valid local market regex")
});

fn term_score(terms: &[String], title: &str, description: &str, in_title: i64, in_desc: i64) -> i64 {
    terms
        .iter()
        .map(|term| {
            let mut score = 0;
            if title.contains(term.as_str()) {
                score += in_title;
            }
            if description.contains(term.as_str()) {
                score += in_desc;
            }
            score
        })
        .sum()
}

fn recency_score(posted_at: Option<&str>, now: DateTime<Utc>) -> i64 {
    let Some(posted) = posted_at.and_then(parse_datetime) else {
        return 0;
    };
    let age = age_in_days(posted, now).max(0.0);
    (RECENCY_MAX - (age / RECENCY_STEP_DAYS).floor() as i64).max(0)
}

/// Score one posting against the query.
pub fn score_job(job: &JobPosting, filters: &Filters, now: DateTime<Utc>) -> i64 {
    let title = job.title.to_lowercase();
    let description = job.description_html.to_lowercase();
    let requirements = job.requirements();

    let mut score = term_score(
        &filters.keywords,
        &title,
        &description,
        KEYWORD_IN_TITLE,
        KEYWORD_IN_DESCRIPTION,
    );
    score += term_score(
        &filters.tech,
        &title,
        &description,
        TECH_IN_TITLE,
        TECH_IN_DESCRIPTION,
    );

    if job.remote {
        score += REMOTE_BONUS;
    }
    if LOCAL_MARKET_RE.is_match(&job.location) {
        score += LOCAL_MARKET_BONUS;
    }
    if requirements
        .min_years
        .is_some_and(|years| years <= LOW_EXPERIENCE_YEARS)
    {
        score += LOW_EXPERIENCE_BONUS;
    }
    if requirements.seniority.is_some_and(|s| s.is_entry_level()) {
        score += ENTRY_LEVEL_BONUS;
    }

    score + recency_score(job.posted_at.as_deref(), now)
}

/// Sort postings by descending score; ties keep their input order.
pub fn score_jobs(jobs: Vec<JobPosting>, filters: &Filters, now: DateTime<Utc>) -> Vec<JobPosting> {
    let mut scored: Vec<(i64, JobPosting)> = jobs
        .into_iter()
        .map(|job| (score_job(&job, filters, now), job))
        .collect();
    scored.sort_by_key(|(score, _)| Reverse(*score));
    scored.into_iter().map(|(_, job)| job).collect()
}
