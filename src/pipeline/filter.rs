// src/pipeline/filter.rs

//! Declarative filtering.
//!
//! Constraints are conjunctive across categories and OR within a list. A
//! posting whose signal is unknown (no date, no extracted degree, ...) is
//! never excluded by that constraint.

use chrono::{DateTime, Duration, Utc};

use crate::models::{Filters, JobPosting};
use crate::utils::time::parse_datetime;

/// Lower-cased text searched by keyword and tech terms.
fn haystack(job: &JobPosting) -> String {
    format!("{} {} {}", job.title, job.location, job.description_html).to_lowercase()
}

fn any_term_matches(terms: &[String], title: &str, haystack: &str) -> bool {
    terms
        .iter()
        .any(|term| title.contains(term.as_str()) || haystack.contains(term.as_str()))
}

fn posted_since(job: &JobPosting, cutoff: DateTime<Utc>) -> bool {
    match job.posted_at.as_deref().and_then(parse_datetime) {
        Some(posted) => posted >= cutoff,
        None => true,
    }
}

/// Whether a single posting satisfies every constraint in `filters`.
pub fn matches(job: &JobPosting, filters: &Filters, now: DateTime<Utc>) -> bool {
    if let Some(remote) = filters.remote {
        if job.remote != remote {
            return false;
        }
    }

    if let Some(days) = filters.posted_within_days.filter(|d| *d > 0) {
        // A cutoff before chrono's earliest date excludes nothing.
        let cutoff = Duration::try_days(i64::from(days)).and_then(|d| now.checked_sub_signed(d));
        if let Some(cutoff) = cutoff {
            if !posted_since(job, cutoff) {
                return false;
            }
        }
    }

    if !filters.locations.is_empty() {
        let location = job.location.to_lowercase();
        if !filters
            .locations
            .iter()
            .any(|wanted| location.contains(&wanted.to_lowercase()))
        {
            return false;
        }
    }

    if !filters.keywords.is_empty() || !filters.tech.is_empty() {
        let title = job.title.to_lowercase();
        let hay = haystack(job);
        if !filters.keywords.is_empty() && !any_term_matches(&filters.keywords, &title, &hay) {
            return false;
        }
        if !filters.tech.is_empty() && !any_term_matches(&filters.tech, &title, &hay) {
            return false;
        }
    }

    let requirements = job.requirements();

    if let (Some(ceiling), Some(degree)) = (filters.degree_at_most, requirements.degree) {
        if degree > ceiling {
            return false;
        }
    }

    if let (Some(max), Some(years)) = (filters.max_years_experience, requirements.min_years) {
        if years > max {
            return false;
        }
    }

    if !filters.seniority_include.is_empty() {
        if let Some(seniority) = requirements.seniority {
            if !filters.seniority_include.contains(&seniority) {
                return false;
            }
        }
    }

    true
}

/// Keep the postings that satisfy `filters`, in input order.
pub fn apply_filters(jobs: Vec<JobPosting>, filters: &Filters, now: DateTime<Utc>) -> Vec<JobPosting> {
    let before = jobs.len();
    let kept: Vec<JobPosting> = jobs
        .into_iter()
        .filter(|job| matches(job, filters, now))
        .collect();
    log::debug!("Filters kept {} of {} postings", kept.len(), before);
    kept
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::models::{DegreeLevel, Requirements, Seniority};
    use crate::testing::posting;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn with_requirements(mut job: JobPosting, requirements: Requirements) -> JobPosting {
        job.requirements = Some(requirements);
        job
    }

    #[test]
    fn test_no_constraints_keeps_everything() {
        let jobs = vec![posting("1", "Acme", "A", ""), posting("2", "Acme", "B", "")];
        assert_eq!(apply_filters(jobs.clone(), &Filters::default(), now()), jobs);
    }

    #[test]
    fn test_remote_exact_match() {
        let mut remote = posting("1", "Acme", "A", "Remote");
        remote.remote = true;
        let onsite = posting("2", "Acme", "B", "Berlin");
        let filters = Filters {
            remote: Some(false),
            ..Filters::default()
        };

        let kept = apply_filters(vec![remote, onsite], &filters, now());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "B");
    }

    #[test]
    fn test_posted_within_days_keeps_unknown_dates() {
        let mut fresh = posting("1", "Acme", "Fresh", "");
        fresh.posted_at = Some("2024-05-30T00:00:00.000Z".to_string());
        let mut stale = posting("2", "Acme", "Stale", "");
        stale.posted_at = Some("2024-04-01T00:00:00.000Z".to_string());
        let mut garbled = posting("3", "Acme", "Garbled", "");
        garbled.posted_at = Some("last week".to_string());
        let undated = posting("4", "Acme", "Undated", "");

        let filters = Filters {
            posted_within_days: Some(7),
            ..Filters::default()
        };
        let titles: Vec<String> = apply_filters(vec![fresh, stale, garbled, undated], &filters, now())
            .into_iter()
            .map(|j| j.title)
            .collect();
        assert_eq!(titles, vec!["Fresh", "Garbled", "Undated"]);
    }

    #[test]
    fn test_zero_days_means_no_constraint() {
        let mut stale = posting("1", "Acme", "Stale", "");
        stale.posted_at = Some("2020-01-01T00:00:00.000Z".to_string());
        let filters = Filters {
            posted_within_days: Some(0),
            ..Filters::default()
        };
        assert_eq!(apply_filters(vec![stale], &filters, now()).len(), 1);
    }

    #[test]
    fn test_huge_day_window_keeps_everything() {
        let mut old = posting("1", "Acme", "Old", "");
        old.posted_at = Some("1999-01-01T00:00:00.000Z".to_string());
        let filters = Filters::from_value(&serde_json::json!({ "postedWithinDays": 100000000 }));
        assert_eq!(filters.posted_within_days, Some(100_000_000));

        let kept = apply_filters(vec![old], &filters, now());
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_location_substring_any() {
        let filters = Filters {
            locations: vec!["Lahore".to_string(), "remote".to_string()],
            ..Filters::default()
        };
        let jobs = vec![
            posting("1", "Acme", "A", "Lahore, Pakistan"),
            posting("2", "Acme", "B", "Berlin"),
            posting("3", "Acme", "C", "Remote - EU"),
            posting("4", "Acme", "D", ""),
        ];
        let titles: Vec<String> = apply_filters(jobs, &filters, now())
            .into_iter()
            .map(|j| j.title)
            .collect();
        assert_eq!(titles, vec!["A", "C"]);
    }

    #[test]
    fn test_keywords_and_tech_are_conjunctive() {
        let mut rust_backend = posting("1", "Acme", "Backend Engineer", "");
        rust_backend.description_html = "<p>We use Rust</p>".to_string();
        let mut go_backend = posting("2", "Acme", "Backend Engineer", "Berlin");
        go_backend.description_html = "<p>We use Go</p>".to_string();
        let frontend = posting("3", "Acme", "Frontend Engineer", "");

        let filters = Filters {
            keywords: vec!["backend".to_string()],
            tech: vec!["rust".to_string()],
            ..Filters::default()
        };
        let kept = apply_filters(vec![rust_backend, go_backend, frontend], &filters, now());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "lever:acme:1");
    }

    #[test]
    fn test_degree_ceiling_unknown_passes() {
        let phd = with_requirements(
            posting("1", "Acme", "Research", ""),
            Requirements {
                degree: Some(DegreeLevel::Phd),
                ..Requirements::default()
            },
        );
        let bachelors = with_requirements(
            posting("2", "Acme", "Engineer", ""),
            Requirements {
                degree: Some(DegreeLevel::Bachelors),
                ..Requirements::default()
            },
        );
        let unknown = posting("3", "Acme", "Unknown", "");

        let filters = Filters {
            degree_at_most: Some(DegreeLevel::Masters),
            ..Filters::default()
        };
        let titles: Vec<String> = apply_filters(vec![phd, bachelors, unknown], &filters, now())
            .into_iter()
            .map(|j| j.title)
            .collect();
        assert_eq!(titles, vec!["Engineer", "Unknown"]);
    }

    #[test]
    fn test_years_ceiling() {
        let five = with_requirements(
            posting("1", "Acme", "Five", ""),
            Requirements {
                min_years: Some(5),
                ..Requirements::default()
            },
        );
        let two = with_requirements(
            posting("2", "Acme", "Two", ""),
            Requirements {
                min_years: Some(2),
                ..Requirements::default()
            },
        );
        let filters = Filters {
            max_years_experience: Some(3),
            ..Filters::default()
        };
        let kept = apply_filters(vec![five, two], &filters, now());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "Two");
    }

    #[test]
    fn test_seniority_allow_list_unknown_passes() {
        let senior = with_requirements(
            posting("1", "Acme", "Senior", ""),
            Requirements {
                seniority: Some(Seniority::Senior),
                ..Requirements::default()
            },
        );
        let junior = with_requirements(
            posting("2", "Acme", "Junior", ""),
            Requirements {
                seniority: Some(Seniority::Junior),
                ..Requirements::default()
            },
        );
        let unknown = posting("3", "Acme", "Unknown", "");

        let filters = Filters {
            seniority_include: vec![Seniority::Junior, Seniority::Intern],
            ..Filters::default()
        };
        let titles: Vec<String> = apply_filters(vec![senior, junior, unknown], &filters, now())
            .into_iter()
            .map(|j| j.title)
            .collect();
        assert_eq!(titles, vec!["Junior", "Unknown"]);
    }
}
