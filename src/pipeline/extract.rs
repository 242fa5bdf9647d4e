// src/pipeline/extract.rs

//! Requirement extraction from free-form HTML descriptions.
//!
//! Pure regex heuristics over normalized text. Seniority is first-match by
//! precedence; degree is the minimum over every tier mentioned.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{DegreeLevel, JobPosting, Requirements, Seniority};
use crate::utils::text::{collapse_whitespace, decode_entities, strip_tags};

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid extractor regex")
}

static YEARS_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r"(\d+)\s*\+?\s*(?:years?|yrs?)[^.]{0,40}?(?:experience|exp)"));

/// Probed in this order; each hit lowers the running degree.
static DEGREE_PROBES: LazyLock<[(DegreeLevel, Regex); 4]> = LazyLock::new(|| {
    [
        (DegreeLevel::Phd, re(r"\bphd\b|doctorate|doctoral")),
        (DegreeLevel::Masters, re(r"\bmaster'?s\b|\bms\b|\bmsc\b|\bgraduate\b")),
        (
            DegreeLevel::Bachelors,
            re(r"\bbachelor'?s\b|\bbs\b|\bba\b|\bbsc\b|\bundergraduate\b"),
        ),
        (
            DegreeLevel::NoDegree,
            re(r"\bno degree\b|\bdegree not required\b|\bhigh school\b|\bhs diploma\b|\bassociate'?s\b"),
        ),
    ]
});

/// Precedence order; the first hit wins.
static SENIORITY_PROBES: LazyLock<[(Seniority, Regex); 7]> = LazyLock::new(|| {
    [
        (Seniority::Principal, re(r"\bprincipal\b")),
        (Seniority::Staff, re(r"\bstaff\b")),
        (Seniority::Senior, re(r"\bsenior\b")),
        (Seniority::Lead, re(r"\blead\b")),
        (Seniority::Mid, re(r"\bmid[-\s]?level\b|\bmid\b")),
        (Seniority::Junior, re(r"\bjunior\b")),
        (Seniority::Intern, re(r"\b(intern|internship)\b")),
    ]
});

/// Lower-cased plain text: entities decoded once, tags replaced by spaces.
fn normalize(html: &str) -> String {
    collapse_whitespace(&strip_tags(&decode_entities(html))).to_lowercase()
}

fn min_years(text: &str) -> Option<u32> {
    YEARS_RE
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .min()
}

fn degree(text: &str) -> Option<DegreeLevel> {
    DEGREE_PROBES
        .iter()
        .filter(|(_, pattern)| pattern.is_match(text))
        .map(|(level, _)| *level)
        .min()
}

fn seniority(text: &str) -> Option<Seniority> {
    SENIORITY_PROBES
        .iter()
        .find(|(_, pattern)| pattern.is_match(text))
        .map(|(level, _)| *level)
}

/// Extract years, degree and seniority from a description.
pub fn extract_requirements(html: &str) -> Requirements {
    let text = normalize(html);
    Requirements {
        min_years: min_years(&text),
        degree: degree(&text),
        seniority: seniority(&text),
    }
}

/// Attach extracted requirements to a posting.
pub fn enrich_requirements(job: &mut JobPosting) {
    job.requirements = Some(extract_requirements(&job.description_html));
}
