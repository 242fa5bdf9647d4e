//! Canonical job posting and its structured requirements.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Maximum number of tags kept per posting.
pub const MAX_TAGS: usize = 15;

/// Source system a posting came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Greenhouse,
    Lever,
    Ashby,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Greenhouse => "greenhouse",
            Provider::Lever => "lever",
            Provider::Ashby => "ashby",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greenhouse" => Ok(Provider::Greenhouse),
            "lever" => Ok(Provider::Lever),
            "ashby" => Ok(Provider::Ashby),
            other => Err(AppError::config(format!("Unsupported provider: {other}"))),
        }
    }
}

/// Minimum degree tier, ordered `none < bachelors < masters < phd`.
///
/// Variant order is the ordinal lattice; compare with `<`/`min`, never by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegreeLevel {
    #[serde(rename = "none")]
    NoDegree,
    Bachelors,
    Masters,
    Phd,
}

impl DegreeLevel {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" => Some(DegreeLevel::NoDegree),
            "bachelors" => Some(DegreeLevel::Bachelors),
            "masters" => Some(DegreeLevel::Masters),
            "phd" => Some(DegreeLevel::Phd),
            _ => None,
        }
    }
}

/// Seniority signal extracted from a description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seniority {
    Intern,
    Junior,
    Mid,
    Senior,
    Staff,
    Principal,
    Lead,
}

impl Seniority {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "intern" => Some(Seniority::Intern),
            "junior" => Some(Seniority::Junior),
            "mid" => Some(Seniority::Mid),
            "senior" => Some(Seniority::Senior),
            "staff" => Some(Seniority::Staff),
            "principal" => Some(Seniority::Principal),
            "lead" => Some(Seniority::Lead),
            _ => None,
        }
    }

    /// Entry-level roles get a ranking bonus.
    pub fn is_entry_level(&self) -> bool {
        matches!(self, Seniority::Intern | Seniority::Junior)
    }
}

/// Structured hiring signals; each field is independently unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirements {
    pub min_years: Option<u32>,
    pub degree: Option<DegreeLevel>,
    pub seniority: Option<Seniority>,
}

/// A job posting normalized from any provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    /// `{provider}:{org}:{posting id}`
    pub id: String,

    pub provider: Provider,

    pub company: String,

    pub title: String,

    /// Empty when unspecified
    pub location: String,

    /// Decided at mapping time, never recomputed
    pub remote: bool,

    pub url: String,

    /// ISO-8601 UTC timestamp
    pub posted_at: Option<String>,

    /// Raw body as delivered by the provider
    pub description_html: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Requirements>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl JobPosting {
    /// Build the canonical id for a posting.
    pub fn make_id(provider: Provider, org: &str, posting_id: &str) -> String {
        format!("{provider}:{org}:{posting_id}")
    }

    /// Provider-side posting id (the last `:` segment of `id`).
    pub fn source_id(&self) -> &str {
        self.id.rsplit(':').next().unwrap_or(&self.id)
    }

    /// Key used to detect the same role listed twice.
    pub fn dedup_key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.company.to_lowercase(),
            self.title.to_lowercase(),
            self.location.to_lowercase()
        )
    }

    /// Extracted requirements, or all-unknown when not yet extracted.
    pub fn requirements(&self) -> Requirements {
        self.requirements.unwrap_or_default()
    }
}

/// Build the tag list from free-text fields.
///
/// Tokens split on commas, whitespace and slashes; first-seen order, lower-cased, capped.
pub fn build_tags<'a>(fields: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for field in fields {
        for token in field.split(|c: char| c == ',' || c == '/' || c.is_whitespace()) {
            if token.is_empty() {
                continue;
            }
            let token = token.to_lowercase();
            if !tags.contains(&token) {
                tags.push(token);
            }
        }
    }
    tags.truncate(MAX_TAGS);
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_posting() -> JobPosting {
        JobPosting {
            id: "lever:acme:abc-123".to_string(),
            provider: Provider::Lever,
            company: "Acme".to_string(),
            title: "Backend Engineer".to_string(),
            location: "Remote".to_string(),
            remote: true,
            url: "https://jobs.lever.co/acme/abc-123".to_string(),
            posted_at: None,
            description_html: String::new(),
            summary: None,
            requirements: None,
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_degree_lattice_order() {
        assert!(DegreeLevel::NoDegree < DegreeLevel::Bachelors);
        assert!(DegreeLevel::Bachelors < DegreeLevel::Masters);
        assert!(DegreeLevel::Masters < DegreeLevel::Phd);
        assert_eq!(DegreeLevel::Phd.min(DegreeLevel::Bachelors), DegreeLevel::Bachelors);
    }

    #[test]
    fn test_degree_serializes_none_tier() {
        let json = serde_json::to_string(&DegreeLevel::NoDegree).unwrap();
        assert_eq!(json, "\"none\"");
        assert_eq!(DegreeLevel::parse("PhD"), Some(DegreeLevel::Phd));
        assert_eq!(DegreeLevel::parse("diploma"), None);
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("ashby".parse::<Provider>().unwrap(), Provider::Ashby);
        assert!("workday".parse::<Provider>().is_err());
    }

    #[test]
    fn test_source_id_and_dedup_key() {
        let job = sample_posting();
        assert_eq!(job.source_id(), "abc-123");
        assert_eq!(job.dedup_key(), "acme|backend engineer|remote");
    }

    #[test]
    fn test_posting_serializes_camel_case() {
        let value = serde_json::to_value(sample_posting()).unwrap();
        assert!(value.get("descriptionHtml").is_some());
        assert!(value.get("postedAt").unwrap().is_null());
        assert!(value.get("summary").is_none());
        assert!(value.get("tags").is_none());
    }

    #[test]
    fn test_build_tags_dedupes_and_caps() {
        let tags = build_tags(["Senior Backend/Platform Engineer", "Berlin, Germany", "senior"]);
        assert_eq!(
            tags,
            vec!["senior", "backend", "platform", "engineer", "berlin", "germany"]
        );

        let long = (0..40).map(|i| format!("t{i}")).collect::<Vec<_>>().join(" ");
        assert_eq!(build_tags([long.as_str()]).len(), MAX_TAGS);
    }
}
