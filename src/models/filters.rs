//! Search query: declarative filters plus the sources to search.
//!
//! Queries arrive as loosely-typed JSON. Parsing is lenient: list fields accept
//! arrays or comma-separated strings, numbers accept numeric strings, and any
//! value that cannot be understood means "no constraint" on that axis.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{DegreeLevel, Provider, Seniority};

/// Default page size when the query omits one.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// A board to search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInput {
    #[serde(rename = "type")]
    pub provider: Provider,

    /// Public board URL, e.g. `https://jobs.lever.co/acme`
    pub url: String,

    /// Optional display name used in logs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl SourceInput {
    pub fn new(provider: Provider, url: impl Into<String>) -> Self {
        Self {
            provider,
            url: url.into(),
            name: None,
        }
    }

    /// Label for log lines.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{} ({} {})", name, self.provider, self.url),
            None => format!("{} {}", self.provider, self.url),
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        let provider = value.get("type")?.as_str()?.parse().ok()?;
        let url = value.get("url")?.as_str()?.to_string();
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string);
        Some(Self {
            provider,
            url,
            name,
        })
    }
}

/// Filters applied to one search request.
///
/// Empty lists and `None` mean "no constraint". Built once per request and never mutated
/// by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Filters {
    /// Lower-cased, OR semantics
    pub keywords: Vec<String>,

    pub remote: Option<bool>,

    /// OR semantics, substring match on location
    pub locations: Vec<String>,

    /// Lower-cased, OR semantics
    pub tech: Vec<String>,

    pub posted_within_days: Option<u32>,

    pub max_years_experience: Option<u32>,

    /// Ceiling on the required degree
    pub degree_at_most: Option<DegreeLevel>,

    pub seniority_include: Vec<Seniority>,

    pub sources: Vec<SourceInput>,

    /// Requested page, clamped to >= 1 by the paginator
    pub page: i64,

    /// Requested page size, clamped by the paginator
    pub page_size: i64,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            remote: None,
            locations: Vec::new(),
            tech: Vec::new(),
            posted_within_days: None,
            max_years_experience: None,
            degree_at_most: None,
            seniority_include: Vec::new(),
            sources: Vec::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE as i64,
        }
    }
}

impl Filters {
    /// Parse a JSON query string.
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| AppError::validation(format!("Invalid query JSON: {e}")))?;
        if !value.is_object() {
            return Err(AppError::validation("Query must be a JSON object"));
        }
        Ok(Self::from_value(&value))
    }

    /// Build filters from a loosely-typed JSON object.
    pub fn from_value(obj: &Value) -> Self {
        let sources = obj
            .get("sources")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(SourceInput::from_value).collect())
            .unwrap_or_default();

        Self {
            keywords: lower(string_list(obj.get("keywords"))),
            remote: obj.get("remote").and_then(Value::as_bool),
            locations: string_list(obj.get("locations")),
            tech: lower(string_list(obj.get("tech"))),
            posted_within_days: non_negative(obj.get("postedWithinDays")),
            max_years_experience: non_negative(obj.get("maxYearsExperience")),
            degree_at_most: obj
                .get("degreeAtMost")
                .and_then(Value::as_str)
                .and_then(DegreeLevel::parse),
            seniority_include: string_list(obj.get("seniorityInclude"))
                .iter()
                .filter_map(|s| Seniority::parse(s))
                .collect(),
            sources,
            page: number(obj.get("page")).map(|n| n as i64).unwrap_or(1),
            page_size: number(obj.get("pageSize"))
                .map(|n| n as i64)
                .unwrap_or(DEFAULT_PAGE_SIZE as i64),
        }
    }

    /// Reject queries the pipeline cannot run.
    pub fn validate(&self, max_sources: usize) -> Result<()> {
        if self.sources.is_empty() {
            return Err(AppError::validation("No sources provided"));
        }
        if self.sources.len() > max_sources {
            return Err(AppError::validation(format!(
                "Too many sources (max {max_sources})"
            )));
        }
        Ok(())
    }
}

/// Array of scalars or a comma-separated string, trimmed, empties dropped.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect(),
        Some(other) => vec![other.to_string()],
    }
}

fn lower(items: Vec<String>) -> Vec<String> {
    items.into_iter().map(|s| s.to_lowercase()).collect()
}

/// A JSON number or a numeric string.
fn number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

fn non_negative(value: Option<&Value>) -> Option<u32> {
    number(value)
        .filter(|n| *n >= 0.0)
        .map(|n| n.floor().min(u32::MAX as f64) as u32)
}
