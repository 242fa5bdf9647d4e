// src/models/mod.rs

//! Domain models for the search service.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod filters;
mod posting;
mod response;

// Re-export all public types
pub use config::{Config, FetchConfig, SearchConfig};
pub use filters::{DEFAULT_PAGE_SIZE, Filters, SourceInput};
pub use posting::{DegreeLevel, JobPosting, MAX_TAGS, Provider, Requirements, Seniority, build_tags};
pub use response::{HealthResponse, SERVICE_NAME, SearchFailure, SearchResponse, SearchSuccess};
