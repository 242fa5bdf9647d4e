//! Normalization-and-ranking pipeline.
//!
//! Every stage is a pure transformation over an in-memory `Vec`:
//! - `extract` and `summarize`: enrich each posting from its description
//! - `dedup`: drop repeated roles
//! - `filter`: apply the query's constraints
//! - `score`: rank by relevance
//! - `paginate`: cap and slice
//!
//! `search` wires them behind the concurrent source fetch.

pub mod dedup;
pub mod extract;
pub mod filter;
pub mod paginate;
pub mod score;
pub mod search;
pub mod summarize;

pub use dedup::dedupe;
pub use extract::extract_requirements;
pub use filter::apply_filters;
pub use paginate::{paginate, Page, MAX_RESULTS};
pub use score::{score_job, score_jobs};
pub use search::{rank, SearchEngine, SourceOutcome};
pub use summarize::{summarize_html, DEFAULT_MAX_BULLETS};
