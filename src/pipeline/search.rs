// src/pipeline/search.rs

//! Search orchestration: fan out to every source, then rank.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;

use crate::error::Result;
use crate::models::{Config, Filters, JobPosting, SearchConfig, SourceInput};
use crate::services::{fetch_source, parse_org};
use crate::utils::{ErrorSink, Fetch, HttpFetcher, LogSink};

use super::dedup::dedupe;
use super::extract::enrich_requirements;
use super::filter::apply_filters;
use super::paginate::{paginate, Page};
use super::score::score_jobs;
use super::summarize::enrich_summary;

/// What one source produced.
#[derive(Debug)]
pub struct SourceOutcome {
    pub source: SourceInput,
    pub result: Result<Vec<JobPosting>>,
}

/// Run the pure stages over fetched postings: enrich, dedupe, filter, score, paginate.
pub fn rank(mut jobs: Vec<JobPosting>, filters: &Filters, now: DateTime<Utc>) -> Page<JobPosting> {
    for job in &mut jobs {
        enrich_requirements(job);
        enrich_summary(job);
    }

    let unique = dedupe(jobs);
    let eligible = apply_filters(unique, filters, now);
    let ranked = score_jobs(eligible, filters, now);
    paginate(ranked, filters.page, filters.page_size)
}

/// Runs searches against the configured providers.
pub struct SearchEngine {
    fetcher: Arc<dyn Fetch>,
    sink: Arc<dyn ErrorSink>,
    config: SearchConfig,
}

impl SearchEngine {
    pub fn new(fetcher: Arc<dyn Fetch>, sink: Arc<dyn ErrorSink>, config: SearchConfig) -> Self {
        Self {
            fetcher,
            sink,
            config,
        }
    }

    /// Production engine: reqwest fetcher, log sink.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.fetch)?;
        Ok(Self::new(
            Arc::new(fetcher),
            Arc::new(LogSink),
            config.search.clone(),
        ))
    }

    /// Fetch every source concurrently; one outcome per source, in input order.
    pub async fn fetch_all(&self, sources: &[SourceInput]) -> Vec<SourceOutcome> {
        let fetches = sources.iter().map(|source| async move {
            SourceOutcome {
                source: source.clone(),
                result: fetch_source(self.fetcher.as_ref(), self.sink.as_ref(), source).await,
            }
        });
        join_all(fetches).await
    }

    /// Collect postings from successful sources; failures go to the sink.
    fn collect(&self, outcomes: Vec<SourceOutcome>) -> Vec<JobPosting> {
        let mut jobs = Vec::new();
        for outcome in outcomes {
            match outcome.result {
                Ok(postings) => {
                    log::debug!("{}: {} postings", outcome.source.label(), postings.len());
                    jobs.extend(postings);
                }
                Err(e) => self.sink.report("source", &outcome.source.url, &e),
            }
        }
        jobs
    }

    pub async fn search(&self, filters: &Filters) -> Result<Page<JobPosting>> {
        self.search_at(filters, Utc::now()).await
    }

    /// Search with an explicit clock.
    ///
    /// Bad queries and malformed board URLs fail before anything is fetched.
    /// After that, only successful sources contribute.
    pub async fn search_at(&self, filters: &Filters, now: DateTime<Utc>) -> Result<Page<JobPosting>> {
        filters.validate(self.config.max_sources)?;
        for source in &filters.sources {
            parse_org(source)?;
        }

        log::info!("Searching {} sources", filters.sources.len());
        let outcomes = self.fetch_all(&filters.sources).await;
        let jobs = self.collect(outcomes);
        let fetched = jobs.len();

        let page = rank(jobs, filters, now);
        log::info!(
            "Fetched {} postings, {} eligible, returning {}",
            fetched,
            page.total,
            page.count
        );
        Ok(page)
    }
}
