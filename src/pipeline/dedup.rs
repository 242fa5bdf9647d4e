// src/pipeline/dedup.rs

use std::collections::HashSet;

use crate::models::JobPosting;

/// Drop repeated roles, keeping the first occurrence of each
/// `company|title|location` key (case-insensitive). Order is preserved.
pub fn dedupe(jobs: Vec<JobPosting>) -> Vec<JobPosting> {
    let mut seen = HashSet::new();
    let before = jobs.len();
    let unique: Vec<JobPosting> = jobs
        .into_iter()
        .filter(|job| seen.insert(job.dedup_key()))
        .collect();

    if unique.len() < before {
        log::debug!("Dropped {} duplicate postings", before - unique.len());
    }
    unique
}
