// src/lib.rs

//! ATS job search library
//!
//! Aggregates postings from Greenhouse, Lever and Ashby boards into one
//! canonical shape, then filters, deduplicates, scores and paginates them.

pub mod error;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;

#[cfg(test)]
mod testing;
