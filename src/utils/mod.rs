//! Utility functions and helpers.

pub mod http;
pub mod sink;
pub mod text;
pub mod time;
pub mod url;

pub use http::{Fetch, FetchResponse, HttpFetcher};
pub use sink::{ErrorSink, LogSink};
