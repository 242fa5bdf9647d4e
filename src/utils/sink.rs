// src/utils/sink.rs

//! Observability sink for failures the pipeline deliberately swallows.

use crate::error::AppError;

/// Receives `(context, identifier, error)` for isolated failures.
///
/// Implementations must not affect control flow.
pub trait ErrorSink: Send + Sync {
    fn report(&self, context: &str, id: &str, error: &AppError);
}

/// Default sink: one warning per swallowed failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ErrorSink for LogSink {
    fn report(&self, context: &str, id: &str, error: &AppError) {
        log::warn!("[{}] {}: {}", context, id, error);
    }
}
