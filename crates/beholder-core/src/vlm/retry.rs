//! Retry classification for VLM failures.
//!
//! Only server-side (5xx) backend errors are retried; everything else aborts
//! the describe request immediately. The delay between attempts is fixed,
//! not exponential.

use crate::error::DescribeError;
use std::time::Duration;

/// Determine whether a describe failure is worth retrying.
///
/// Retryable: backend responses in the 5xx range.
/// Non-retryable: auth failures, bad requests, rate limits, fetch errors,
/// timeouts, and anything without an HTTP status.
pub fn is_retryable(error: &DescribeError) -> bool {
    match error {
        DescribeError::Vlm {
            status_code: Some(code),
            ..
        } => (500..=599).contains(code),
        _ => false,
    }
}

/// Fixed delay applied between attempts.
pub fn retry_delay(delay_ms: u64) -> Duration {
    Duration::from_millis(delay_ms)
}
