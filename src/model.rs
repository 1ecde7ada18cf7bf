/// Core data types for the Harris County rainfall service.
///
/// This module defines the shared domain model imported by the ingest,
/// analysis and endpoint layers. It contains no I/O.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Reporting period
// ---------------------------------------------------------------------------

/// Number of complete calendar days summed for a rainfall total.
pub const RAINFALL_PERIOD_DAYS: i64 = 7;

/// Human-readable period reported alongside every rainfall total.
pub const RAINFALL_PERIOD_DESCRIPTION: &str = "7 complete days prior to today";

// ---------------------------------------------------------------------------
// Reading types
// ---------------------------------------------------------------------------

/// When a rainfall row was observed.
///
/// FWS gage pages report either timed increments (end of the reporting
/// interval) or whole-day totals, depending on the span requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservedAt {
    Timed(NaiveDateTime),
    Day(NaiveDate),
}

/// A single incremental rainfall amount parsed from a gage detail page.
#[derive(Debug, Clone, PartialEq)]
pub struct RainfallIncrement {
    pub observed_at: ObservedAt,
    pub inches: f64,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or processing FWS rainfall data.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Non-2xx HTTP response from the FWS site (other than 404).
    #[error("Harris County FWS returned HTTP {0}")]
    Http(u16),
    /// Transport-level failure (DNS, connect, timeout, body read).
    #[error("Request to Harris County FWS failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The page could not be interpreted.
    #[error("Parse error: {0}")]
    Parse(String),
    /// The collaborator could not be constructed.
    #[error("Scraper setup failed: {0}")]
    Client(String),
}
