//! Error taxonomy for the ingestion pipeline.
//!
//! A non-numeric measurement is not an error: it is recovered in place as
//! a missing value during parsing. Everything here is terminal for the
//! current data load; nothing is retried.

use thiserror::Error;

/// Failure while retrieving the raw dataset over HTTP.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The source string did not parse as an URL.
    #[error("invalid dataset url {url:?}")]
    InvalidUrl { url: String },

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Transport-level failure (DNS, TLS, connection reset).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Failure while turning raw CSV bytes into a typed table.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A record (header included) did not have the expected column count.
    #[error("record {record}: expected {expected} columns, found {found}")]
    Schema {
        record: u64,
        expected: usize,
        found: usize,
    },

    /// A timestamp did not match the fixed parse rule. Aborts the parse.
    #[error("record {record}: unparseable timestamp {value:?}")]
    Timestamp { record: u64, value: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
