//! Error types for every collaborator the dashboard talks to.
//!
//! Each concern gets its own enum so the UI can match on the failure kind
//! and degrade one section at a time.
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure while downloading a dated snapshot.
///
/// A non-200 response is not an error; see `FetchOutcome::NotAvailable`.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    /// DNS, connect or protocol failure reported by the HTTP client.
    #[error("HTTP transport error for {url}: {message}")]
    Http { url: String, message: String },

    /// Creating the data directory or persisting the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Failure while loading or querying a snapshot CSV.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("snapshot file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// One or more of the columns needed for the metric are absent.
    #[error("required columns not found: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("instrument not found: {0}")]
    InstrumentNotFound(String),

    /// A price cell could not be read as a number.
    #[error("invalid {column} value {value:?} for {instrument}")]
    InvalidPrice {
        instrument: String,
        column: String,
        value: String,
    },
}

/// Failure while computing a derived metric.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricError {
    /// Percentage change against a zero base price is undefined.
    #[error("base price is zero")]
    ZeroBase,

    #[error("non-finite price: {0}")]
    NonFinite(f64),
}

/// Failure while fetching a live quote.
#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("quote transport error: {0}")]
    Transport(#[from] FetchError),

    #[error("quote provider returned status {status} for {symbol}")]
    Status { symbol: String, status: u16 },

    #[error("failed to parse quote response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The provider answered but carried no current price.
    #[error("no price data available for {0}")]
    MissingPrice(String),
}

/// Failure while loading the dashboard configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error reading {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid config {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}
