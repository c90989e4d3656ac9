pub mod config;
pub mod downloads;
pub mod error;
pub mod http;
pub mod metrics;
pub mod models;
pub mod quotes;
pub mod snapshot;

pub use config::DashboardConfig;
pub use downloads::{download_bhavcopy, download_bhavcopy_for_today, FetchFailure, FetchOutcome, FetchState};
pub use error::{ConfigError, FetchError, MetricError, QuoteError, SnapshotError};
pub use http::{HttpResponse, ReqwestTransport, Transport};
pub use models::{InstrumentRow, LiveQuote, SnapshotFile};
pub use quotes::fetch_live_quote;
pub use snapshot::{latest_snapshot, list_snapshots, BhavCopy};

#[derive(Debug)]
pub enum QuoteMessage {
    Done(String, Result<LiveQuote, String>),
}
