use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::{Local, NaiveDate};
use log::{info, warn};
use tempfile::NamedTempFile;

use crate::config::DashboardConfig;
use crate::error::FetchError;
use crate::http::Transport;
use crate::models::{date_key, SnapshotFile};

/// Result of one fetch attempt that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Saved(SnapshotFile),
    /// Server answered with something other than 200, usually a holiday.
    NotAvailable { date: NaiveDate, status: u16 },
}

/// Why a run ended without a snapshot. Holidays and network trouble stay apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    NotAvailable { date: NaiveDate, status: u16 },
    Timeout { url: String, secs: u64 },
    Transport(String),
}

impl FetchFailure {
    /// True when the server answered; the exchange simply has no file.
    pub fn is_not_available(&self) -> bool {
        matches!(self, FetchFailure::NotAvailable { .. })
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::NotAvailable { date, status } => write!(
                f,
                "Bhav copy not available for {} (HTTP {}), maybe a market holiday",
                date.format("%Y-%m-%d"),
                status
            ),
            FetchFailure::Timeout { url, secs } => {
                write!(f, "Request to {} timed out after {}s", url, secs)
            }
            FetchFailure::Transport(msg) => f.write_str(msg),
        }
    }
}

impl From<&FetchError> for FetchFailure {
    fn from(err: &FetchError) -> Self {
        match err {
            FetchError::Timeout { url, secs } => FetchFailure::Timeout {
                url: url.clone(),
                secs: *secs,
            },
            other => FetchFailure::Transport(other.to_string()),
        }
    }
}

/// Per-run fetch state. There is no way back to `NotFetched`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    NotFetched,
    Fetched(SnapshotFile),
    Failed(FetchFailure),
}

impl FetchState {
    pub fn from_result(result: &Result<FetchOutcome, FetchError>) -> Self {
        match result {
            Ok(FetchOutcome::Saved(snapshot)) => FetchState::Fetched(snapshot.clone()),
            Ok(FetchOutcome::NotAvailable { date, status }) => {
                FetchState::Failed(FetchFailure::NotAvailable {
                    date: *date,
                    status: *status,
                })
            }
            Err(e) => FetchState::Failed(FetchFailure::from(e)),
        }
    }
}

pub fn snapshot_url(template: &str, date: NaiveDate) -> String {
    template.replace("{date}", &date_key(date))
}

/// Downloads the Bhav Copy for `date` into `dir`.
///
/// Non-200 responses leave the filesystem untouched and come back as
/// `FetchOutcome::NotAvailable`.
pub fn download_bhavcopy(
    transport: &dyn Transport,
    url_template: &str,
    dir: &Path,
    date: NaiveDate,
) -> Result<FetchOutcome, FetchError> {
    let url = snapshot_url(url_template, date);
    info!("Trying to download: {}", url);

    let response = transport.get(&url)?;

    if !response.is_ok() {
        warn!(
            "Bhav copy not available for {} (HTTP {}), maybe a market holiday",
            date_key(date),
            response.status
        );
        return Ok(FetchOutcome::NotAvailable {
            date,
            status: response.status,
        });
    }

    fs::create_dir_all(dir)?;
    let snapshot = SnapshotFile::in_dir(dir, date);
    write_atomically(&snapshot.path, &response.body)?;

    info!("Bhav copy saved to: {}", snapshot.path.display());
    Ok(FetchOutcome::Saved(snapshot))
}

pub fn download_bhavcopy_for_today(
    transport: &dyn Transport,
    config: &DashboardConfig,
) -> Result<FetchOutcome, FetchError> {
    let today = Local::now().date_naive();
    download_bhavcopy(
        transport,
        &config.snapshot_url_template,
        &config.data_dir,
        today,
    )
}

// Temp file in the same directory so the rename stays on one filesystem.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), FetchError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| FetchError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SNAPSHOT_URL_TEMPLATE;
    use crate::http::HttpResponse;

    struct Fixed(u16, &'static [u8]);

    impl Transport for Fixed {
        fn get(&self, _url: &str) -> Result<HttpResponse, FetchError> {
            Ok(HttpResponse::new(self.0, self.1))
        }
    }

    #[test]
    fn url_substitutes_compact_date() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        assert_eq!(
            snapshot_url(DEFAULT_SNAPSHOT_URL_TEMPLATE, date),
            "https://www.bseindia.com/download/BhavCopy/Equity/BhavCopy_BSE_CM_0_0_0_20250704_F_0000.CSV"
        );
    }

    #[test]
    fn existing_file_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        let path = dir.path().join("20250704.csv");
        fs::write(&path, b"stale,longer,content\n").unwrap();

        let outcome =
            download_bhavcopy(&Fixed(200, b"fresh\n"), "{date}", dir.path(), date).unwrap();

        assert!(matches!(outcome, FetchOutcome::Saved(_)));
        assert_eq!(fs::read(&path).unwrap(), b"fresh\n");
    }

    #[test]
    fn state_follows_outcome() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 5).unwrap();
        let snap = SnapshotFile::in_dir(Path::new("data"), date);

        assert_eq!(
            FetchState::from_result(&Ok(FetchOutcome::Saved(snap.clone()))),
            FetchState::Fetched(snap)
        );

        let failed = FetchState::from_result(&Ok(FetchOutcome::NotAvailable { date, status: 404 }));
        match failed {
            FetchState::Failed(failure) => {
                assert!(failure.is_not_available());
                let msg = failure.to_string();
                assert!(msg.contains("2025-07-05") && msg.contains("404"));
            }
            other => panic!("unexpected state {:?}", other),
        }

        let timeout = Err(FetchError::Timeout {
            url: "u".into(),
            secs: 10,
        });
        assert_eq!(
            FetchState::from_result(&timeout),
            FetchState::Failed(FetchFailure::Timeout {
                url: "u".into(),
                secs: 10
            })
        );

        let refused = Err(FetchError::Http {
            url: "u".into(),
            message: "Connection refused".into(),
        });
        match FetchState::from_result(&refused) {
            FetchState::Failed(failure) => {
                assert!(!failure.is_not_available());
                assert!(failure.to_string().contains("Connection refused"));
            }
            other => panic!("unexpected state {:?}", other),
        }
        assert_eq!(FetchState::default(), FetchState::NotFetched);
    }
}
