use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const SAMPLE_FILE_NAME: &str = "bhav_copy.CSV";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36";

pub const DEFAULT_SNAPSHOT_URL_TEMPLATE: &str =
    "https://www.bseindia.com/download/BhavCopy/Equity/BhavCopy_BSE_CM_0_0_0_{date}_F_0000.CSV";

pub const DEFAULT_QUOTE_URL_TEMPLATE: &str =
    "https://query1.finance.yahoo.com/v8/finance/chart/{symbol}?range=1d&interval=1d";

pub const DEFAULT_TICKERS: [&str; 10] = [
    "RELIANCE", "TCS", "INFY", "HDFCBANK",
    "ICICIBANK", "SBIN", "LT", "ITC", "BHARTIARTL", "AXISBANK",
];

/// Dashboard settings. Every field has a default so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Download URL with a `{date}` placeholder (`YYYYMMDD`).
    pub snapshot_url_template: String,
    /// Quote URL with a `{symbol}` placeholder (exchange suffix included).
    pub quote_url_template: String,
    pub tickers: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            snapshot_url_template: DEFAULT_SNAPSHOT_URL_TEMPLATE.to_string(),
            quote_url_template: DEFAULT_QUOTE_URL_TEMPLATE.to_string(),
            tickers: DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl DashboardConfig {
    pub fn sample_file(&self) -> PathBuf {
        self.data_dir.join(SAMPLE_FILE_NAME)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `explicit` if given, otherwise the platform config file when it
    /// exists, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            info!("Loading config from {}", path.display());
            return Self::from_file(path);
        }

        match get_config_path() {
            Some(path) if path.is_file() => {
                info!("Loading config from {}", path.display());
                Self::from_file(&path)
            }
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }
}

pub fn get_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "BseDash").map(|dirs| dirs.config_dir().join("config.json"))
}
