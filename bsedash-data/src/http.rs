use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;

use crate::config::DashboardConfig;
use crate::error::FetchError;

/// Status and full body of one GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Blocking GET used by the snapshot fetcher and the quote client.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

/// `reqwest` blocking client with a browser user agent and explicit timeout.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout_secs: u64,
}

impl ReqwestTransport {
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .cookie_store(true)
            .gzip(true)
            .build()
            .map_err(|e| FetchError::Http {
                url: String::new(),
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self, FetchError> {
        Self::new(&config.user_agent, config.timeout_secs)
    }

    fn map_error(&self, url: &str, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                secs: self.timeout_secs,
            }
        } else {
            FetchError::Http {
                url: url.to_string(),
                message: error_chain(&err),
            }
        }
    }
}

/// `err` followed by each of its sources, joined with `: `.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        // Some wrappers repeat the inner message verbatim.
        if !message.ends_with(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| self.map_error(url, e))?;

        let status = response.status().as_u16();
        // The body is buffered in full before anything touches the disk.
        let body = response.bytes().map_err(|e| self.map_error(url, e))?;
        debug!("GET {} -> {} ({} bytes)", url, status, body.len());

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}
