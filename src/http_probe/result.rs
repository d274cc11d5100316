use std::fmt;

use chrono::Local;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a single check, stored as a snake_case string in the history file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Success,
    HttpError,
    UrlError,
    Error,
    #[default]
    Unknown,
}

impl CheckStatus {
    pub fn is_success(self) -> bool {
        self == CheckStatus::Success
    }

    /// Console marker used in summaries and reports.
    pub fn symbol(self) -> &'static str {
        match self {
            CheckStatus::Success => "✅",
            _ => "❌",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CheckStatus::Success => "success",
            CheckStatus::HttpError => "http_error",
            CheckStatus::UrlError => "url_error",
            CheckStatus::Error => "error",
            CheckStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Why a probe did not succeed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProbeError {
    /// The server answered, but with a non-success status code.
    #[error("HTTP Error {code}: {message}")]
    Http { code: u16, message: String },

    /// The request never got a response: refused, unresolvable, timed out.
    #[error("{reason}")]
    Connection { reason: String },

    /// Anything else, including URLs that cannot be parsed.
    #[error("{message}")]
    Other { message: String },
}

impl ProbeError {
    pub fn status(&self) -> CheckStatus {
        match self {
            ProbeError::Http { .. } => CheckStatus::HttpError,
            ProbeError::Connection { .. } => CheckStatus::UrlError,
            ProbeError::Other { .. } => CheckStatus::Error,
        }
    }

    pub fn code(&self) -> Option<u16> {
        match self {
            ProbeError::Http { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// One persisted outcome of probing a URL.
/// Optional fields serialize as `null` so every history entry has the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub url: String,
    pub timestamp: String,
    #[serde(default)]
    pub status: CheckStatus,
    #[serde(default)]
    pub response_code: Option<u16>,
    #[serde(default)]
    pub response_time: Option<f64>,
    #[serde(default)]
    pub ssl_valid: Option<bool>,
    #[serde(default)]
    pub content_found: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
}

impl CheckResult {
    /// A fresh record for `url`, stamped with the current local time.
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            timestamp: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            status: CheckStatus::Unknown,
            response_code: None,
            response_time: None,
            ssl_valid: None,
            content_found: None,
            error: None,
        }
    }

    pub fn set_response_time(&mut self, seconds: f64) {
        self.response_time = Some(round_millis(seconds));
    }

    pub fn record_failure(&mut self, err: &ProbeError) {
        self.status = err.status();
        self.response_code = err.code();
        self.error = Some(err.to_string());
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Round seconds to millisecond precision.
pub fn round_millis(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}
