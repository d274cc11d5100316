use std::io;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;
use tokio::time::sleep;
use tokio_native_tls::TlsConnector as TokioTlsConnector;

use crate::config::app_config::{setup_http_client, setup_tls_connector};
use crate::config::model::Settings;
use crate::display;
use crate::history::History;
use crate::history::report::summarize;
use crate::http_probe::prelude::*;

/// Pause between consecutive requests of a multi-site check.
pub const BATCH_PAUSE: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum CheckerError {
    #[error("failed to set up TLS connector: {0}")]
    Tls(#[from] native_tls::Error),

    #[error("failed to set up HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Owns everything a check needs and the history every check is appended to.
pub struct Checker {
    client: reqwest::Client,
    connector: TokioTlsConnector,
    settings: Settings,
    history: History,
}

impl Checker {
    pub fn new(
        settings: Settings,
        client: reqwest::Client,
        connector: TokioTlsConnector,
        history: History,
    ) -> Self {
        Self {
            client,
            connector,
            settings,
            history,
        }
    }

    /// Build the client and connector from `settings` and load the history file it names.
    pub fn from_settings(settings: Settings) -> Result<Self, CheckerError> {
        let client = setup_http_client(&settings)?;
        let connector = setup_tls_connector()?;
        let history = History::load(&settings.log_file);
        Ok(Self::new(settings, client, connector, history))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.timeout_seconds)
    }

    /// Check one site, print the outcome and persist it.
    pub async fn check_site(
        &mut self,
        url: &str,
        search_content: Option<&str>,
        timeout: Option<Duration>,
    ) -> CheckResult {
        println!("🔍 Checking {url}...");

        let options = ProbeOptions {
            search_content: search_content.map(str::to_string),
            timeout: timeout.unwrap_or_else(|| self.default_timeout()),
        };
        let report = check_url(&self.client, &self.connector, url, &options).await;
        display::print_probe_report(&report);

        let result = report.result;
        log::debug!("Check of {} finished with status {}", url, result.status);
        if let Err(e) = self.history.record(result.clone()) {
            println!("⚠️  Could not save history to {}: {}", self.history.path().display(), e);
        }
        result
    }

    /// Check each URL in order, pausing between requests, then print a summary.
    pub async fn check_sites(
        &mut self,
        urls: &[String],
        search_content: Option<&str>,
    ) -> Vec<CheckResult> {
        let mut results = Vec::with_capacity(urls.len());

        for (index, url) in urls.iter().enumerate() {
            if index > 0 {
                sleep(BATCH_PAUSE).await;
            }
            println!();
            results.push(self.check_site(url, search_content, None).await);
        }

        let summary = summarize(&results);
        display::print_summary(&summary, &results);
        results
    }
}

/// URLs from a batch file: one per line, surrounding whitespace trimmed, blank lines skipped.
pub fn parse_url_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn read_url_file(path: &Path) -> io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_url_list(&content))
}
