use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::time::sleep;

use crate::checker::Checker;
use crate::history::report::uptime_percentage;
use crate::http_probe::result::CheckResult;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlertError {
    #[error("alert delivery to {recipient} is not implemented")]
    NotImplemented { recipient: String },
}

/// Sends an alert about a failed check.
pub trait Notifier {
    fn notify(&self, recipient: &str, result: &CheckResult) -> Result<(), AlertError>;
}

/// E-mail alerts. There is no delivery mechanism yet, so every call reports
/// `AlertError::NotImplemented`.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmailNotifier;

impl Notifier for EmailNotifier {
    fn notify(&self, recipient: &str, result: &CheckResult) -> Result<(), AlertError> {
        log::debug!("Alert requested for {} about {}", recipient, result.url);
        Err(AlertError::NotImplemented {
            recipient: recipient.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct MonitorOptions {
    pub interval: Duration,
    pub duration: Duration,
    pub alert_recipient: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorSummary {
    pub checks: usize,
    pub failures: usize,
}

impl MonitorSummary {
    pub fn uptime(&self) -> f64 {
        uptime_percentage(self.checks - self.failures, self.checks)
    }
}

/// Check `url` repeatedly until `options.duration` has elapsed.
/// Every check goes into the history like any other; the loop sleeps `options.interval`
/// between checks unless the duration is already used up.
pub async fn monitor_site(
    checker: &mut Checker,
    url: &str,
    options: &MonitorOptions,
    notifier: &dyn Notifier,
) -> MonitorSummary {
    println!(
        "⏱️  Monitoring {} every {}s for {}s",
        url,
        options.interval.as_secs(),
        options.duration.as_secs()
    );

    let start = Instant::now();
    let mut summary = MonitorSummary { checks: 0, failures: 0 };

    while start.elapsed() < options.duration {
        println!();
        let result = checker.check_site(url, None, None).await;
        summary.checks += 1;

        if !result.is_success() {
            summary.failures += 1;
            if let Some(recipient) = options.alert_recipient.as_deref() {
                if let Err(e) = notifier.notify(recipient, &result) {
                    println!("📧 Could not send alert: {e}");
                }
            }
        }

        println!(
            "   Uptime so far: {:.2}% ({} checks, {} failed)",
            summary.uptime(),
            summary.checks,
            summary.failures
        );

        if start.elapsed() >= options.duration {
            break;
        }
        sleep(options.interval).await;
    }

    println!();
    println!("🏁 Monitoring of {url} finished");
    println!("   Total checks: {}", summary.checks);
    println!("   Failed checks: {}", summary.failures);
    println!("   Overall uptime: {:.2}%", summary.uptime());

    summary
}
