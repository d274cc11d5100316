use std::collections::BTreeMap;

use crate::http_probe::result::CheckResult;

/// Aggregate figures over a batch of checks.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub success_rate: f64,
    pub failure_rate: f64,
    pub average_response_time: f64,
}

/// Historical figures for one URL.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlStats {
    pub url: String,
    pub total: usize,
    pub successful: usize,
    pub uptime: f64,
    pub average_response_time: f64,
}

/// `successful / total * 100`, or 0 when nothing was checked.
pub fn uptime_percentage(successful: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        successful as f64 / total as f64 * 100.0
    }
}

/// Mean of the recorded response times; entries without one are skipped.
pub fn average_response_time<'a>(results: impl IntoIterator<Item = &'a CheckResult>) -> f64 {
    let times: Vec<f64> = results
        .into_iter()
        .filter_map(|result| result.response_time)
        .collect();

    if times.is_empty() {
        0.0
    } else {
        times.iter().sum::<f64>() / times.len() as f64
    }
}

pub fn summarize(results: &[CheckResult]) -> Summary {
    let total = results.len();
    let successful = results.iter().filter(|r| r.is_success()).count();
    let failed = total - successful;

    Summary {
        total,
        successful,
        failed,
        success_rate: uptime_percentage(successful, total),
        failure_rate: uptime_percentage(failed, total),
        average_response_time: average_response_time(results),
    }
}

/// Group records by URL, in URL order.
pub fn per_url_stats(records: &[CheckResult]) -> Vec<UrlStats> {
    let mut grouped: BTreeMap<&str, Vec<&CheckResult>> = BTreeMap::new();
    for record in records {
        grouped.entry(record.url.as_str()).or_default().push(record);
    }

    grouped
        .into_iter()
        .map(|(url, checks)| {
            let total = checks.len();
            let successful = checks.iter().filter(|r| r.is_success()).count();
            UrlStats {
                url: url.to_string(),
                total,
                successful,
                uptime: uptime_percentage(successful, total),
                average_response_time: average_response_time(checks.iter().copied()),
            }
        })
        .collect()
}
