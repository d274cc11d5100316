use unicode_truncate::UnicodeTruncateStr;

use crate::history::report::{Summary, UrlStats};
use crate::http_probe::prelude::*;
use crate::http_probe::status_codes::describe;

const URL_COLUMN_WIDTH: usize = 50;

pub fn to_fixed_width(input: &str, width: usize) -> String {
    let (truncated, _) = input.unicode_truncate(width);
    format!("{:<width$}", truncated, width = width)
}

fn format_code(code: Option<u16>) -> String {
    code.map(|c| c.to_string()).unwrap_or_else(|| "---".to_string())
}

fn format_time(seconds: Option<f64>) -> String {
    seconds
        .map(|t| format!("{t:.3}s"))
        .unwrap_or_else(|| "N/A".to_string())
}

/// One line per check: marker, url, code and time.
pub fn summary_line(result: &CheckResult) -> String {
    format!(
        "{} {} {:>4} {:>9}",
        result.status.symbol(),
        to_fixed_width(&result.url, URL_COLUMN_WIDTH),
        format_code(result.response_code),
        format_time(result.response_time),
    )
}

pub fn print_probe_report(report: &ProbeReport) {
    let result = &report.result;

    if let Some(valid) = result.ssl_valid {
        if valid {
            let expiry = report
                .cert_validity_days
                .map(|d| format!(" (expires in {d} days)"))
                .unwrap_or_default();
            println!("🔒 SSL certificate is valid{expiry}");
        } else {
            println!("⚠️  SSL certificate is invalid or could not be verified");
        }
    }

    match result.status {
        CheckStatus::Success => {
            println!("✅ {} is reachable", result.url);
            if let Some(code) = result.response_code {
                println!("   Status: {} ({})", code, describe(code));
            }
            println!("   Response time: {}", format_time(result.response_time));
            if !report.headers.is_empty() {
                println!("   Headers:");
                for (name, value) in &report.headers {
                    println!("     {name}: {value}");
                }
            }
            match result.content_found {
                Some(true) => println!("   🔍 Search text found in the response"),
                Some(false) => println!("   🔍 Search text NOT found in the response"),
                None => {}
            }
        }
        CheckStatus::HttpError => {
            let code = result.response_code.unwrap_or_default();
            println!("❌ HTTP error for {}: {} ({})", result.url, code, describe(code));
        }
        CheckStatus::UrlError => {
            println!(
                "❌ Could not connect to {}: {}",
                result.url,
                result.error.as_deref().unwrap_or("unknown reason")
            );
        }
        CheckStatus::Error | CheckStatus::Unknown => {
            println!(
                "❌ Error checking {}: {}",
                result.url,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}

pub fn print_summary(summary: &Summary, results: &[CheckResult]) {
    println!();
    println!("📊 Summary");
    println!("   Total sites checked: {}", summary.total);
    println!(
        "   Successful: {} ({:.1}%)",
        summary.successful, summary.success_rate
    );
    println!("   Failed: {} ({:.1}%)", summary.failed, summary.failure_rate);
    println!(
        "   Average response time: {:.3}s",
        summary.average_response_time
    );
    println!();
    for result in results {
        println!("{}", summary_line(result));
    }
}

pub fn print_history_report(stats: &[UrlStats]) {
    if stats.is_empty() {
        println!("No checks recorded yet.");
        return;
    }

    println!("📈 Historical report");
    for entry in stats {
        println!();
        println!("🌐 {}", entry.url);
        println!("   Total checks: {}", entry.total);
        println!("   Successful checks: {}", entry.successful);
        println!("   Uptime: {:.2}%", entry.uptime);
        println!(
            "   Average response time: {:.3}s",
            entry.average_response_time
        );
    }
}

pub fn print_recent(results: &[CheckResult]) {
    if results.is_empty() {
        println!("No checks recorded yet.");
        return;
    }

    for result in results {
        println!("{}  {}", result.timestamp, summary_line(result));
    }
}
