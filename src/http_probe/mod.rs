pub mod probe;
pub mod result;
pub mod status_codes;

pub mod prelude {
    pub use super::probe::{ProbeOptions, ProbeReport, check_url};
    pub use super::result::{CheckResult, CheckStatus};
}

use std::fmt::Write;

/// Render an error together with its chain of sources on a single line.
fn report(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let text = src.to_string();
        // reqwest repeats the inner message in its own Display
        if !s.ends_with(&text) {
            let _ = write!(s, ": {}", text);
        }
        err = src;
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[derive(Debug, thiserror::Error)]
    #[error("request failed")]
    struct Outer(#[source] io::Error);

    #[test]
    fn test_report_includes_sources() {
        let err = Outer(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"));
        assert_eq!(report(&err), "request failed: connection refused");
    }
}
