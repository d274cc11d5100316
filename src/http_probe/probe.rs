use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use tokio_native_tls::TlsConnector as TokioTlsConnector;
use url::{Host, Url};
use x509_parser::parse_x509_certificate;

use super::result::{CheckResult, CheckStatus, ProbeError};
use super::report;

/// Per-check options chosen by the operator.
#[derive(Debug, Clone)]
pub struct ProbeOptions {
    pub search_content: Option<String>,
    pub timeout: Duration,
}

/// What a successful GET returned.
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub content_found: Option<bool>,
}

/// Outcome of the TLS handshake on port 443.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlsProbe {
    pub valid: bool,
    pub cert_validity_days: Option<i64>,
}

/// A finished check: the record to persist plus details that are only displayed.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub result: CheckResult,
    pub headers: Vec<(String, String)>,
    pub cert_validity_days: Option<i64>,
}

/// Attempt a verified TLS handshake with `host` on port 443.
/// Any failure (unreachable, expired, self-signed, name mismatch) counts as invalid.
pub async fn probe_tls(host: &str, connector: &TokioTlsConnector) -> TlsProbe {
    let stream = match tokio::net::TcpStream::connect((host, 443)).await {
        Ok(stream) => stream,
        Err(e) => {
            log::debug!("TLS probe could not connect to {host}:443: {e}");
            return TlsProbe { valid: false, cert_validity_days: None };
        }
    };

    let tls_stream = match connector.connect(host, stream).await {
        Ok(tls_stream) => tls_stream,
        Err(e) => {
            log::debug!("TLS handshake with {host} failed: {e}");
            return TlsProbe { valid: false, cert_validity_days: None };
        }
    };

    let cert_validity_days = tls_stream
        .get_ref()
        .peer_certificate()
        .ok()
        .flatten()
        .and_then(|cert| cert.to_der().ok())
        .and_then(|der| cert_validity_days(&der));

    TlsProbe { valid: true, cert_validity_days }
}

fn cert_validity_days(cert_der: &[u8]) -> Option<i64> {
    let (_, parsed) = parse_x509_certificate(cert_der).ok()?;

    let not_after = parsed.validity().not_after.timestamp();
    let now = SystemTime::now().duration_since(UNIX_EPOCH).ok()?.as_secs() as i64;

    Some((not_after - now) / 86400)
}

/// Whether `url` names the https scheme, decided without requiring the rest to parse.
fn is_https(url: &str) -> bool {
    url.trim_start()
        .split_once(':')
        .is_some_and(|(scheme, _)| scheme.eq_ignore_ascii_case("https"))
}

/// The host to connect to and verify against; IPv6 literals lose their brackets.
fn tls_host(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    match parsed.host()? {
        Host::Domain(domain) => Some(domain.to_string()),
        Host::Ipv4(addr) => Some(addr.to_string()),
        Host::Ipv6(addr) => Some(addr.to_string()),
    }
}

/// Decode a body for searching. Invalid UTF-8 sequences are dropped.
fn decode_body(body: &[u8]) -> String {
    body.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

fn classify(err: reqwest::Error) -> ProbeError {
    if err.is_builder() {
        ProbeError::Other { message: report(&err) }
    } else if err.is_connect() || err.is_timeout() || err.is_request() {
        ProbeError::Connection { reason: report(&err) }
    } else {
        ProbeError::Other { message: report(&err) }
    }
}

/// Issue a single GET to `url`.
/// A response with a non-2xx status is an `Http` error; a body that cannot be read
/// only leaves `content_found` unset.
pub async fn probe_url(
    client: &reqwest::Client,
    url: &str,
    options: &ProbeOptions,
) -> Result<ProbeResponse, ProbeError> {
    let response = client
        .get(url)
        .timeout(options.timeout)
        .send()
        .await
        .map_err(classify)?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProbeError::Http {
            code: status.as_u16(),
            message: status.canonical_reason().unwrap_or("Unknown").to_string(),
        });
    }

    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    let content_found = match options.search_content.as_deref() {
        Some(needle) => match response.bytes().await {
            Ok(body) => Some(decode_body(&body).contains(needle)),
            Err(e) => {
                log::warn!("Could not read body of {url} for content search: {e}");
                None
            }
        },
        None => None,
    };

    Ok(ProbeResponse {
        status: status.as_u16(),
        headers,
        content_found,
    })
}

/// Run one complete check of `url`: optional TLS probe, then the GET.
/// The response time covers everything after the check starts, failures included.
pub async fn check_url(
    client: &reqwest::Client,
    connector: &TokioTlsConnector,
    url: &str,
    options: &ProbeOptions,
) -> ProbeReport {
    let mut result = CheckResult::new(url);
    let start = Instant::now();

    let mut cert_validity_days = None;
    if is_https(url) {
        let tls = match tls_host(url) {
            Some(host) => probe_tls(&host, connector).await,
            None => TlsProbe { valid: false, cert_validity_days: None },
        };
        result.ssl_valid = Some(tls.valid);
        cert_validity_days = tls.cert_validity_days;
    }

    let outcome = probe_url(client, url, options).await;
    result.set_response_time(start.elapsed().as_secs_f64());

    let headers = match outcome {
        Ok(response) => {
            result.status = CheckStatus::Success;
            result.response_code = Some(response.status);
            result.content_found = response.content_found;
            response.headers
        }
        Err(err) => {
            result.record_failure(&err);
            Vec::new()
        }
    };

    ProbeReport {
        result,
        headers,
        cert_validity_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::app_config::setup_tls_connector;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn options(search: Option<&str>) -> ProbeOptions {
        ProbeOptions {
            search_content: search.map(str::to_string),
            timeout: Duration::from_secs(5),
        }
    }

    fn closed_port() -> u16 {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("local addr").port()
    }

    #[tokio::test]
    async fn test_success_records_code_and_time() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("user-agent", "sitecheck-test"))
            .respond_with(ResponseTemplate::new(200).insert_header("x-probe", "yes"))
            .mount(&mock_server)
            .await;

        let client = reqwest::Client::builder()
            .user_agent("sitecheck-test")
            .build()
            .expect("client");
        let connector = setup_tls_connector().expect("connector");

        let report = check_url(&client, &connector, &mock_server.uri(), &options(None)).await;
        let result = report.result;
        assert_eq!(result.status, CheckStatus::Success);
        assert_eq!(result.response_code, Some(200));
        assert!(result.response_time.expect("response time") >= 0.0);
        // plain http never gets a TLS verdict
        assert!(result.ssl_valid.is_none());
        assert!(result.content_found.is_none());
        assert!(result.error.is_none());
        assert!(report.headers.iter().any(|(name, value)| name == "x-probe" && value == "yes"));
    }

    #[tokio::test]
    async fn test_not_found_is_http_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = reqwest::Client::new();
        let connector = setup_tls_connector().expect("connector");
        let url = format!("{}/missing", mock_server.uri());

        let result = check_url(&client, &connector, &url, &options(None)).await.result;
        assert_eq!(result.status, CheckStatus::HttpError);
        assert_eq!(result.response_code, Some(404));
        assert_eq!(result.error.as_deref(), Some("HTTP Error 404: Not Found"));
        assert!(result.response_time.is_some());
    }

    #[tokio::test]
    async fn test_unreachable_port_is_url_error() {
        let client = reqwest::Client::new();
        let connector = setup_tls_connector().expect("connector");
        let url = format!("http://127.0.0.1:{}/", closed_port());

        let result = check_url(&client, &connector, &url, &options(None)).await.result;
        assert_eq!(result.status, CheckStatus::UrlError);
        assert!(result.response_code.is_none());
        assert!(!result.error.expect("reason").is_empty());
        assert!(result.response_time.is_some());
    }

    #[tokio::test]
    async fn test_https_check_sets_ssl_valid() {
        let client = reqwest::Client::new();
        let connector = setup_tls_connector().expect("connector");
        let url = format!("https://127.0.0.1:{}/", closed_port());

        let result = check_url(&client, &connector, &url, &options(None)).await.result;
        assert_eq!(result.ssl_valid, Some(false));
        assert_eq!(result.status, CheckStatus::UrlError);
    }

    #[tokio::test]
    async fn test_invalid_url_is_generic_error() {
        let client = reqwest::Client::new();
        let connector = setup_tls_connector().expect("connector");

        let result = check_url(&client, &connector, "not a url", &options(None)).await.result;
        assert_eq!(result.status, CheckStatus::Error);
        assert!(result.response_code.is_none());
        assert!(result.ssl_valid.is_none());
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn test_content_search() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><h1>Example Domain</h1></html>"),
            )
            .mount(&mock_server)
            .await;

        let client = reqwest::Client::new();
        let connector = setup_tls_connector().expect("connector");
        let url = mock_server.uri();

        let found = check_url(&client, &connector, &url, &options(Some("Example Domain")))
            .await
            .result;
        assert_eq!(found.content_found, Some(true));

        let missing = check_url(&client, &connector, &url, &options(Some("Nonexistent Text")))
            .await
            .result;
        assert_eq!(missing.content_found, Some(false));
        assert_eq!(missing.status, CheckStatus::Success);
    }

    #[tokio::test]
    async fn test_content_search_skips_invalid_utf8() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_bytes(b"Exa\xffmple Domain".to_vec()),
            )
            .mount(&mock_server)
            .await;

        let client = reqwest::Client::new();
        let connector = setup_tls_connector().expect("connector");

        let url = mock_server.uri();
        let result = check_url(&client, &connector, &url, &options(Some("Example Domain")))
            .await
            .result;
        assert_eq!(result.status, CheckStatus::Success);
        assert_eq!(result.content_found, Some(true));
    }

    #[test]
    fn test_decode_body_drops_invalid_sequences() {
        assert_eq!(decode_body(b"Exa\xffmple Domain"), "Example Domain");
        assert_eq!(decode_body(b"\xc3\xa9t\xe9"), "\u{e9}t");
        assert_eq!(decode_body(b""), "");
    }

    #[test]
    fn test_https_scheme_detection() {
        assert!(is_https("https://example.com"));
        assert!(is_https("HTTPS://example.com"));
        assert!(is_https("https://exa mple.com/"));
        assert!(!is_https("http://example.com"));
        assert!(!is_https("example.com"));
        assert!(!is_https("not a url"));
    }

    #[test]
    fn test_tls_host_strips_ipv6_brackets() {
        assert_eq!(tls_host("https://[::1]:8443/").as_deref(), Some("::1"));
        assert_eq!(tls_host("https://127.0.0.1/").as_deref(), Some("127.0.0.1"));
        assert_eq!(tls_host("https://Example.COM/path").as_deref(), Some("example.com"));
        assert_eq!(tls_host("https://exa mple.com/"), None);

        // the unbracketed literal resolves without a name lookup
        let host = tls_host("https://[::1]/").expect("host");
        let mut addrs = std::net::ToSocketAddrs::to_socket_addrs(&(host.as_str(), 443))
            .expect("ipv6 literal address");
        assert_eq!(
            addrs.next(),
            Some(std::net::SocketAddr::from((std::net::Ipv6Addr::LOCALHOST, 443)))
        );
    }

    #[tokio::test]
    async fn test_unparseable_https_url_is_not_ssl_valid() {
        let client = reqwest::Client::new();
        let connector = setup_tls_connector().expect("connector");

        let result = check_url(&client, &connector, "https://exa mple.com/", &options(None))
            .await
            .result;
        assert_eq!(result.ssl_valid, Some(false));
        assert_eq!(result.status, CheckStatus::Error);
    }

    #[tokio::test]
    async fn test_tls_probe_fails_without_listener() {
        let connector = setup_tls_connector().expect("connector");
        let tls = probe_tls("127.0.0.1", &connector).await;
        assert!(!tls.valid);
        assert!(tls.cert_validity_days.is_none());
    }
}
