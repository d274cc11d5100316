pub const UNKNOWN_STATUS: &str = "Unknown status code";

const STATUS_DESCRIPTIONS: &[(u16, &str)] = &[
    (200, "OK - Request succeeded"),
    (201, "Created - Resource created"),
    (204, "No Content - Request succeeded with no body"),
    (301, "Moved Permanently - Resource moved to a new URL"),
    (302, "Found - Resource temporarily moved"),
    (304, "Not Modified - Cached version is still valid"),
    (400, "Bad Request - Server could not understand the request"),
    (401, "Unauthorized - Authentication required"),
    (403, "Forbidden - Access denied"),
    (404, "Not Found - Resource does not exist"),
    (405, "Method Not Allowed - Request method not supported"),
    (408, "Request Timeout - Server timed out waiting for the request"),
    (429, "Too Many Requests - Rate limit exceeded"),
    (500, "Internal Server Error - Server encountered an error"),
    (502, "Bad Gateway - Invalid response from upstream server"),
    (503, "Service Unavailable - Server temporarily unavailable"),
    (504, "Gateway Timeout - Upstream server timed out"),
];

/// Short human description of an HTTP status code.
pub fn describe(code: u16) -> &'static str {
    STATUS_DESCRIPTIONS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, description)| *description)
        .unwrap_or(UNKNOWN_STATUS)
}
