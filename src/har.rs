//! HAR (HTTP Archive) logs as a source of exchanges.
//!
//! Browser devtools and intercepting proxies export captured traffic as HAR.
//! Only the parts the scanner reads are decoded: request URL, request and
//! response headers, and the devtools request id when present.

use std::fmt;

use serde::Deserialize;

use crate::exchange::{Exchange, Header};

/// Error returned when a HAR log cannot be decoded.
#[derive(Debug)]
pub struct HarError {
    source: serde_json::Error,
}

impl fmt::Display for HarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid HAR log: {}", self.source)
    }
}

impl std::error::Error for HarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Decodes every entry of a HAR log into an [`Exchange`], in log order.
///
/// The exchange id is the entry's `_requestId` when the exporter recorded
/// one, otherwise `entry-<index>`. HTTP/2 pseudo-headers such as
/// `:authority` are dropped. An entry without a response has no response
/// headers.
///
/// # Errors
///
/// Returns `HarError` if the content is not a HAR log.
///
/// # Examples
///
/// ```
/// use jwt_discovery::har;
///
/// let log = r#"{"log":{"entries":[{
///     "request":{"url":"https://x.test/","headers":[{"name":"Accept","value":"*/*"}]},
///     "response":{"headers":[]}
/// }]}}"#;
///
/// let exchanges = har::parse_exchanges(log).unwrap();
/// assert_eq!(exchanges[0].id, "entry-0");
/// assert_eq!(exchanges[0].request_headers[0].name, "Accept");
/// ```
pub fn parse_exchanges(content: &str) -> Result<Vec<Exchange>, HarError> {
    let har: HarFile = serde_json::from_str(content).map_err(|source| HarError { source })?;

    Ok(har
        .log
        .entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| convert_entry(index, entry))
        .collect())
}

fn convert_entry(index: usize, entry: HarEntry) -> Exchange {
    let id = entry
        .request_id
        .unwrap_or_else(|| format!("entry-{}", index));

    Exchange {
        id,
        url: entry.request.url,
        request_headers: convert_headers(entry.request.headers),
        response_headers: entry
            .response
            .map(|response| convert_headers(response.headers))
            .unwrap_or_default(),
    }
}

fn convert_headers(headers: Vec<HarHeader>) -> Vec<Header> {
    headers
        .into_iter()
        .filter(|header| !header.name.starts_with(':'))
        .map(|header| Header::new(header.name, header.value))
        .collect()
}

// HAR file structures

#[derive(Debug, Deserialize)]
struct HarFile {
    log: HarLog,
}

#[derive(Debug, Deserialize)]
struct HarLog {
    #[serde(default)]
    entries: Vec<HarEntry>,
}

#[derive(Debug, Deserialize)]
struct HarEntry {
    #[serde(rename = "_requestId", default)]
    request_id: Option<String>,
    request: HarRequest,
    #[serde(default)]
    response: Option<HarResponse>,
}

#[derive(Debug, Deserialize)]
struct HarRequest {
    url: String,
    #[serde(default)]
    headers: Vec<HarHeader>,
}

#[derive(Debug, Deserialize)]
struct HarResponse {
    #[serde(default)]
    headers: Vec<HarHeader>,
}

#[derive(Debug, Deserialize)]
struct HarHeader {
    name: String,
    value: String,
}
