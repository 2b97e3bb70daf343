//! Per-exchange token scanning.
//!
//! This module provides:
//! - `Scanner`: runs every location scanner over an exchange, in provenance order
//! - `HeaderDispatch`: maps header names to the handler that owns them
//! - `HeaderHandler`: one carrier-specific extraction strategy per header kind
//!
//! Scanning never fails. Malformed URLs and structured headers are logged and
//! contribute no findings; the rest of the exchange is still scanned.

mod headers;
mod query;

use url::Url;

use crate::config::ScanConfig;
use crate::exchange::Exchange;
use crate::finding::{Finding, FindingRecord, LocationType};
use crate::logging::ExchangeLog;

pub use headers::{
    BearerHandler, HeaderDispatch, HeaderHandler, RawValueHandler, RedirectHandler,
    StructuredHeaderHandler,
};

/// Everything a header handler needs to know about where it is scanning.
#[derive(Debug, Clone, Copy)]
pub struct ScanContext<'a> {
    location: LocationType,
    config: &'a ScanConfig,
    base_url: Option<&'a Url>,
    log: ExchangeLog<'a>,
}

impl<'a> ScanContext<'a> {
    /// Creates a context for findings tagged with `location`.
    pub fn new(location: LocationType, config: &'a ScanConfig, log: ExchangeLog<'a>) -> Self {
        Self {
            location,
            config,
            base_url: None,
            log,
        }
    }

    /// Sets the URL that relative redirect targets resolve against.
    pub fn with_base_url(mut self, base_url: Option<&'a Url>) -> Self {
        self.base_url = base_url;
        self
    }

    /// Returns a copy of this context tagged with another location.
    pub fn for_location(mut self, location: LocationType) -> Self {
        self.location = location;
        self
    }

    /// Returns the location findings are tagged with.
    pub fn location(&self) -> LocationType {
        self.location
    }

    /// Returns the base URL for relative references, if any.
    pub fn base_url(&self) -> Option<&'a Url> {
        self.base_url
    }

    /// Returns the exchange-scoped logger.
    pub fn log(&self) -> &ExchangeLog<'a> {
        &self.log
    }

    /// Classifies a candidate under the active configuration.
    pub fn is_jwt(&self, candidate: &str) -> bool {
        self.config.is_jwt(candidate)
    }

    pub(crate) fn config(&self) -> &'a ScanConfig {
        self.config
    }

    /// Builds a finding for an already-classified token at this location.
    pub(crate) fn finding(&self, name: &str, value: &str, raw_value: &str) -> Finding {
        Finding::new_unchecked(self.location, name, value, raw_value)
    }
}

/// Scans exchanges for JWTs in every known carrier location.
///
/// Findings come back in provenance order: query-string findings first, then
/// request headers in header order, then response headers in header order.
///
/// # Examples
///
/// ```
/// use jwt_discovery::{Exchange, LocationType, Scanner};
///
/// let token = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJhbGljZSJ9.c2ln";
/// let exchange = Exchange::new("req-1", format!("https://x.test/cb?token={}&other=foo", token));
///
/// let findings = Scanner::new().scan(&exchange);
/// assert_eq!(findings.len(), 1);
/// assert_eq!(findings[0].location_type(), LocationType::QueryString);
/// assert_eq!(findings[0].name(), "token");
/// ```
pub struct Scanner {
    config: ScanConfig,
    request_headers: HeaderDispatch,
    response_headers: HeaderDispatch,
}

impl Scanner {
    /// Creates a scanner with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ScanConfig::default())
    }

    /// Creates a scanner with a custom configuration.
    pub fn with_config(config: ScanConfig) -> Self {
        Self {
            config,
            request_headers: HeaderDispatch::request(),
            response_headers: HeaderDispatch::response(),
        }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scans every location of the exchange.
    pub fn scan(&self, exchange: &Exchange) -> Vec<Finding> {
        let log = ExchangeLog::new(&exchange.id);
        let request_url = parse_request_url(exchange, &log);

        let mut findings = Vec::new();
        if let Some(url) = &request_url {
            findings.extend(query::scan_query(url, &self.config));
        }

        let cx = ScanContext::new(LocationType::RequestHeader, &self.config, log)
            .with_base_url(request_url.as_ref());
        findings.extend(self.request_headers.scan(&exchange.request_headers, &cx));

        let cx = cx.for_location(LocationType::ResponseHeader);
        findings.extend(self.response_headers.scan(&exchange.response_headers, &cx));

        log.debug(format_args!("scan complete: {} finding(s)", findings.len()));
        findings
    }

    /// Scans only the query string of the request URL.
    ///
    /// A URL that does not parse yields no findings.
    pub fn scan_query(&self, exchange: &Exchange) -> Vec<Finding> {
        let log = ExchangeLog::new(&exchange.id);
        parse_request_url(exchange, &log)
            .map(|url| query::scan_query(&url, &self.config))
            .unwrap_or_default()
    }

    /// Scans only the request headers.
    pub fn scan_request_headers(&self, exchange: &Exchange) -> Vec<Finding> {
        let log = ExchangeLog::new(&exchange.id);
        let cx = ScanContext::new(LocationType::RequestHeader, &self.config, log);
        self.request_headers.scan(&exchange.request_headers, &cx)
    }

    /// Scans only the response headers.
    ///
    /// Relative `Location` targets resolve against the request URL.
    pub fn scan_response_headers(&self, exchange: &Exchange) -> Vec<Finding> {
        let log = ExchangeLog::new(&exchange.id);
        let request_url = Url::parse(&exchange.url).ok();
        let cx = ScanContext::new(LocationType::ResponseHeader, &self.config, log)
            .with_base_url(request_url.as_ref());
        self.response_headers.scan(&exchange.response_headers, &cx)
    }

    /// Scans the exchange and packages the findings for a store.
    ///
    /// Returns `None` when the exchange carries no tokens; an empty batch is
    /// never recorded.
    pub fn record(&self, exchange: &Exchange) -> Option<FindingRecord> {
        FindingRecord::new(exchange, self.scan(exchange))
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_request_url(exchange: &Exchange, log: &ExchangeLog<'_>) -> Option<Url> {
    match Url::parse(&exchange.url) {
        Ok(url) => Some(url),
        Err(err) => {
            log.debug(format_args!("request url did not parse: {}", err));
            None
        }
    }
}
