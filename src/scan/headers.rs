//! Header carriers and the name-to-handler dispatch table.

use std::collections::HashMap;

use serde_json::Value;
use url::{form_urlencoded, Url};

use super::query;
use super::ScanContext;
use crate::exchange::Header;
use crate::finding::Finding;
use crate::token::unwrap_bearer;

/// A carrier-specific extraction strategy for one kind of header.
///
/// Exactly one handler runs per header, so a handler's findings are never
/// merged with another handler's for the same header.
pub trait HeaderHandler {
    /// Short stable name of the strategy, used in logs and tests.
    fn name(&self) -> &'static str;

    /// Extracts findings from a single header.
    fn scan(&self, header: &Header, cx: &ScanContext<'_>) -> Vec<Finding>;
}

/// Tests the raw header value as-is. The default for unmatched names.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawValueHandler;

impl HeaderHandler for RawValueHandler {
    fn name(&self) -> &'static str {
        "raw"
    }

    fn scan(&self, header: &Header, cx: &ScanContext<'_>) -> Vec<Finding> {
        if cx.is_jwt(&header.value) {
            vec![cx.finding(&header.name, &header.value, &header.value)]
        } else {
            Vec::new()
        }
    }
}

/// Strips a `Bearer` scheme before classifying. Owns `authorization`.
///
/// Findings are named `authorization` whatever casing the header arrived in.
#[derive(Debug, Clone, Copy, Default)]
pub struct BearerHandler;

impl BearerHandler {
    /// The header this handler owns, also used as the finding name.
    pub const HEADER: &'static str = "authorization";
}

impl HeaderHandler for BearerHandler {
    fn name(&self) -> &'static str {
        "bearer"
    }

    fn scan(&self, header: &Header, cx: &ScanContext<'_>) -> Vec<Finding> {
        let candidate = unwrap_bearer(&header.value);
        if cx.is_jwt(candidate) {
            vec![cx.finding(Self::HEADER, candidate, &header.value)]
        } else {
            Vec::new()
        }
    }
}

/// Reads tokens out of a JSON-encoded header. Owns `x-client`.
///
/// The value must be a JSON object; its `Context` and `Auth` string fields
/// are reported as `XClient-Context` and `XClient-Auth`. Anything that is not
/// a JSON object contributes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredHeaderHandler;

impl StructuredHeaderHandler {
    const FIELDS: [(&'static str, &'static str); 2] =
        [("Context", "XClient-Context"), ("Auth", "XClient-Auth")];
}

impl HeaderHandler for StructuredHeaderHandler {
    fn name(&self) -> &'static str {
        "x-client"
    }

    fn scan(&self, header: &Header, cx: &ScanContext<'_>) -> Vec<Finding> {
        let fields = match serde_json::from_str::<Value>(&header.value) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => {
                cx.log().warn(format_args!(
                    "ignoring {} {}: not a JSON object",
                    cx.location(),
                    header.name
                ));
                return Vec::new();
            }
            Err(err) => {
                cx.log().warn(format_args!(
                    "ignoring {} {}: invalid JSON ({})",
                    cx.location(),
                    header.name,
                    err
                ));
                return Vec::new();
            }
        };

        Self::FIELDS
            .iter()
            .filter_map(|(field, synthetic_name)| {
                let value = fields.get(*field)?.as_str()?;
                cx.is_jwt(value)
                    .then(|| cx.finding(synthetic_name, value, &header.value))
            })
            .collect()
    }
}

/// Looks for a token inside a redirect target. Owns `location`.
///
/// The query parameters are searched first, in order of appearance. Only
/// when they hold no token is the fragment searched, and only if it starts
/// with `/?` (a `#/?` single-page-app route). Failing both, the raw value is
/// classified on its own. At most one finding per header, always named
/// `location`.
///
/// Relative targets resolve against the request URL, or against a
/// placeholder origin when there is none, so their query is still read.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedirectHandler;

impl RedirectHandler {
    /// The header this handler owns, also used as the finding name.
    pub const HEADER: &'static str = "location";

    const PLACEHOLDER_BASE: &'static str = "http://localhost/";

    fn find_in_target(&self, target: &str, cx: &ScanContext<'_>) -> Option<String> {
        let placeholder;
        let base = match cx.base_url() {
            Some(base) => base,
            None => {
                placeholder = Url::parse(Self::PLACEHOLDER_BASE).ok()?;
                &placeholder
            }
        };

        let url = match Url::options().base_url(Some(base)).parse(target) {
            Ok(url) => url,
            Err(err) => {
                cx.log()
                    .debug(format_args!("redirect target did not parse: {}", err));
                return None;
            }
        };

        if let Some(token) = query::first_jwt(url.query_pairs(), cx.config()) {
            return Some(token);
        }

        let route_query = url.fragment()?.strip_prefix("/?")?;
        query::first_jwt(form_urlencoded::parse(route_query.as_bytes()), cx.config())
    }
}

impl HeaderHandler for RedirectHandler {
    fn name(&self) -> &'static str {
        "location"
    }

    fn scan(&self, header: &Header, cx: &ScanContext<'_>) -> Vec<Finding> {
        let token = match self.find_in_target(&header.value, cx) {
            Some(token) => token,
            None if cx.is_jwt(&header.value) => header.value.clone(),
            None => return Vec::new(),
        };
        vec![cx.finding(Self::HEADER, &token, &header.value)]
    }
}

/// Maps lowercase header names to the handler that owns them.
///
/// Names without an entry go to the fallback handler.
///
/// # Examples
///
/// ```
/// use jwt_discovery::HeaderDispatch;
///
/// let dispatch = HeaderDispatch::request();
/// assert_eq!(dispatch.handler_for("Authorization").name(), "bearer");
/// assert_eq!(dispatch.handler_for("X-Client").name(), "x-client");
/// assert_eq!(dispatch.handler_for("Location").name(), "raw");
/// ```
pub struct HeaderDispatch {
    handlers: HashMap<&'static str, Box<dyn HeaderHandler>>,
    fallback: Box<dyn HeaderHandler>,
}

impl HeaderDispatch {
    /// Creates an empty table that sends every header to `fallback`.
    pub fn new(fallback: impl HeaderHandler + 'static) -> Self {
        Self {
            handlers: HashMap::new(),
            fallback: Box::new(fallback),
        }
    }

    /// Routes headers named `name` (any casing) to `handler`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not lowercase.
    pub fn route(mut self, name: &'static str, handler: impl HeaderHandler + 'static) -> Self {
        assert!(
            !name.bytes().any(|b| b.is_ascii_uppercase()),
            "header routes must be lowercase"
        );
        self.handlers.insert(name, Box::new(handler));
        self
    }

    /// The table for request headers.
    pub fn request() -> Self {
        Self::new(RawValueHandler)
            .route(BearerHandler::HEADER, BearerHandler)
            .route("x-client", StructuredHeaderHandler)
    }

    /// The table for response headers.
    pub fn response() -> Self {
        Self::new(RawValueHandler)
            .route(RedirectHandler::HEADER, RedirectHandler)
            .route("x-client", StructuredHeaderHandler)
    }

    /// Returns the handler that owns headers named `name`.
    pub fn handler_for(&self, name: &str) -> &dyn HeaderHandler {
        self.handlers
            .get(name.to_ascii_lowercase().as_str())
            .map(|handler| &**handler)
            .unwrap_or(&*self.fallback)
    }

    /// Runs each header through its handler, preserving header order.
    pub fn scan(&self, headers: &[Header], cx: &ScanContext<'_>) -> Vec<Finding> {
        headers
            .iter()
            .flat_map(|header| self.handler_for(&header.name).scan(header, cx))
            .collect()
    }
}
