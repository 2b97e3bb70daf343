use serde::{Deserialize, Serialize};

/// A single HTTP header as observed on the wire.
///
/// The name keeps the casing it was received with; matching against known
/// carriers is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Header name, as received
    pub name: String,
    /// Header value, unmodified
    pub value: String,
}

impl Header {
    /// Creates a header from a name/value pair.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An observed request/response pair.
///
/// Exchanges are produced by an [`ExchangeSource`](crate::ExchangeSource) and
/// only read by the scanner. Header lists may be empty and the URL may lack a
/// query or fragment.
///
/// # Examples
///
/// ```
/// use jwt_discovery::Exchange;
///
/// let exchange = Exchange::new("req-1", "https://app.test/cb?code=abc")
///     .with_request_header("Accept", "text/html")
///     .with_response_header("Location", "https://app.test/home");
///
/// assert_eq!(exchange.id, "req-1");
/// assert_eq!(exchange.request_headers.len(), 1);
/// assert_eq!(exchange.response_headers.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exchange {
    /// Opaque identifier assigned by the source
    #[serde(rename = "requestId")]
    pub id: String,
    /// Full request URL
    pub url: String,
    /// Request headers in received order
    #[serde(default)]
    pub request_headers: Vec<Header>,
    /// Response headers in received order
    #[serde(default)]
    pub response_headers: Vec<Header>,
}

impl Exchange {
    /// Creates an exchange with no headers.
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            request_headers: Vec::new(),
            response_headers: Vec::new(),
        }
    }

    /// Appends a request header, preserving order.
    pub fn with_request_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request_headers.push(Header::new(name, value));
        self
    }

    /// Appends a response header, preserving order.
    pub fn with_response_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.response_headers.push(Header::new(name, value));
        self
    }
}
