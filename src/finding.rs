use std::fmt;

use serde::Serialize;

use crate::exchange::Exchange;

/// Where in an exchange a token was found.
///
/// The serialized names are part of the record format consumers key off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    /// A query parameter of the request URL
    QueryString,
    /// A request header
    RequestHeader,
    /// A response header
    ResponseHeader,
}

impl LocationType {
    /// Returns the wire name of this location.
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::QueryString => "query_string",
            LocationType::RequestHeader => "request_header",
            LocationType::ResponseHeader => "response_header",
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token discovered in an exchange, tagged with its provenance.
///
/// `value` is the token after carrier-specific unwrapping and always
/// classifies as a JWT. `raw_value` is the carrier content exactly as
/// observed and may embed the token in a larger string.
///
/// Findings are only produced by the scanner; they cannot be built from
/// arbitrary strings outside this crate.
///
/// # Examples
///
/// ```
/// use jwt_discovery::{Exchange, LocationType, Scanner};
///
/// let token = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJhbGljZSJ9.c2ln";
/// let exchange = Exchange::new("req-1", "https://x.test/")
///     .with_request_header("authorization", format!("Bearer {}", token));
///
/// let findings = Scanner::new().scan(&exchange);
/// assert_eq!(findings[0].location_type(), LocationType::RequestHeader);
/// assert_eq!(findings[0].value(), token);
/// assert_eq!(findings[0].raw_value(), format!("Bearer {}", token));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    #[serde(rename = "type")]
    location_type: LocationType,
    name: String,
    value: String,
    #[serde(rename = "rawValue")]
    raw_value: String,
}

impl Finding {
    /// Creates a finding without classifying `value`.
    ///
    /// This is `pub(crate)`: callers must have already checked that `value`
    /// is a JWT.
    pub(crate) fn new_unchecked(
        location_type: LocationType,
        name: impl Into<String>,
        value: impl Into<String>,
        raw_value: impl Into<String>,
    ) -> Self {
        Self {
            location_type,
            name: name.into(),
            value: value.into(),
            raw_value: raw_value.into(),
        }
    }

    /// Returns the location category.
    pub fn location_type(&self) -> LocationType {
        self.location_type
    }

    /// Returns the carrier name: query key, header name, or a synthetic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the token.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the carrier content before unwrapping.
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }
}

/// The batch handed to a store for one exchange.
///
/// Serializes as `{ "id", "jwts", ...exchange }`, with the exchange fields
/// flattened into the record. A record always carries at least one finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FindingRecord {
    id: String,
    jwts: Vec<Finding>,
    #[serde(flatten)]
    exchange: Exchange,
}

impl FindingRecord {
    /// Builds a record, or `None` when there is nothing to record.
    pub(crate) fn new(exchange: &Exchange, jwts: Vec<Finding>) -> Option<Self> {
        if jwts.is_empty() {
            return None;
        }
        Some(Self {
            id: exchange.id.clone(),
            jwts,
            exchange: exchange.clone(),
        })
    }

    /// Returns the exchange identifier this record is keyed by.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the findings in provenance order.
    pub fn jwts(&self) -> &[Finding] {
        &self.jwts
    }

    /// Returns the exchange the findings came from.
    pub fn exchange(&self) -> &Exchange {
        &self.exchange
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JWT: &str = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJhbGljZSJ9.c2ln";

    #[test]
    fn location_type_display_matches_wire_names() {
        assert_eq!(LocationType::QueryString.to_string(), "query_string");
        assert_eq!(LocationType::RequestHeader.to_string(), "request_header");
        assert_eq!(LocationType::ResponseHeader.to_string(), "response_header");
    }

    #[test]
    fn finding_serializes_to_record_shape() {
        let finding = Finding::new_unchecked(
            LocationType::RequestHeader,
            "authorization",
            JWT,
            format!("Bearer {}", JWT),
        );

        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "request_header",
                "name": "authorization",
                "value": JWT,
                "rawValue": format!("Bearer {}", JWT),
            })
        );
    }

    #[test]
    fn record_is_not_built_for_empty_batches() {
        let exchange = Exchange::new("req-1", "https://x.test/");
        assert!(FindingRecord::new(&exchange, Vec::new()).is_none());
    }

    #[test]
    fn record_flattens_exchange_fields() {
        let exchange = Exchange::new("req-9", "https://x.test/?t=1").with_request_header("A", "1");
        let finding = Finding::new_unchecked(LocationType::QueryString, "t", JWT, JWT);
        let record = FindingRecord::new(&exchange, vec![finding]).unwrap();

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "req-9");
        assert_eq!(json["requestId"], "req-9");
        assert_eq!(json["url"], "https://x.test/?t=1");
        assert_eq!(json["jwts"][0]["type"], "query_string");
        assert_eq!(json["requestHeaders"][0]["value"], "1");
    }
}
