//! Passive discovery of JSON Web Tokens in observed HTTP traffic.
//!
//! This crate watches request/response exchanges and reports every JWT it
//! finds, tagged with where it was carried:
//! - **Query strings**: any request URL parameter holding a token
//! - **Request headers**: `Authorization: Bearer`, JSON-encoded `X-Client`, or any raw header value
//! - **Response headers**: redirect targets (query or `#/?` route fragment), `X-Client`, raw values
//!
//! Tokens are classified structurally only. Nothing here validates
//! signatures, checks expiry, or interprets claims.
//!
//! # Core Types
//!
//! - [`Scanner`]: Scans one [`Exchange`] and returns its [`Finding`]s in provenance order
//! - [`JwtDiscoverer`]: Subscribes a scanner to an [`ExchangeSource`] and feeds a [`FindingStore`]
//! - [`HeaderDispatch`]: Maps header names to the [`HeaderHandler`] that owns them
//! - [`ReplaySource`]: In-memory source, optionally loaded from a HAR log
//! - [`MemoryStore`] / [`JsonLinesStore`]: Ready-made stores
//!
//! # Examples
//!
//! ```
//! use jwt_discovery::{Exchange, JwtDiscoverer, LocationType, MemoryStore, ReplaySource};
//! use std::rc::Rc;
//!
//! let token = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJhbGljZSJ9.c2ln";
//! let store = Rc::new(MemoryStore::new());
//! let mut source = ReplaySource::new();
//!
//! let discoverer = JwtDiscoverer::new(Rc::clone(&store)).start(&mut source);
//! source.push(
//!     Exchange::new("req-1", "https://app.test/login")
//!         .with_response_header("Location", format!("https://app.test/cb#/?access_token={}", token)),
//! );
//! discoverer.stop(&mut source);
//!
//! let record = store.get("req-1").expect("token found");
//! assert_eq!(record.jwts()[0].location_type(), LocationType::ResponseHeader);
//! assert_eq!(record.jwts()[0].value(), token);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod discoverer;
mod error;
mod exchange;
mod finding;
pub mod har;
mod logging;
mod scan;
mod source;
mod state;
mod store;
mod token;

pub use config::{ScanConfig, DEFAULT_MAX_TOKEN_LEN};
pub use discoverer::JwtDiscoverer;
pub use error::Error;
pub use exchange::{Exchange, Header};
pub use finding::{Finding, FindingRecord, LocationType};
pub use har::HarError;
pub use logging::ExchangeLog;
pub use scan::{
    BearerHandler, HeaderDispatch, HeaderHandler, RawValueHandler, RedirectHandler, ScanContext,
    Scanner, StructuredHeaderHandler,
};
pub use source::{ExchangeHandler, ExchangeSource, ReplaySource, SubscriptionId};
pub use state::{DiscovererState, Idle, LifecycleState, Listening, Stopped};
pub use store::{FindingStore, JsonLinesStore, MemoryStore, StoreError, StoreErrorKind};
pub use token::{is_jwt, unwrap_bearer};
