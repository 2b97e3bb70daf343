use std::cell::RefCell;
use std::fmt;
use std::io::Write;
use std::rc::Rc;

use crate::finding::FindingRecord;

/// Error returned when a store cannot persist an exchange's findings.
///
/// Carries the id of the exchange whose record was lost, so a failure can be
/// traced back to the traffic that produced it.
///
/// # Examples
///
/// ```
/// use jwt_discovery::{StoreError, StoreErrorKind};
///
/// let error = StoreError::with_message(StoreErrorKind::Io, "disk full").for_exchange("req-1");
/// assert_eq!(error.kind(), StoreErrorKind::Io);
/// assert_eq!(error.exchange_id(), Some("req-1"));
/// assert_eq!(
///     error.to_string(),
///     "could not store findings for exchange req-1: write failed: disk full"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    kind: StoreErrorKind,
    exchange_id: Option<String>,
    message: Option<String>,
}

impl StoreError {
    /// Creates an error of the given kind, not yet tied to an exchange.
    pub fn new(kind: StoreErrorKind) -> Self {
        Self {
            kind,
            exchange_id: None,
            message: None,
        }
    }

    /// Creates an error with a detail message from the underlying cause.
    pub fn with_message(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new(kind)
        }
    }

    /// Attributes the error to the exchange whose record failed.
    pub fn for_exchange(mut self, exchange_id: impl Into<String>) -> Self {
        self.exchange_id = Some(exchange_id.into());
        self
    }

    /// Returns the error kind.
    pub fn kind(&self) -> StoreErrorKind {
        self.kind
    }

    /// Returns the id of the exchange whose findings were not stored.
    pub fn exchange_id(&self) -> Option<&str> {
        self.exchange_id.as_deref()
    }

    /// Returns the underlying cause, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not store findings")?;
        if let Some(id) = &self.exchange_id {
            write!(f, " for exchange {}", id)?;
        }
        write!(f, ": {}", self.kind)?;
        if let Some(msg) = &self.message {
            write!(f, ": {}", msg)?;
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {}

/// Why a record could not be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// Writing the record to the backing medium failed.
    Io,
    /// The record could not be serialized.
    Encode,
    /// The store refused the record.
    Rejected,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io => write!(f, "write failed"),
            Self::Encode => write!(f, "record not serializable"),
            Self::Rejected => write!(f, "rejected by store"),
        }
    }
}

/// Destination for finding batches, keyed by exchange id.
///
/// The scanner calls `set` at most once per exchange and never reads back.
/// Stores use interior mutability so they can be shared with a subscribed
/// handler while the owner keeps a handle for inspection.
///
/// # Examples
///
/// ```
/// use jwt_discovery::{Exchange, FindingStore, MemoryStore, Scanner};
///
/// let store = MemoryStore::new();
/// let exchange = Exchange::new("req-1", "https://x.test/")
///     .with_response_header("x-token", "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJhbGljZSJ9.c2ln");
///
/// if let Some(record) = Scanner::new().record(&exchange) {
///     store.set(record).expect("memory store accepts records");
/// }
/// assert!(store.get("req-1").is_some());
/// ```
pub trait FindingStore {
    /// Persists one exchange's findings.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the record cannot be persisted.
    fn set(&self, record: FindingRecord) -> Result<(), StoreError>;
}

impl<T: FindingStore + ?Sized> FindingStore for Rc<T> {
    fn set(&self, record: FindingRecord) -> Result<(), StoreError> {
        (**self).set(record)
    }
}

impl<T: FindingStore + ?Sized> FindingStore for &T {
    fn set(&self, record: FindingRecord) -> Result<(), StoreError> {
        (**self).set(record)
    }
}

/// An in-memory store keyed by exchange id.
///
/// Setting a record whose id is already present replaces it in place;
/// otherwise records are kept in arrival order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RefCell<Vec<FindingRecord>>,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            records: RefCell::new(Vec::new()),
        }
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    /// Returns a copy of the record for `id`, if present.
    pub fn get(&self, id: &str) -> Option<FindingRecord> {
        self.records
            .borrow()
            .iter()
            .find(|record| record.id() == id)
            .cloned()
    }

    /// Provides borrowed access to the records via callback.
    ///
    /// ```
    /// use jwt_discovery::MemoryStore;
    ///
    /// let store = MemoryStore::new();
    /// let ids: Vec<String> = store.with_records(|records| {
    ///     records.iter().map(|r| r.id().to_string()).collect()
    /// });
    /// assert!(ids.is_empty());
    /// ```
    pub fn with_records<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[FindingRecord]) -> R,
    {
        f(&self.records.borrow())
    }

    /// Consumes the store and returns the records.
    pub fn into_vec(self) -> Vec<FindingRecord> {
        self.records.into_inner()
    }
}

impl FindingStore for MemoryStore {
    fn set(&self, record: FindingRecord) -> Result<(), StoreError> {
        let mut records = self.records.borrow_mut();
        match records.iter_mut().find(|existing| existing.id() == record.id()) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        Ok(())
    }
}

/// Writes each record as one line of JSON.
///
/// The writer is flushed after every record so a consumer tailing the output
/// sees findings as they are discovered.
///
/// # Examples
///
/// ```
/// use jwt_discovery::{Exchange, FindingStore, JsonLinesStore, Scanner};
///
/// let store = JsonLinesStore::new(Vec::new());
/// let exchange = Exchange::new("req-1", "https://x.test/")
///     .with_response_header("x-token", "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJhbGljZSJ9.c2ln");
/// store.set(Scanner::new().record(&exchange).unwrap()).unwrap();
///
/// let output = String::from_utf8(store.into_inner()).unwrap();
/// assert!(output.starts_with(r#"{"id":"req-1","#));
/// assert!(output.ends_with('\n'));
/// ```
#[derive(Debug)]
pub struct JsonLinesStore<W: Write> {
    writer: RefCell<W>,
}

impl<W: Write> JsonLinesStore<W> {
    /// Creates a store that writes to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: RefCell::new(writer),
        }
    }

    /// Consumes the store and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write> FindingStore for JsonLinesStore<W> {
    fn set(&self, record: FindingRecord) -> Result<(), StoreError> {
        let mut line = serde_json::to_vec(&record).map_err(|err| {
            StoreError::with_message(StoreErrorKind::Encode, err.to_string()).for_exchange(record.id())
        })?;
        line.push(b'\n');

        let mut writer = self.writer.borrow_mut();
        writer
            .write_all(&line)
            .and_then(|()| writer.flush())
            .map_err(|err| {
                StoreError::with_message(StoreErrorKind::Io, err.to_string()).for_exchange(record.id())
            })
    }
}
