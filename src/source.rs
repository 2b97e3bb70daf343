use std::collections::VecDeque;
use std::fmt;

use crate::error::Error;
use crate::exchange::Exchange;
use crate::har;
use crate::logging::ExchangeLog;

/// Callback invoked once per delivered exchange.
///
/// Handlers run to completion synchronously. An error is reported to the
/// source, which decides how to surface it; it never stops delivery.
pub type ExchangeHandler = Box<dyn FnMut(&Exchange) -> Result<(), Error>>;

/// Identifies one subscription on a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// A traffic-observation source that delivers exchanges to subscribers.
///
/// Implementations capture or replay traffic; the scanner only subscribes.
pub trait ExchangeSource {
    /// Registers a handler and returns its subscription id.
    fn subscribe(&mut self, handler: ExchangeHandler) -> SubscriptionId;

    /// Removes a handler. Returns `false` if `id` was not subscribed.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;

    /// Begins delivering exchanges. Calling it again has no effect.
    fn start(&mut self);
}

/// A synchronous, in-memory source that replays exchanges to subscribers.
///
/// Exchanges pushed before `start` are queued and delivered in order when it
/// is called; afterwards each push is delivered immediately. Handler errors
/// are logged and counted, and delivery carries on with the next handler and
/// the next exchange.
///
/// # Examples
///
/// ```
/// use jwt_discovery::{Exchange, ExchangeSource, ReplaySource};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let seen = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&seen);
///
/// let mut source = ReplaySource::new();
/// source.subscribe(Box::new(move |_exchange| {
///     counter.set(counter.get() + 1);
///     Ok(())
/// }));
///
/// source.push(Exchange::new("req-1", "https://x.test/"));
/// assert_eq!(seen.get(), 0);
///
/// source.start();
/// assert_eq!(seen.get(), 1);
/// ```
#[derive(Default)]
pub struct ReplaySource {
    handlers: Vec<(SubscriptionId, ExchangeHandler)>,
    pending: VecDeque<Exchange>,
    started: bool,
    next_id: u64,
    delivered: usize,
    failures: usize,
}

impl ReplaySource {
    /// Creates an empty, unstarted source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an unstarted source queued with every entry of a HAR log.
    ///
    /// # Errors
    ///
    /// Returns `Error::Har` if the content is not a HAR log.
    pub fn from_har_str(content: &str) -> Result<Self, Error> {
        let mut source = Self::new();
        source.pending.extend(har::parse_exchanges(content)?);
        Ok(source)
    }

    /// Queues an exchange, or delivers it right away once started.
    pub fn push(&mut self, exchange: Exchange) {
        if self.started {
            self.deliver(&exchange);
        } else {
            self.pending.push_back(exchange);
        }
    }

    /// Returns `true` once `start` has been called.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Returns the number of exchanges waiting for `start`.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Returns the number of exchanges delivered so far.
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// Returns the number of handler invocations that failed.
    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Returns the number of active subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }

    fn deliver(&mut self, exchange: &Exchange) {
        let log = ExchangeLog::new(&exchange.id);
        for (id, handler) in self.handlers.iter_mut() {
            if let Err(err) = handler(exchange) {
                self.failures += 1;
                log.error(format_args!("handler {} failed: {}", id, err));
            }
        }
        self.delivered += 1;
    }
}

impl ExchangeSource for ReplaySource {
    fn subscribe(&mut self, handler: ExchangeHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, handler));
        tracing::debug!(subscription = %id, "handler subscribed");
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(existing, _)| *existing != id);
        let removed = self.handlers.len() != before;
        if removed {
            tracing::debug!(subscription = %id, "handler unsubscribed");
        }
        removed
    }

    fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        tracing::debug!(pending = self.pending.len(), "replay source started");

        while let Some(exchange) = self.pending.pop_front() {
            self.deliver(&exchange);
        }
    }
}

impl fmt::Debug for ReplaySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplaySource")
            .field("subscribers", &self.handlers.len())
            .field("pending", &self.pending.len())
            .field("started", &self.started)
            .field("delivered", &self.delivered)
            .field("failures", &self.failures)
            .finish()
    }
}
