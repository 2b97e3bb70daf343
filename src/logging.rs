use std::fmt;

/// Structured logging scoped to one exchange.
///
/// Every event carries the exchange id as an `exchange_id` field so scan
/// diagnostics can be correlated with the traffic that produced them.
/// Callers log carrier names and locations, never token values.
#[derive(Debug, Clone, Copy)]
pub struct ExchangeLog<'a> {
    exchange_id: &'a str,
}

impl<'a> ExchangeLog<'a> {
    /// Creates a logger for the given exchange id.
    pub fn new(exchange_id: &'a str) -> Self {
        Self { exchange_id }
    }

    /// Returns the exchange id attached to every event.
    pub fn exchange_id(&self) -> &str {
        self.exchange_id
    }

    /// Logs a debug-level message with the exchange id.
    ///
    /// ```no_run
    /// # use jwt_discovery::ExchangeLog;
    /// let log = ExchangeLog::new("req-1");
    /// log.debug(format_args!("skipping malformed url"));
    /// ```
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(exchange_id = %self.exchange_id, "{}", args);
    }

    /// Logs an info-level message with the exchange id.
    pub fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(exchange_id = %self.exchange_id, "{}", args);
    }

    /// Logs a warning-level message with the exchange id.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(exchange_id = %self.exchange_id, "{}", args);
    }

    /// Logs an error-level message with the exchange id.
    pub fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!(exchange_id = %self.exchange_id, "{}", args);
    }
}
