use crate::token;

/// Default upper bound on the length of a token candidate, in bytes.
pub const DEFAULT_MAX_TOKEN_LEN: usize = 64 * 1024;

/// Tuning knobs for the scanner.
///
/// Candidates longer than `max_token_len` are classified as non-JWT without
/// being decoded, which keeps each scan bounded regardless of header size.
///
/// # Examples
///
/// ```
/// use jwt_discovery::ScanConfig;
///
/// let config = ScanConfig::new(4096);
/// assert_eq!(config.max_token_len(), 4096);
/// assert!(!config.is_jwt("not.a.jwt"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    max_token_len: usize,
}

impl ScanConfig {
    /// Creates a configuration with the given maximum token length.
    ///
    /// # Panics
    ///
    /// Panics if `max_token_len` is 0.
    pub fn new(max_token_len: usize) -> Self {
        assert!(max_token_len > 0, "max_token_len must be greater than 0");
        Self { max_token_len }
    }

    /// Creates a configuration with the default limit of 64 KiB.
    pub fn default_limits() -> Self {
        Self::new(DEFAULT_MAX_TOKEN_LEN)
    }

    /// Returns the maximum candidate length in bytes.
    pub fn max_token_len(&self) -> usize {
        self.max_token_len
    }

    /// Classifies `candidate` under this configuration's limits.
    pub fn is_jwt(&self, candidate: &str) -> bool {
        token::is_jwt_within(candidate, self.max_token_len)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::default_limits()
    }
}
