use std::fmt;

use crate::har::HarError;
use crate::store::StoreError;

/// Errors that can surface from the discovery pipeline.
///
/// Scanning itself never fails; errors come only from the collaborators on
/// either side of it.
#[derive(Debug)]
pub enum Error {
    /// The store rejected or failed to persist a record
    Store(StoreError),
    /// A HAR log could not be read
    Har(HarError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Store(e) => write!(f, "{}", e),
            Error::Har(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Store(e) => Some(e),
            Error::Har(e) => Some(e),
        }
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        Error::Store(e)
    }
}

impl From<HarError> for Error {
    fn from(e: HarError) -> Self {
        Error::Har(e)
    }
}
