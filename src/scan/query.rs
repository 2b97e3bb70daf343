//! Query-string carriers.

use std::borrow::Cow;

use url::Url;

use crate::config::ScanConfig;
use crate::finding::{Finding, LocationType};

type Pair<'a> = (Cow<'a, str>, Cow<'a, str>);

/// Emits a finding for every query parameter whose value is a JWT.
///
/// Values are already percent-decoded by the URL parser, so `value` and
/// `raw_value` are the same decoded string.
pub(crate) fn scan_query(url: &Url, config: &ScanConfig) -> Vec<Finding> {
    collapse_duplicates(url.query_pairs())
        .into_iter()
        .filter(|(_, value)| config.is_jwt(value))
        .map(|(key, value)| {
            Finding::new_unchecked(LocationType::QueryString, key, value.to_string(), value)
        })
        .collect()
}

/// Returns the first value in `pairs` that is a JWT, in order of appearance.
pub(crate) fn first_jwt<'a, I>(pairs: I, config: &ScanConfig) -> Option<String>
where
    I: IntoIterator<Item = Pair<'a>>,
{
    pairs
        .into_iter()
        .find(|(_, value)| config.is_jwt(value))
        .map(|(_, value)| value.into_owned())
}

// Duplicate keys keep the position of their first occurrence and the value of
// their last one.
fn collapse_duplicates<'a, I>(pairs: I) -> Vec<Pair<'a>>
where
    I: IntoIterator<Item = Pair<'a>>,
{
    let mut collapsed: Vec<Pair<'a>> = Vec::new();
    for (key, value) in pairs {
        match collapsed.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => collapsed.push((key, value)),
        }
    }
    collapsed
}
