//! Raw value lookup.

use crate::source::{ParamSource, Source};

/// Looks up the raw text of parameter `name`.
///
/// Returns `None` when the source is not present, when `name` is empty, or
/// when the parameter is missing. A path variable bound to the empty string
/// is returned as `Some("")`. An empty query value (`?x=`) is reported as
/// missing, the same as an absent key.
pub fn resolve(source: &(impl ParamSource + ?Sized), name: &str, from: Source) -> Option<String> {
    if !source.is_present() || name.is_empty() {
        return None;
    }

    match from {
        Source::Path => source.path_vars()?.get(name).map(str::to_owned),
        Source::Query => first_query_value(source.raw_query()?, name),
    }
}

/// First value for `name` in a form-encoded query; `+` decodes to a space.
fn first_query_value(query: &str, name: &str) -> Option<String> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).ok()?;
    pairs
        .into_iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}
