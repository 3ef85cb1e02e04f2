//! Nested Map Lookup
//!
//! Path-based access into JSON documents. A path is an ordered list of object
//! keys; each step descends one level.

use serde_json::Value;
use thiserror::Error;

/// Lookup failure
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    /// A path segment is absent, or the value at that depth is not an object
    #[error("Key not found: '{key}' (path segment {depth})")]
    MissingKey {
        /// The segment that could not be resolved
        key: String,
        /// Zero-based index of the segment in the path
        depth: usize,
    },
}

impl LookupError {
    /// The path segment that failed
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::MissingKey { key, .. } => key,
        }
    }
}

/// Follow `path` through nested objects and return the value at its end
///
/// An empty path returns `map` itself.
///
/// # Errors
///
/// Returns [`LookupError::MissingKey`] naming the first segment that is
/// absent or that would have to index into a non-object value.
pub fn access_nested_map<'a, S: AsRef<str>>(
    map: &'a Value,
    path: &[S],
) -> Result<&'a Value, LookupError> {
    let mut current = map;
    for (depth, segment) in path.iter().enumerate() {
        let key = segment.as_ref();
        current = current
            .as_object()
            .and_then(|object| object.get(key))
            .ok_or_else(|| LookupError::MissingKey {
                key: key.to_string(),
                depth,
            })?;
    }
    Ok(current)
}
