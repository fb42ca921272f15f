//! Query-string parameters for list endpoints.

use serde::{Deserialize, Serialize};

/// An ordered list of query parameters.
///
/// Filters only push the fields that are set, so an empty filter yields an
/// empty query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams {
    items: Vec<(String, String)>,
}

impl QueryParams {
    /// Creates an empty query parameter collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends a parameter.
    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) {
        self.items.push((key.into(), value.to_string()));
    }

    /// Appends a parameter when the value is present and not blank.
    pub fn push_opt<V: ToString>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            let value = value.to_string();
            if !value.trim().is_empty() {
                self.items.push((key.to_string(), value));
            }
        }
    }

    /// Builder form of [`push`](Self::push).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.push(key, value);
        self
    }

    /// Merges another set of parameters after this one.
    pub fn extend(&mut self, other: Self) {
        self.items.extend(other.items);
    }

    /// Returns the value for the first parameter with this key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns all parameters as key/value pairs.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.items
    }

    /// Returns the number of parameters.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no parameters.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Types that can be encoded as list-endpoint query parameters.
pub trait ToQuery {
    /// Returns the query parameters for this value.
    fn to_query(&self) -> QueryParams;
}
