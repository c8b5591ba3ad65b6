//! Parameters extracted from a navigation token.

use std::{collections::BTreeMap, str::FromStr};
use thiserror::Error;

/// Named and positional values captured for one dispatch.
///
/// Values are always kept as strings; a token such as `users/007/edit` keeps
/// its leading zeros. Use [`Params::get_as`] to coerce at the point of use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    named: BTreeMap<String, String>,
    captures: Vec<String>,
}

/// Error returned by [`Params::get_as`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    /// The parameter is absent.
    #[error("missing parameter `{0}`")]
    Missing(String),
    /// The parameter could not be parsed into the requested type.
    #[error("parameter `{name}` has invalid value `{value}`")]
    Invalid {
        /// Parameter name.
        name: String,
        /// Offending value.
        value: String,
    },
}

impl Params {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parameter set holding positional captures only.
    pub fn from_captures(captures: Vec<String>) -> Self {
        Self {
            named: BTreeMap::new(),
            captures,
        }
    }

    /// Returns the named value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.named.get(name).map(String::as_str)
    }

    /// Returns the positional capture at `index` (raw-regex routes).
    pub fn capture(&self, index: usize) -> Option<&str> {
        self.captures.get(index).map(String::as_str)
    }

    /// All positional captures, in group order.
    pub fn captures(&self) -> &[String] {
        &self.captures
    }

    /// Parses the named value into `T`.
    ///
    /// ```rust,ignore
    /// let id: u32 = request.params.get_as("id")?;
    /// ```
    pub fn get_as<T: FromStr>(&self, name: &str) -> Result<T, ParamError> {
        let value = self
            .get(name)
            .ok_or_else(|| ParamError::Missing(name.to_owned()))?;
        value.parse().map_err(|_| ParamError::Invalid {
            name: name.to_owned(),
            value: value.to_owned(),
        })
    }

    /// Inserts a named value, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.named.insert(name.into(), value.into())
    }

    /// Inserts the pairs whose names are not bound yet. Existing values win.
    pub fn merge_missing<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in pairs {
            self.named.entry(name.into()).or_insert_with(|| value.into());
        }
    }

    /// Whether a named value exists.
    pub fn contains(&self, name: &str) -> bool {
        self.named.contains_key(name)
    }

    /// Number of named values.
    pub fn len(&self) -> usize {
        self.named.len()
    }

    /// `true` when there are neither named values nor captures.
    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.captures.is_empty()
    }

    /// Iterates named values in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.named.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_missing_keeps_existing_values() {
        let mut params: Params = [("id", "42")].into_iter().collect();
        params.merge_missing([("id", "7"), ("tab", "notes")]);

        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.get("tab"), Some("notes"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn get_as_preserves_string_until_asked() {
        let params: Params = [("id", "007")].into_iter().collect();

        assert_eq!(params.get("id"), Some("007"));
        assert_eq!(params.get_as::<u32>("id"), Ok(7));
        assert_eq!(
            params.get_as::<u32>("page"),
            Err(ParamError::Missing("page".into()))
        );
    }

    #[test]
    fn get_as_reports_invalid_values() {
        let params: Params = [("id", "abc")].into_iter().collect();
        assert!(matches!(
            params.get_as::<i64>("id"),
            Err(ParamError::Invalid { .. })
        ));
    }

    #[test]
    fn captures_are_positional_and_unnamed() {
        let params = Params::from_captures(vec!["2024".into(), "05".into()]);
        assert_eq!(params.capture(1), Some("05"));
        assert_eq!(params.capture(2), None);
        assert_eq!(params.get("1"), None);
        assert!(!params.is_empty());
    }
}
