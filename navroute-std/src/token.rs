//! # Token Parser
//!
//! Splits a raw navigation token into path segments and query parameters.
//! Parsing never fails; malformed input degrades to empty results.
//!
//! Only one leading `/` is dropped from the path. Trailing separators and
//! whitespace are part of the token, so `users/` and `users` are different
//! navigations.

use std::collections::BTreeMap;
use url::form_urlencoded;

/// A token decomposed into its path and query parts.
///
/// `help/list?view=3&details=1` becomes
/// `{ segments: ["help", "list"], query: { view: "3", details: "1" } }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedToken {
    /// The path part without its leading `/`.
    pub path: String,
    /// `/`-delimited components of the path. The root is `[""]`.
    pub segments: Vec<String>,
    /// Decoded query parameters. Repeated keys keep the last value.
    pub query: BTreeMap<String, String>,
}

impl ParsedToken {
    /// Parses a token.
    pub fn parse(token: &str) -> Self {
        let (path, query) = match token.split_once('?') {
            Some((path, query)) => (path, query),
            None => (token, ""),
        };
        let path = strip_leading_separator(path);

        Self {
            path: path.to_owned(),
            segments: path.split('/').map(str::to_owned).collect(),
            query: decode_query(query),
        }
    }

    /// Iterates query pairs in key order.
    pub fn query_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.query.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Default for ParsedToken {
    fn default() -> Self {
        Self::parse("")
    }
}

/// Removes a single leading `/`.
pub fn strip_leading_separator(token: &str) -> &str {
    token.strip_prefix('/').unwrap_or(token)
}

fn decode_query(query: &str) -> BTreeMap<String, String> {
    form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}
