//! # Route Matcher
//!
//! Walks a [`RouteTable`] in registration order and yields every route that
//! matches a token, together with the parameters it captured. The first
//! candidate is the preferred one; later candidates only matter when a rule
//! rejects an earlier one.
//!
//! Matching rules:
//!
//! - raw-regex routes match the whole raw token; captures are positional.
//! - segment routes match the path without its leading `/`, or the whole
//!   token when the pattern itself contains `?`. Trailing separators are kept.
//! - query parameters are merged into segment-route params; path captures win.
//! - values are never coerced.

use crate::token::{ParsedToken, strip_leading_separator};
use navroute_core::{CompiledRoute, Params, RouteKind, RouteTable};
use std::{slice, sync::Arc};

/// A route that matched a token.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matching route.
    pub route: Arc<CompiledRoute>,
    /// Captured and merged parameters.
    pub params: Params,
}

/// Matches tokens against a route table.
#[derive(Debug, Clone, Copy)]
pub struct RouteMatcher<'t> {
    table: &'t RouteTable,
}

impl<'t> RouteMatcher<'t> {
    /// Creates a matcher over `table`.
    pub fn new(table: &'t RouteTable) -> Self {
        Self { table }
    }

    /// All matching routes, in registration order.
    pub fn candidates<'a>(&self, token: &'a str) -> Candidates<'t, 'a> {
        Candidates {
            routes: self.table.iter(),
            token,
            parsed: ParsedToken::parse(token),
        }
    }

    /// The first matching route, ignoring rules.
    pub fn first(&self, token: &str) -> Option<RouteMatch> {
        self.candidates(token).next()
    }

    /// The first matching route whose rules accept the captured values.
    pub fn first_valid(&self, token: &str) -> Option<RouteMatch> {
        self.candidates(token)
            .find(|candidate| candidate.route.validate(&candidate.params).is_ok())
    }
}

/// Iterator over the routes matching one token. See [`RouteMatcher::candidates`].
pub struct Candidates<'t, 'a> {
    routes: slice::Iter<'t, Arc<CompiledRoute>>,
    token: &'a str,
    parsed: ParsedToken,
}

impl Iterator for Candidates<'_, '_> {
    type Item = RouteMatch;

    fn next(&mut self) -> Option<Self::Item> {
        for route in self.routes.by_ref() {
            if let Some(params) = match_route(route, self.token, &self.parsed) {
                return Some(RouteMatch {
                    route: Arc::clone(route),
                    params,
                });
            }
        }
        None
    }
}

/// Matches a single route against a token.
pub fn match_route(route: &CompiledRoute, token: &str, parsed: &ParsedToken) -> Option<Params> {
    match route.kind() {
        RouteKind::Regex { matcher } => {
            let captures = matcher.captures(token)?;
            let values = captures
                .iter()
                .skip(1)
                .map(|group| group.map_or_else(String::new, |m| m.as_str().to_owned()))
                .collect();
            Some(Params::from_captures(values))
        }
        RouteKind::Segments {
            names,
            matcher,
            arity,
        } => {
            if arity.is_some_and(|n| n != parsed.segments.len()) {
                return None;
            }

            let subject = if route.allows_query_string() {
                strip_leading_separator(token)
            } else {
                parsed.path.as_str()
            };
            let captures = matcher.captures(subject)?;

            let mut params = Params::new();
            for (name, group) in names.iter().zip(captures.iter().skip(1)) {
                params.insert(name.as_str(), group.map_or("", |m| m.as_str()));
            }
            if !route.allows_query_string() {
                params.merge_missing(parsed.query_pairs());
            }
            Some(params)
        }
    }
}
