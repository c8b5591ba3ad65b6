//! # Route Model
//!
//! Author-facing route specifications ([`RouteSpec`], [`RouteTarget`],
//! [`Rule`]) and their compiled, immutable counterparts ([`CompiledRoute`],
//! [`RouteTable`]).
//!
//! Compilation lives in `navroute-std`; this module only defines the shapes
//! shared by the compiler, the matcher, the dispatcher and lifecycle hooks.

use crate::params::Params;
use regex::Regex;
use std::{
    collections::BTreeMap,
    fmt,
    sync::{Arc, OnceLock},
};

// ============================================================================
// Rules
// ============================================================================

/// A validator attached to one route parameter.
#[derive(Clone)]
pub enum Rule {
    /// A predicate that must return `true`.
    Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>),
    /// A regular expression that must match the value.
    Pattern(Regex),
    /// The value must equal this literal.
    Exact(String),
}

impl Rule {
    /// Builds a predicate rule.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Rule::Predicate(Arc::new(f))
    }

    /// Builds an exact-match rule.
    pub fn exact(value: impl Into<String>) -> Self {
        Rule::Exact(value.into())
    }

    /// Evaluates the rule against a captured value.
    pub fn check(&self, value: &str) -> bool {
        match self {
            Rule::Predicate(f) => f(value),
            Rule::Pattern(re) => re.is_match(value),
            Rule::Exact(expected) => expected == value,
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Predicate(_) => f.write_str("Predicate(..)"),
            Rule::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Rule::Exact(v) => f.debug_tuple("Exact").field(v).finish(),
        }
    }
}

impl From<Regex> for Rule {
    fn from(re: Regex) -> Self {
        Rule::Pattern(re)
    }
}

impl From<&str> for Rule {
    fn from(value: &str) -> Self {
        Rule::Exact(value.to_owned())
    }
}

impl From<String> for Rule {
    fn from(value: String) -> Self {
        Rule::Exact(value)
    }
}

/// Per-parameter validators of one route, keyed by parameter name.
///
/// For raw-regex routes the key is the decimal index of the capture group
/// (`"0"` is the first group).
#[derive(Debug, Clone, Default)]
pub struct Rules {
    rules: BTreeMap<String, Rule>,
}

impl Rules {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the rule for `name`.
    pub fn insert(&mut self, name: impl Into<String>, rule: impl Into<Rule>) {
        self.rules.insert(name.into(), rule.into());
    }

    /// Returns the rule for `name`.
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// `true` when no rule is declared.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates `(name, rule)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, R: Into<Rule>> FromIterator<(K, R)> for Rules {
    fn from_iter<I: IntoIterator<Item = (K, R)>>(iter: I) -> Self {
        let mut rules = Rules::new();
        for (k, r) in iter {
            rules.insert(k, r);
        }
        rules
    }
}

// ============================================================================
// Route specifications
// ============================================================================

/// The handler half of a route declaration.
#[derive(Debug, Clone)]
pub enum RouteTarget {
    /// `"controller#action"`.
    Compact(String),
    /// `{ controller, action, regex?, ...rules }`.
    Detailed(TargetSpec),
}

/// Object form of a route target.
#[derive(Debug, Clone, Default)]
pub struct TargetSpec {
    /// Controller name.
    pub controller: Option<String>,
    /// Action name.
    pub action: Option<String>,
    /// When set, the route matches the whole raw token against this regex.
    pub regex: Option<Regex>,
    /// Per-parameter validators.
    pub rules: Rules,
}

impl RouteTarget {
    /// Targets `controller#action` with no rules.
    pub fn to(controller: impl Into<String>, action: impl Into<String>) -> Self {
        RouteTarget::Detailed(TargetSpec {
            controller: Some(controller.into()),
            action: Some(action.into()),
            ..TargetSpec::default()
        })
    }

    /// Targets `controller#action` for a raw-regex route.
    pub fn regex(regex: Regex, controller: impl Into<String>, action: impl Into<String>) -> Self {
        RouteTarget::Detailed(TargetSpec {
            controller: Some(controller.into()),
            action: Some(action.into()),
            regex: Some(regex),
            rules: Rules::new(),
        })
    }

    /// Attaches a rule, converting a compact target into the object form.
    pub fn rule(self, name: impl Into<String>, rule: impl Into<Rule>) -> Self {
        let mut spec = match self {
            RouteTarget::Detailed(spec) => spec,
            RouteTarget::Compact(compact) => {
                let mut parts = compact.split('#');
                TargetSpec {
                    controller: parts.next().map(str::to_owned),
                    action: parts.next().map(str::to_owned),
                    ..TargetSpec::default()
                }
            }
        };
        spec.rules.insert(name, rule);
        RouteTarget::Detailed(spec)
    }
}

impl From<&str> for RouteTarget {
    fn from(compact: &str) -> Self {
        RouteTarget::Compact(compact.to_owned())
    }
}

impl From<String> for RouteTarget {
    fn from(compact: String) -> Self {
        RouteTarget::Compact(compact)
    }
}

impl From<TargetSpec> for RouteTarget {
    fn from(spec: TargetSpec) -> Self {
        RouteTarget::Detailed(spec)
    }
}

/// One authored route: a pattern and its target.
#[derive(Debug, Clone)]
pub struct RouteSpec {
    /// Segment pattern such as `users/:id/edit`, or a label for regex routes.
    pub pattern: String,
    /// What to invoke on a match.
    pub target: RouteTarget,
}

impl RouteSpec {
    /// Creates a route specification.
    pub fn new(pattern: impl Into<String>, target: impl Into<RouteTarget>) -> Self {
        Self {
            pattern: pattern.into(),
            target: target.into(),
        }
    }
}

impl<P: Into<String>, T: Into<RouteTarget>> From<(P, T)> for RouteSpec {
    fn from((pattern, target): (P, T)) -> Self {
        RouteSpec::new(pattern, target)
    }
}

// ============================================================================
// Compiled routes
// ============================================================================

/// How a compiled route matches tokens.
#[derive(Debug, Clone)]
pub enum RouteKind {
    /// Built from `:name` / `*name` placeholders.
    Segments {
        /// Placeholder names in encounter order.
        names: Vec<String>,
        /// Anchored matcher.
        matcher: Regex,
        /// Exact segment count, when the pattern has no `*` placeholder and
        /// does not own the query string.
        arity: Option<usize>,
    },
    /// Author-supplied regex applied to the whole raw token.
    Regex {
        /// The regex, used verbatim.
        matcher: Regex,
    },
}

/// A route ready for matching. Immutable apart from the cached controller
/// name resolved on first dispatch.
#[derive(Debug)]
pub struct CompiledRoute {
    pattern: String,
    kind: RouteKind,
    controller: Option<String>,
    action: Option<String>,
    rules: Rules,
    allows_query_string: bool,
    resolved_controller: OnceLock<String>,
}

impl CompiledRoute {
    /// Assembles a compiled route. `pattern` is the authored pattern.
    pub fn new(
        pattern: impl Into<String>,
        kind: RouteKind,
        controller: Option<String>,
        action: Option<String>,
        rules: Rules,
    ) -> Self {
        let pattern = pattern.into();
        let allows_query_string = matches!(kind, RouteKind::Segments { .. }) && pattern.contains('?');
        Self {
            pattern,
            kind,
            controller,
            action,
            rules,
            allows_query_string,
            resolved_controller: OnceLock::new(),
        }
    }

    /// The authored pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Matching strategy.
    pub fn kind(&self) -> &RouteKind {
        &self.kind
    }

    /// The controller name: the resolved form once a dispatch succeeded in
    /// resolving it, the configured one before that.
    pub fn controller(&self) -> Option<&str> {
        self.resolved_controller
            .get()
            .map(String::as_str)
            .or(self.controller.as_deref())
    }

    /// The controller name exactly as configured.
    pub fn configured_controller(&self) -> Option<&str> {
        self.controller.as_deref()
    }

    /// Caches the controller name that resolved. The first call wins.
    pub fn remember_controller(&self, name: &str) {
        let _ = self.resolved_controller.set(name.to_owned());
    }

    /// The action name.
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// Per-parameter validators.
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Whether the pattern itself matches a `?`-delimited suffix.
    pub fn allows_query_string(&self) -> bool {
        self.allows_query_string
    }

    /// Checks every captured parameter against its rule.
    ///
    /// Returns the name of the first parameter that fails. Query-string values
    /// are not validated, and rules naming a parameter the route does not
    /// capture are ignored.
    pub fn validate<'a>(&'a self, params: &Params) -> Result<(), &'a str> {
        if self.rules.is_empty() {
            return Ok(());
        }
        match &self.kind {
            RouteKind::Segments { names, .. } => {
                for name in names {
                    if let (Some(rule), Some(value)) = (self.rules.get(name), params.get(name))
                        && !rule.check(value)
                    {
                        return Err(name.as_str());
                    }
                }
            }
            RouteKind::Regex { .. } => {
                for (key, rule) in self.rules.iter() {
                    let Ok(index) = key.parse::<usize>() else {
                        continue;
                    };
                    if let Some(value) = params.capture(index)
                        && !rule.check(value)
                    {
                        return Err(key);
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for CompiledRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` -> {}#{}",
            self.pattern,
            self.controller().unwrap_or("?"),
            self.action().unwrap_or("?")
        )
    }
}

/// Ordered, immutable sequence of compiled routes. Registration order is
/// evaluation order.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Arc<CompiledRoute>>,
}

impl RouteTable {
    /// Creates a table from already compiled routes.
    pub fn new(routes: Vec<CompiledRoute>) -> Self {
        Self {
            routes: routes.into_iter().map(Arc::new).collect(),
        }
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// `true` when no route is registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Route at `index`.
    pub fn get(&self, index: usize) -> Option<&Arc<CompiledRoute>> {
        self.routes.get(index)
    }

    /// Iterates routes in evaluation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Arc<CompiledRoute>> {
        self.routes.iter()
    }
}

impl FromIterator<CompiledRoute> for RouteTable {
    fn from_iter<I: IntoIterator<Item = CompiledRoute>>(iter: I) -> Self {
        RouteTable::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a Arc<CompiledRoute>;
    type IntoIter = std::slice::Iter<'a, Arc<CompiledRoute>>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}
