//! # Route Compiler
//!
//! Turns declarative [`RouteSpec`]s into a [`RouteTable`].
//!
//! Segment patterns are normalised (one leading and one trailing `/` removed),
//! literal text is escaped, `:name` becomes a single-segment capture and
//! `*name` a greedy capture spanning `/`. The resulting regex is anchored at
//! both ends.

use navroute_core::{
    CompiledRoute, RouteError, RouteKind, RouteSpec, RouteTable, RouteTarget, Rules,
};
use regex::Regex;
use serde::Deserialize;
use std::{borrow::Borrow, sync::LazyLock};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[:*]\w+").expect("placeholder regex is valid"));

/// What to do with a route whose target lacks a controller or an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompileMode {
    /// Reject the whole table with the first configuration error.
    #[default]
    Strict,
    /// Log the error and register the route anyway; dispatching to it fails
    /// at resolution time.
    Lenient,
}

/// Compiles route specifications in authoring order.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteCompiler {
    mode: CompileMode,
}

impl RouteCompiler {
    /// A strict compiler.
    pub fn new() -> Self {
        Self::default()
    }

    /// A compiler using `mode`.
    pub fn with_mode(mode: CompileMode) -> Self {
        Self { mode }
    }

    /// A compiler that keeps malformed routes.
    pub fn lenient() -> Self {
        Self::with_mode(CompileMode::Lenient)
    }

    /// The configured mode.
    pub fn mode(&self) -> CompileMode {
        self.mode
    }

    /// Compiles every spec, preserving order.
    pub fn compile<I>(&self, specs: I) -> Result<RouteTable, RouteError>
    where
        I: IntoIterator,
        I::Item: Borrow<RouteSpec>,
    {
        let routes = specs
            .into_iter()
            .map(|spec| self.compile_route(spec.borrow()))
            .collect::<Result<Vec<_>, _>>()?;

        if routes.is_empty() {
            tracing::warn!("no routes were found; define at least one route before initializing");
        }

        Ok(RouteTable::new(routes))
    }

    /// Compiles a single spec. The spec itself is never modified.
    pub fn compile_route(&self, spec: &RouteSpec) -> Result<CompiledRoute, RouteError> {
        let (controller, action, regex, rules) = split_target(&spec.target);

        let kind = match regex {
            Some(matcher) => RouteKind::Regex { matcher },
            None => segment_kind(&spec.pattern)?,
        };

        self.check_target(&spec.pattern, controller.as_deref(), action.as_deref())?;

        Ok(CompiledRoute::new(
            spec.pattern.clone(),
            kind,
            controller,
            action,
            rules,
        ))
    }

    fn check_target(
        &self,
        pattern: &str,
        controller: Option<&str>,
        action: Option<&str>,
    ) -> Result<(), RouteError> {
        if controller.is_none() {
            tracing::error!(route = %pattern, "config `controller` can't be undefined");
            if self.mode == CompileMode::Strict {
                return Err(RouteError::MissingController {
                    pattern: pattern.to_owned(),
                });
            }
        }
        if action.is_none() {
            tracing::error!(route = %pattern, "config `action` can't be undefined");
            if self.mode == CompileMode::Strict {
                return Err(RouteError::MissingAction {
                    pattern: pattern.to_owned(),
                });
            }
        }
        Ok(())
    }
}

/// Removes one leading and one trailing `/`.
pub fn normalize_path(path: &str) -> &str {
    let path = path.strip_prefix('/').unwrap_or(path);
    path.strip_suffix('/').unwrap_or(path)
}

fn split_target(target: &RouteTarget) -> (Option<String>, Option<String>, Option<Regex>, Rules) {
    match target {
        RouteTarget::Compact(compact) => {
            let mut parts = compact.split('#');
            let controller = parts.next().and_then(non_empty);
            let action = parts.next().and_then(non_empty);
            (controller, action, None, Rules::new())
        }
        RouteTarget::Detailed(spec) => (
            spec.controller.as_deref().and_then(non_empty),
            spec.action.as_deref().and_then(non_empty),
            spec.regex.clone(),
            spec.rules.clone(),
        ),
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_owned())
}

fn segment_kind(pattern: &str) -> Result<RouteKind, RouteError> {
    let normalized = normalize_path(pattern);
    let mut names = Vec::new();
    let mut source = String::from("^");
    let mut greedy = false;
    let mut last = 0;

    for placeholder in PLACEHOLDER.find_iter(normalized) {
        source.push_str(&regex::escape(&normalized[last..placeholder.start()]));
        let (mode, name) = placeholder.as_str().split_at(1);
        names.push(name.to_owned());
        if mode == ":" {
            source.push_str("([^/]*)");
        } else {
            greedy = true;
            source.push_str("(.*)");
        }
        last = placeholder.end();
    }
    source.push_str(&regex::escape(&normalized[last..]));
    source.push('$');

    let matcher = Regex::new(&source).map_err(|source| RouteError::InvalidRegex {
        pattern: pattern.to_owned(),
        source,
    })?;

    let arity = (!greedy && !pattern.contains('?')).then(|| normalized.split('/').count());

    Ok(RouteKind::Segments {
        names,
        matcher,
        arity,
    })
}
