//! # Route configuration
//!
//! Route tables and router settings loaded from JSON or TOML.
//!
//! ```toml
//! enable_router = true
//! compile_mode = "strict"
//!
//! [routes]
//! "/" = "home#index"
//! "users" = "users#list"
//! "users/:id/edit" = { controller = "users", action = "edit", id = { pattern = '^\d+$' } }
//! "archive" = { controller = "archive", action = "show", regex = '^archive/(\d{4})$', "0" = "2024" }
//! ```
//!
//! Routes keep document order, which is also their matching order. In a
//! detailed target every key other than `controller`, `action` and `regex`
//! is a rule: a string or integer must match exactly, a `{ pattern = ... }`
//! table is a regular expression. Predicate rules can only be built in code.

use crate::compiler::CompileMode;
use navroute_core::{RouteError, RouteSpec, RouteTarget, Rule, TargetSpec};
use regex::Regex;
use serde::{
    Deserialize, Deserializer,
    de::{DeserializeOwned, MapAccess, Visitor},
};
use std::{
    collections::BTreeMap,
    fmt, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Malformed JSON.
    #[error("invalid JSON configuration")]
    Json(#[from] serde_json::Error),

    /// Malformed TOML.
    #[error("invalid TOML configuration")]
    Toml(#[from] toml::de::Error),

    /// The file could not be read.
    #[error("failed to read configuration from {}", .path.display())]
    Io {
        /// The file that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A route could not be built from its configuration.
    #[error(transparent)]
    Route(#[from] RouteError),
}

/// A route target as written in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TargetConfig {
    /// `"controller#action"`.
    Compact(String),
    /// A table with `controller`, `action`, an optional `regex` and rules.
    Detailed(DetailedTarget),
}

/// The table form of [`TargetConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DetailedTarget {
    /// Controller name.
    #[serde(default)]
    pub controller: Option<String>,
    /// Action name.
    #[serde(default)]
    pub action: Option<String>,
    /// Raw regex matched against the whole token.
    #[serde(default)]
    pub regex: Option<String>,
    /// Remaining keys: parameter rules.
    #[serde(flatten)]
    pub rules: BTreeMap<String, RuleConfig>,
}

/// A parameter rule as written in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RuleConfig {
    /// The value must equal this string.
    Exact(String),
    /// The value must equal this number's decimal form.
    Integer(i64),
    /// The value must match this regular expression.
    Pattern {
        /// Regex source.
        pattern: String,
    },
}

/// Ordered route configuration: pattern → target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteConfig {
    routes: Vec<(String, TargetConfig)>,
}

impl RouteConfig {
    /// An empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a route.
    pub fn push(&mut self, pattern: impl Into<String>, target: TargetConfig) {
        self.routes.push((pattern.into(), target));
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// `true` when no route is configured.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TargetConfig)> {
        self.routes.iter().map(|(pattern, target)| (pattern.as_str(), target))
    }

    /// Parses a JSON object of routes.
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Parses a TOML table of routes.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Reads routes from a `.json` or `.toml` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load(path.as_ref())
    }

    /// Builds route specifications, compiling any regex found along the way.
    pub fn to_specs(&self) -> Result<Vec<RouteSpec>, ConfigError> {
        let mut specs = Vec::with_capacity(self.routes.len());
        for (pattern, target) in &self.routes {
            specs.push(RouteSpec::new(pattern.as_str(), to_target(pattern, target)?));
        }
        Ok(specs)
    }
}

impl<'de> Deserialize<'de> for RouteConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RoutesVisitor;

        impl<'de> Visitor<'de> for RoutesVisitor {
            type Value = RouteConfig;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of route patterns to targets")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut routes = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, TargetConfig>()? {
                    routes.push(entry);
                }
                Ok(RouteConfig { routes })
            }
        }

        deserializer.deserialize_map(RoutesVisitor)
    }
}

/// Router-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Whether the application shell should initialize the router at all.
    pub enable_router: bool,
    /// How malformed routes are treated.
    pub compile_mode: CompileMode,
    /// The route table.
    pub routes: RouteConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            enable_router: true,
            compile_mode: CompileMode::default(),
            routes: RouteConfig::default(),
        }
    }
}

impl RouterConfig {
    /// Parses JSON settings.
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Parses TOML settings.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Reads settings from a `.json` or `.toml` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load(path.as_ref())
    }
}

/// Files ending in `.json` are JSON, anything else is TOML.
fn load<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_owned(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loading router configuration");

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(serde_json::from_str(&source)?)
    } else {
        Ok(toml::from_str(&source)?)
    }
}

fn to_target(pattern: &str, target: &TargetConfig) -> Result<RouteTarget, RouteError> {
    let detailed = match target {
        TargetConfig::Compact(compact) => return Ok(RouteTarget::from(compact.as_str())),
        TargetConfig::Detailed(detailed) => detailed,
    };

    let mut spec = TargetSpec {
        controller: detailed.controller.clone(),
        action: detailed.action.clone(),
        regex: detailed
            .regex
            .as_deref()
            .map(|source| compile_regex(pattern, source))
            .transpose()?,
        ..TargetSpec::default()
    };
    for (name, rule) in &detailed.rules {
        let rule = match rule {
            RuleConfig::Exact(value) => Rule::exact(value.as_str()),
            RuleConfig::Integer(value) => Rule::exact(value.to_string()),
            RuleConfig::Pattern { pattern: source } => Rule::Pattern(compile_regex(pattern, source)?),
        };
        spec.rules.insert(name.as_str(), rule);
    }
    Ok(RouteTarget::Detailed(spec))
}

fn compile_regex(pattern: &str, source: &str) -> Result<Regex, RouteError> {
    Regex::new(source).map_err(|source| RouteError::InvalidRegex {
        pattern: pattern.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::RouteCompiler;
    use navroute_core::{Params, RouteKind};

    #[test]
    fn json_routes_keep_document_order() {
        let config = RouteConfig::from_json(
            r#"{ "users/:id": "users#show", "/": "home#index", "about": "pages#about" }"#,
        )
        .unwrap();
        let patterns: Vec<_> = config.iter().map(|(pattern, _)| pattern).collect();

        assert_eq!(patterns, ["users/:id", "/", "about"]);
    }

    #[test]
    fn toml_settings_with_detailed_targets() {
        let config = RouterConfig::from_toml(
            r#"
            compile_mode = "lenient"

            [routes]
            "users/:id/edit" = { controller = "users", action = "edit", id = { pattern = '^\d+$' } }
            "users" = "users#list"
            "#,
        )
        .unwrap();

        assert!(config.enable_router);
        assert_eq!(config.compile_mode, CompileMode::Lenient);

        let specs = config.routes.to_specs().unwrap();
        assert_eq!(specs[0].pattern, "users/:id/edit");
        assert_eq!(specs[1].pattern, "users");

        let table = RouteCompiler::new().compile(&specs).unwrap();
        let edit = table.get(0).unwrap();
        let mut params = Params::new();
        params.insert("id", "abc");
        assert_eq!(edit.validate(&params), Err("id"));
        params.insert("id", "12");
        assert!(edit.validate(&params).is_ok());
    }

    #[test]
    fn regex_targets_and_integer_rules() {
        let config = RouteConfig::from_json(
            r#"{ "archive": { "controller": "archive", "action": "show",
                              "regex": "^archive/(\\d{4})$", "0": 2024 } }"#,
        )
        .unwrap();
        let specs = config.to_specs().unwrap();
        let route = RouteCompiler::new().compile_route(&specs[0]).unwrap();

        assert!(matches!(route.kind(), RouteKind::Regex { .. }));
        assert!(route.validate(&Params::from_captures(vec!["2024".into()])).is_ok());
        assert!(route.validate(&Params::from_captures(vec!["1999".into()])).is_err());
    }

    #[test]
    fn bad_regex_is_a_route_error() {
        let config = RouteConfig::from_json(r#"{ "x": { "controller": "a", "action": "b", "regex": "(" } }"#).unwrap();
        let err = config.to_specs().unwrap_err();

        assert!(matches!(err, ConfigError::Route(RouteError::InvalidRegex { ref pattern, .. }) if pattern == "x"));
    }

    #[test]
    fn malformed_documents_are_rejected() {
        assert!(matches!(RouteConfig::from_json("[1, 2]"), Err(ConfigError::Json(_))));
        assert!(matches!(RouteConfig::from_toml("routes = ["), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn defaults_enable_the_router() {
        let config = RouterConfig::from_json("{}").unwrap();
        assert_eq!(config, RouterConfig::default());
        assert!(config.enable_router);
        assert!(config.routes.is_empty());
    }

    #[test]
    fn files_are_loaded_by_extension() {
        let dir = std::env::temp_dir().join(format!("navroute-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let json = dir.join("routes.json");
        let toml = dir.join("routes.toml");
        fs::write(&json, r#"{ "a": "a#x", "b": "b#y" }"#).unwrap();
        fs::write(&toml, "a = \"a#x\"\nb = \"b#y\"\n").unwrap();

        let from_json = RouteConfig::from_path(&json).unwrap();
        let from_toml = RouteConfig::from_path(&toml).unwrap();
        assert_eq!(from_json, from_toml);
        assert_eq!(from_json.len(), 2);

        let missing = RouteConfig::from_path(dir.join("missing.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));

        fs::remove_dir_all(&dir).ok();
    }
}
