//! Error types for navroute.
//!
//! - [`RouteError`] - Route specifications that cannot be compiled
//! - [`DispatchFailure`] - Why a navigation did not reach an action
//!
//! None of these escape as panics: the dispatcher logs each failure and hands
//! it back as the `Err` side of a [`DispatchResult`].

use crate::params::Params;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Outcome of one navigation.
pub type DispatchResult = Result<Params, DispatchFailure>;

/// Errors raised while compiling route specifications.
#[derive(Error, Debug)]
pub enum RouteError {
    /// The target names no controller.
    #[error("route `{pattern}`: config `controller` can't be undefined")]
    MissingController {
        /// The offending pattern.
        pattern: String,
    },

    /// The target names no action.
    #[error("route `{pattern}`: config `action` can't be undefined")]
    MissingAction {
        /// The offending pattern.
        pattern: String,
    },

    /// A regex (route or rule) failed to compile.
    #[error("route `{pattern}`: invalid regex")]
    InvalidRegex {
        /// The offending pattern.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },
}

impl RouteError {
    /// The pattern of the route that failed.
    pub fn pattern(&self) -> &str {
        match self {
            RouteError::MissingController { pattern }
            | RouteError::MissingAction { pattern }
            | RouteError::InvalidRegex { pattern, .. } => pattern,
        }
    }
}

/// Why a navigation did not reach (or complete) an action.
#[derive(Error, Debug)]
pub enum DispatchFailure {
    /// No route accepted the token.
    #[error("no route found for token `{0}`")]
    RouteMissed(String),

    /// A before-dispatch subscriber vetoed the dispatch.
    #[error("dispatch cancelled by a before-dispatch subscriber")]
    Cancelled,

    /// The controller registry has no such controller.
    #[error("controller not found: {0}")]
    ControllerNotFound(String),

    /// The controller exists but lacks the action.
    #[error("controller action not found: {controller}#{action}")]
    ActionNotFound {
        /// Controller name.
        controller: String,
        /// Action name.
        action: String,
    },

    /// The action ran and returned an error.
    #[error("action failed")]
    Action(#[source] BoxError),
}

impl DispatchFailure {
    /// `true` when no route matched.
    pub fn is_missed(&self) -> bool {
        matches!(self, DispatchFailure::RouteMissed(_))
    }

    /// `true` when a subscriber vetoed the dispatch.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DispatchFailure::Cancelled)
    }
}
