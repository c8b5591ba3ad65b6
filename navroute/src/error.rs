//! Errors surfaced by the [`Router`](crate::Router) facade.

use navroute_core::{DispatchFailure, RouteError};
use navroute_std::config::ConfigError;
use thiserror::Error;

/// Errors returned by [`Router`](crate::Router) and
/// [`Application`](crate::Application).
#[derive(Error, Debug)]
pub enum RouterError {
    /// `initialize` was called a second time.
    #[error("router is already initialized")]
    AlreadyInitialized,

    /// An operation needs a route table but `initialize` was never called.
    #[error("router is not initialized")]
    NotInitialized,

    /// A history is already attached to this router.
    #[error("a history is already attached to the router")]
    HistoryAttached,

    /// `redirect` needs an attached history.
    #[error("no history is attached to the router")]
    NoHistory,

    /// The route table could not be compiled.
    #[error(transparent)]
    Route(#[from] RouteError),

    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A navigation did not reach its action.
    #[error(transparent)]
    Dispatch(#[from] DispatchFailure),
}

impl RouterError {
    /// The dispatch failure, when this error wraps one.
    pub fn as_dispatch(&self) -> Option<&DispatchFailure> {
        match self {
            RouterError::Dispatch(failure) => Some(failure),
            _ => None,
        }
    }
}
