//! # Lifecycle Notifications
//!
//! The router raises three notifications per navigation attempt, each a
//! [`Message`] observed through [`Hook`](crate::Hook)s:
//!
//! | Notification | When | Cancellable |
//! |--------------|------|-------------|
//! | [`RouteMissed`] | no route accepted the token | no |
//! | [`BeforeDispatch`] | a route matched and its rules passed | yes |
//! | [`Dispatched`] | the action ran successfully | no |

use crate::{
    controller::ControllerRef, message::Message, params::Params, route::CompiledRoute,
};
use std::{fmt, sync::Arc};

/// A token reported by the navigation adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// The new token.
    pub token: String,
}

impl Navigation {
    /// Creates a navigation notification.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

/// No route accepted the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMissed {
    /// The raw token.
    pub token: String,
}

/// A route matched; subscribers may veto the dispatch.
#[derive(Debug, Clone)]
pub struct BeforeDispatch {
    /// The raw token.
    pub token: String,
    /// The matching route.
    pub route: Arc<CompiledRoute>,
    /// The resolved parameters.
    pub params: Params,
}

/// The action was invoked.
#[derive(Clone)]
pub struct Dispatched {
    /// The raw token.
    pub token: String,
    /// The matching route.
    pub route: Arc<CompiledRoute>,
    /// The resolved parameters.
    pub params: Params,
    /// The controller that handled the action.
    pub controller: ControllerRef,
}

impl fmt::Debug for Dispatched {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatched")
            .field("token", &self.token)
            .field("route", &self.route.pattern())
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl Message for Navigation {}
impl Message for RouteMissed {}
impl Message for BeforeDispatch {}
impl Message for Dispatched {}
