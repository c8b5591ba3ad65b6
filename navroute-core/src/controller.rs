//! # Controllers and Actions
//!
//! A controller is any value that can be asked to "invoke action X with this
//! request". Controllers are looked up by name through a
//! [`ControllerResolver`], which the application shell injects when the
//! router is initialized.
//!
//! Implement [`Controller`] by hand, or let `#[navroute::controller]` generate
//! the action table from an `impl` block.

use crate::{error::BoxError, params::Params, route::CompiledRoute};
use std::{future::Future, pin::Pin, sync::Arc};

/// Everything an action receives when it is dispatched.
#[derive(Debug, Clone)]
pub struct ActionRequest {
    /// Captured path parameters merged with query-string parameters.
    pub params: Params,
    /// The raw navigation token.
    pub token: String,
    /// The route that matched the token.
    pub route: Arc<CompiledRoute>,
}

/// Converts the return value of an action method into a dispatch outcome.
pub trait IntoActionResult {
    /// Performs the conversion.
    fn into_action_result(self) -> Result<(), BoxError>;
}

impl IntoActionResult for () {
    fn into_action_result(self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<E> IntoActionResult for Result<(), E>
where
    E: Into<BoxError>,
{
    fn into_action_result(self) -> Result<(), BoxError> {
        self.map_err(Into::into)
    }
}

/// A named collection of actions.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Controller`",
    label = "missing `Controller` implementation",
    note = "Implement `Controller` by hand or annotate the impl block with `#[navroute::controller]`."
)]
pub trait Controller: Send + Sync + 'static {
    /// Whether `action` names an action of this controller.
    fn has_action(&self, action: &str) -> bool;

    /// Invokes `action`. Only called after [`has_action`](Self::has_action)
    /// returned `true`.
    fn call(
        &self,
        action: &str,
        request: ActionRequest,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;
}

/// Dynamic object-safe version of [`Controller`].
pub trait DynController: Send + Sync + 'static {
    /// See [`Controller::has_action`].
    fn has_action_dyn(&self, action: &str) -> bool;

    /// See [`Controller::call`].
    fn call_dyn<'a>(
        &'a self,
        action: &'a str,
        request: ActionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>>;
}

impl<T: Controller> DynController for T {
    fn has_action_dyn(&self, action: &str) -> bool {
        self.has_action(action)
    }

    fn call_dyn<'a>(
        &'a self,
        action: &'a str,
        request: ActionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>> {
        Box::pin(self.call(action, request))
    }
}

/// Shared handle to a resolved controller.
pub type ControllerRef = Arc<dyn DynController>;

/// Looks up controllers by name.
///
/// The router never mutates the resolver; implementations may still construct
/// controllers lazily on first lookup.
pub trait ControllerResolver: Send + Sync + 'static {
    /// Returns the controller registered under exactly `name`.
    fn resolve(&self, name: &str) -> Option<ControllerRef>;
}

impl<F> ControllerResolver for F
where
    F: Fn(&str) -> Option<ControllerRef> + Send + Sync + 'static,
{
    fn resolve(&self, name: &str) -> Option<ControllerRef> {
        (self)(name)
    }
}
