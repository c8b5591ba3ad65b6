//! # Lifecycle Observers (Hook)
//!
//! Hooks are the subscribers of the router's notification surface. Every
//! lifecycle event (`RouteMissed`, `BeforeDispatch`, `Dispatched`) is handed to
//! the registered hooks in registration order.
//!
//! A hook answers with [`HookResult::Next`] to let the dispatch proceed or
//! [`HookResult::Stop`] to veto it. Only the before-dispatch notification is
//! cancellable; for the other notifications `Stop` merely ends propagation to
//! the remaining hooks.

use crate::{error::BoxError, message::Message};
use std::{future::Future, pin::Pin};

/// Result of hook execution indicating whether to continue or stop propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookResult {
    /// Continue with the next hook (and, ultimately, the dispatch).
    Next,
    /// Stop propagation. On `BeforeDispatch` this cancels the dispatch.
    Stop,
}

impl HookResult {
    /// Returns `true` for [`HookResult::Stop`].
    pub const fn is_stop(self) -> bool {
        matches!(self, HookResult::Stop)
    }
}

impl From<()> for HookResult {
    /// Observers that return nothing never cancel.
    fn from(_: ()) -> Self {
        HookResult::Next
    }
}

impl From<bool> for HookResult {
    /// `true` continues, `false` stops, mirroring "return false to cancel".
    fn from(proceed: bool) -> Self {
        if proceed {
            HookResult::Next
        } else {
            HookResult::Stop
        }
    }
}

/// An observer of router lifecycle notifications.
///
/// # Static vs Dynamic Dispatch
///
/// This trait uses native `async fn` for static dispatch. Registries store
/// hooks as [`DynHook`] trait objects; every `Hook` is a `DynHook` through a
/// blanket implementation.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Hook<{E}>`",
    label = "missing `Hook` implementation",
    note = "Hooks must implement `on_event` for the notification type `{E}`."
)]
pub trait Hook<E: Message>: Send + Sync + 'static {
    /// Called when the notification is raised.
    fn on_event(&self, event: &E) -> impl Future<Output = Result<HookResult, BoxError>> + Send;
}

/// Dynamic object-safe version of [`Hook`].
pub trait DynHook<E: Message>: Send + Sync + 'static {
    /// Called when the notification is raised (dynamic dispatch version).
    fn on_event_dyn<'a>(
        &'a self,
        event: &'a E,
    ) -> Pin<Box<dyn Future<Output = Result<HookResult, BoxError>> + Send + 'a>>;
}

impl<E: Message, T: Hook<E>> DynHook<E> for T {
    fn on_event_dyn<'a>(
        &'a self,
        event: &'a E,
    ) -> Pin<Box<dyn Future<Output = Result<HookResult, BoxError>> + Send + 'a>> {
        Box::pin(self.on_event(event))
    }
}

/// A hook built from a synchronous closure. See [`from_fn`].
#[derive(Clone, Copy)]
pub struct FnHook<F> {
    f: F,
}

/// Wraps a closure returning anything convertible into [`HookResult`].
///
/// ```rust,ignore
/// // Cancel every dispatch towards the admin area.
/// let guard = from_fn(|e: &BeforeDispatch| !e.token.starts_with("admin"));
/// ```
pub fn from_fn<F>(f: F) -> FnHook<F> {
    FnHook { f }
}

impl<E, F, R> Hook<E> for FnHook<F>
where
    E: Message,
    F: Fn(&E) -> R + Send + Sync + 'static,
    R: Into<HookResult>,
{
    async fn on_event(&self, event: &E) -> Result<HookResult, BoxError> {
        Ok((self.f)(event).into())
    }
}
