//! Testing utilities for navroute.
//!
//! - [`RecordingHook`]: records every notification it observes
//! - [`RecordingController`]: a controller that records the actions invoked on it

use navroute_core::{ActionRequest, BoxError, Controller, Hook, HookResult, Message};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Recording Hook
// ============================================================================

/// A hook that records every notification it receives.
///
/// Clones share the same record, so keep one clone for assertions and hand
/// the other to the router.
///
/// ```rust,ignore
/// let missed = RecordingHook::<RouteMissed>::new();
/// let hooks = LifecycleHooks::builder().on_route_missed(missed.clone()).build();
///
/// router.dispatch("nowhere").await.ok();
/// assert_eq!(missed.count(), 1);
/// ```
pub struct RecordingHook<E: Clone> {
    events: Arc<Mutex<Vec<E>>>,
    result: HookResult,
}

impl<E: Clone> RecordingHook<E> {
    /// A recorder that lets every dispatch proceed.
    pub fn new() -> Self {
        Self::with_result(HookResult::Next)
    }

    /// A recorder that answers with `result`.
    pub fn with_result(result: HookResult) -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            result,
        }
    }

    /// A recorder that vetoes every before-dispatch notification it sees.
    pub fn cancelling() -> Self {
        Self::with_result(HookResult::Stop)
    }

    /// Recorded notifications, oldest first.
    pub fn events(&self) -> Vec<E> {
        lock(&self.events).clone()
    }

    /// The most recent notification.
    pub fn last(&self) -> Option<E> {
        lock(&self.events).last().cloned()
    }

    /// Number of recorded notifications.
    pub fn count(&self) -> usize {
        lock(&self.events).len()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&self) {
        lock(&self.events).clear();
    }
}

impl<E: Clone> Default for RecordingHook<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone> Clone for RecordingHook<E> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
            result: self.result,
        }
    }
}

impl<E: Message + Clone> Hook<E> for RecordingHook<E> {
    async fn on_event(&self, event: &E) -> Result<HookResult, BoxError> {
        lock(&self.events).push(event.clone());
        Ok(self.result)
    }
}

// ============================================================================
// Recording Controller
// ============================================================================

/// A controller with a fixed set of action names that records each call.
#[derive(Clone)]
pub struct RecordingController {
    actions: Arc<[String]>,
    failing: Option<String>,
    calls: Arc<Mutex<Vec<(String, ActionRequest)>>>,
}

impl RecordingController {
    /// A controller answering to `actions`.
    pub fn new<I, S>(actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            actions: actions.into_iter().map(Into::into).collect(),
            failing: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Makes `action` return an error after being recorded.
    pub fn failing_on(mut self, action: impl Into<String>) -> Self {
        self.failing = Some(action.into());
        self
    }

    /// Every `(action, request)` invoked so far.
    pub fn calls(&self) -> Vec<(String, ActionRequest)> {
        lock(&self.calls).clone()
    }

    /// Names of the invoked actions, oldest first.
    pub fn actions_called(&self) -> Vec<String> {
        lock(&self.calls)
            .iter()
            .map(|(action, _)| action.clone())
            .collect()
    }

    /// Number of invocations.
    pub fn count(&self) -> usize {
        lock(&self.calls).len()
    }
}

impl Controller for RecordingController {
    fn has_action(&self, action: &str) -> bool {
        self.actions.iter().any(|known| known == action)
    }

    async fn call(&self, action: &str, request: ActionRequest) -> Result<(), BoxError> {
        lock(&self.calls).push((action.to_owned(), request));
        if self.failing.as_deref() == Some(action) {
            return Err(format!("action `{action}` failed").into());
        }
        Ok(())
    }
}
