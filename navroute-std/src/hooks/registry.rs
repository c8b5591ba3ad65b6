//! Ordered registry of lifecycle hooks.

use navroute_core::{DynHook, HookResult, Message};
use std::sync::Arc;

/// The hooks subscribed to one notification type, in registration order.
pub struct Registry<E: Message> {
    hooks: Vec<Arc<dyn DynHook<E>>>,
}

impl<E: Message> Registry<E> {
    /// An empty registry.
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Number of registered hooks.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// `true` when nobody subscribed.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Delivers `event` to every hook sequentially.
    ///
    /// The first hook returning [`HookResult::Stop`] ends delivery and the
    /// result is `Stop`. A failing hook is logged and skipped.
    pub async fn notify(&self, event: &E) -> HookResult {
        for hook in &self.hooks {
            match hook.on_event_dyn(event).await {
                Ok(HookResult::Stop) => return HookResult::Stop,
                Ok(HookResult::Next) => continue,
                Err(error) => {
                    tracing::warn!(
                        notification = std::any::type_name::<E>(),
                        %error,
                        "lifecycle hook failed; continuing"
                    );
                }
            }
        }
        HookResult::Next
    }
}

impl<E: Message> Default for Registry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Message> Clone for Registry<E> {
    fn clone(&self) -> Self {
        Self {
            hooks: self.hooks.clone(),
        }
    }
}

/// Builder for constructing a Registry.
pub struct RegistryBuilder<E: Message> {
    hooks: Vec<Arc<dyn DynHook<E>>>,
}

impl<E: Message> Default for RegistryBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Message> RegistryBuilder<E> {
    /// Create a new empty registry builder.
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Register a hook.
    pub fn register<H: DynHook<E>>(mut self, hook: H) -> Self {
        self.register_mut(hook);
        self
    }

    /// Register a hook in place.
    pub fn register_mut<H: DynHook<E>>(&mut self, hook: H) -> &mut Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// Build the registry.
    pub fn build(self) -> Registry<E> {
        Registry { hooks: self.hooks }
    }
}
