//! # Controller Registry
//!
//! A name → controller map implementing [`ControllerResolver`]. Controllers
//! are either registered ready-made or as factories that run on first
//! resolution and are then shared.

use navroute_core::{Controller, ControllerRef, ControllerResolver};
use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, OnceLock},
};

type Factory = Box<dyn Fn() -> ControllerRef + Send + Sync>;

enum Slot {
    Ready(ControllerRef),
    Lazy {
        factory: Factory,
        instance: OnceLock<ControllerRef>,
    },
}

/// Controllers addressable by name.
#[derive(Default)]
pub struct ControllerRegistry {
    slots: HashMap<String, Slot>,
}

impl ControllerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a registry.
    pub fn builder() -> ControllerRegistryBuilder {
        ControllerRegistryBuilder::default()
    }

    /// Whether `name` is registered (exact spelling).
    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Number of registered controllers.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }
}

impl ControllerResolver for ControllerRegistry {
    fn resolve(&self, name: &str) -> Option<ControllerRef> {
        match self.slots.get(name)? {
            Slot::Ready(controller) => Some(Arc::clone(controller)),
            Slot::Lazy { factory, instance } => {
                let controller = instance.get_or_init(|| {
                    tracing::debug!(controller = name, "constructing controller");
                    factory()
                });
                Some(Arc::clone(controller))
            }
        }
    }
}

impl fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("ControllerRegistry")
            .field("controllers", &names)
            .finish()
    }
}

/// Builder for [`ControllerRegistry`]. Registering a name twice replaces the
/// earlier entry.
#[derive(Default)]
pub struct ControllerRegistryBuilder {
    slots: HashMap<String, Slot>,
}

impl ControllerRegistryBuilder {
    /// Registers a ready controller.
    pub fn register<C: Controller>(self, name: impl Into<String>, controller: C) -> Self {
        self.register_arc(name, Arc::new(controller))
    }

    /// Registers an already shared controller.
    pub fn register_arc(mut self, name: impl Into<String>, controller: ControllerRef) -> Self {
        self.slots.insert(name.into(), Slot::Ready(controller));
        self
    }

    /// Registers a factory invoked on first resolution.
    pub fn register_lazy<C, F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        C: Controller,
        F: Fn() -> C + Send + Sync + 'static,
    {
        let factory: Factory = Box::new(move || Arc::new(factory()) as ControllerRef);
        self.slots.insert(
            name.into(),
            Slot::Lazy {
                factory,
                instance: OnceLock::new(),
            },
        );
        self
    }

    /// Finishes the registry.
    pub fn build(self) -> ControllerRegistry {
        ControllerRegistry { slots: self.slots }
    }
}
