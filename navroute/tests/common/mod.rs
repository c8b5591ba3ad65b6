#![allow(dead_code)]

use futures::channel::mpsc::{self, UnboundedReceiver};
use navroute::{
    ActionRequest, BoxError, Controller, ControllerRegistry, Dispatched, FnHook, RouteSpec,
    from_fn,
};
use std::sync::{Arc, Mutex};

// ============================================================================
// Journal
// ============================================================================

/// Shared log of `Controller#action` invocations, with their parameters.
#[derive(Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: String) {
        self.entries.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

// ============================================================================
// Test Controllers
// ============================================================================

/// Writes `Name#action` (plus ` k=v` pairs) to a journal.
pub struct JournalController {
    pub name: &'static str,
    pub actions: &'static [&'static str],
    pub journal: Journal,
}

impl Controller for JournalController {
    fn has_action(&self, action: &str) -> bool {
        self.actions.iter().any(|known| *known == action)
    }

    async fn call(&self, action: &str, request: ActionRequest) -> Result<(), BoxError> {
        let mut entry = format!("{}#{}", self.name, action);
        for (key, value) in request.params.iter() {
            entry.push_str(&format!(" {key}={value}"));
        }
        self.journal.push(entry);
        Ok(())
    }
}

/// The routes of the single-page demo.
pub fn app_routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec::new("/", "home#index"),
        RouteSpec::new("settings", "settings#index"),
        RouteSpec::new("users", "users#list"),
        RouteSpec::new("users/:id/edit", "users#edit"),
    ]
}

fn journal_controller(
    name: &'static str,
    actions: &'static [&'static str],
    journal: &Journal,
) -> JournalController {
    JournalController {
        name,
        actions,
        journal: journal.clone(),
    }
}

/// `Home`, `Settings` and `Users`, all writing to `journal`.
pub fn app_controllers(journal: &Journal) -> ControllerRegistry {
    ControllerRegistry::builder()
        .register("Home", journal_controller("Home", &["index"], journal))
        .register("Settings", journal_controller("Settings", &["index"], journal))
        .register("Users", journal_controller("Users", &["list", "edit"], journal))
        .build()
}

// ============================================================================
// Dispatch Signal
// ============================================================================

pub type SignalFn = Box<dyn Fn(&Dispatched) + Send + Sync>;
pub type SignalHook = FnHook<SignalFn>;

/// A dispatch subscriber forwarding every dispatched token to a channel, so a
/// test can wait for the router to catch up.
pub fn dispatch_signal() -> (SignalHook, UnboundedReceiver<String>) {
    let (tx, rx) = mpsc::unbounded();
    let forward: SignalFn = Box::new(move |event: &Dispatched| {
        let _ = tx.unbounded_send(event.token.clone());
    });
    (from_fn(forward), rx)
}
