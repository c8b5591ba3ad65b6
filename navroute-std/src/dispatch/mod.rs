//! # Dispatcher
//!
//! Drives one navigation attempt through the dispatch state machine:
//!
//! ```text
//! Idle → Matching → Validating → BeforeDispatch → Invoking → Dispatched
//!           │  ▲          │             │
//!           │  └──────────┘             └─ Stop → cancelled
//!           └─ no candidate left → RouteMissed
//! ```
//!
//! A rule rejecting a candidate sends the machine back to `Matching` with the
//! next route in registration order. Every transition is traced at `DEBUG`.
//!
//! # Example
//!
//! ```rust,ignore
//! let dispatcher = Dispatcher::new(table, Arc::new(controllers))
//!     .with_hooks(LifecycleHooks::builder().on_route_missed(LoggingHook).build());
//!
//! let params = dispatcher.dispatch("users/42/edit").await?;
//! ```

use crate::{
    hooks::{Registry, RegistryBuilder},
    matcher::{RouteMatch, RouteMatcher},
};
use navroute_core::{
    ActionRequest, BeforeDispatch, CompiledRoute, ControllerRef, ControllerResolver,
    DispatchFailure, DispatchResult, Dispatched, DynHook, RouteMissed, RouteTable,
};
use std::{fmt, sync::Arc};

/// The states of a single dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// Nothing started yet.
    Idle,
    /// Looking for the next candidate route.
    Matching,
    /// Checking a candidate's rules.
    Validating,
    /// Asking before-dispatch subscribers for permission.
    BeforeDispatch,
    /// Resolving the controller and running the action.
    Invoking,
    /// Terminal: the action ran.
    Dispatched,
    /// Terminal: no route accepted the token.
    RouteMissed,
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DispatchState::Idle => "idle",
            DispatchState::Matching => "matching",
            DispatchState::Validating => "validating",
            DispatchState::BeforeDispatch => "before-dispatch",
            DispatchState::Invoking => "invoking",
            DispatchState::Dispatched => "dispatched",
            DispatchState::RouteMissed => "route-missed",
        };
        f.write_str(name)
    }
}

/// Subscribers of the three router notifications.
#[derive(Clone, Default)]
pub struct LifecycleHooks {
    /// Raised when no route accepts a token.
    pub route_missed: Registry<RouteMissed>,
    /// Raised before an action runs; `Stop` cancels.
    pub before_dispatch: Registry<BeforeDispatch>,
    /// Raised after an action ran successfully.
    pub dispatched: Registry<Dispatched>,
}

impl LifecycleHooks {
    /// Starts an empty set of subscribers.
    pub fn builder() -> LifecycleHooksBuilder {
        LifecycleHooksBuilder::default()
    }
}

impl fmt::Debug for LifecycleHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleHooks")
            .field("route_missed", &self.route_missed.len())
            .field("before_dispatch", &self.before_dispatch.len())
            .field("dispatched", &self.dispatched.len())
            .finish()
    }
}

/// Builder for [`LifecycleHooks`].
#[derive(Default)]
pub struct LifecycleHooksBuilder {
    route_missed: RegistryBuilder<RouteMissed>,
    before_dispatch: RegistryBuilder<BeforeDispatch>,
    dispatched: RegistryBuilder<Dispatched>,
}

impl LifecycleHooksBuilder {
    /// Subscribes to route-missed notifications.
    pub fn on_route_missed<H: DynHook<RouteMissed>>(mut self, hook: H) -> Self {
        self.route_missed.register_mut(hook);
        self
    }

    /// Subscribes to before-dispatch notifications.
    pub fn on_before_dispatch<H: DynHook<BeforeDispatch>>(mut self, hook: H) -> Self {
        self.before_dispatch.register_mut(hook);
        self
    }

    /// Subscribes to dispatch notifications.
    pub fn on_dispatch<H: DynHook<Dispatched>>(mut self, hook: H) -> Self {
        self.dispatched.register_mut(hook);
        self
    }

    /// Finishes the set.
    pub fn build(self) -> LifecycleHooks {
        LifecycleHooks {
            route_missed: self.route_missed.build(),
            before_dispatch: self.before_dispatch.build(),
            dispatched: self.dispatched.build(),
        }
    }
}

/// Matches tokens against a route table and invokes controller actions.
#[derive(Clone)]
pub struct Dispatcher {
    table: Arc<RouteTable>,
    resolver: Arc<dyn ControllerResolver>,
    hooks: LifecycleHooks,
}

impl Dispatcher {
    /// Creates a dispatcher without subscribers.
    pub fn new(table: impl Into<Arc<RouteTable>>, resolver: Arc<dyn ControllerResolver>) -> Self {
        Self {
            table: table.into(),
            resolver,
            hooks: LifecycleHooks::default(),
        }
    }

    /// Replaces the notification subscribers.
    pub fn with_hooks(mut self, hooks: LifecycleHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// The compiled routes.
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// The notification subscribers.
    pub fn hooks(&self) -> &LifecycleHooks {
        &self.hooks
    }

    /// The route that `token` would be dispatched to, without notifying
    /// anybody or running an action.
    pub fn find_match(&self, token: &str) -> Option<RouteMatch> {
        RouteMatcher::new(&self.table).first_valid(token)
    }

    /// Runs one navigation attempt for `token`.
    ///
    /// Returns the resolved parameters when the action ran. Every failure is
    /// logged here; callers may ignore the `Err` side.
    pub async fn dispatch(&self, token: &str) -> DispatchResult {
        trace_state(token, DispatchState::Idle);

        let Some(RouteMatch { route, params }) = self.select(token) else {
            trace_state(token, DispatchState::RouteMissed);
            self.hooks
                .route_missed
                .notify(&RouteMissed {
                    token: token.to_owned(),
                })
                .await;
            return Err(DispatchFailure::RouteMissed(token.to_owned()));
        };

        trace_state(token, DispatchState::BeforeDispatch);
        let before = BeforeDispatch {
            token: token.to_owned(),
            route: Arc::clone(&route),
            params: params.clone(),
        };
        if self.hooks.before_dispatch.notify(&before).await.is_stop() {
            tracing::debug!(token, route = %route.pattern(), "dispatch cancelled");
            return Err(DispatchFailure::Cancelled);
        }

        trace_state(token, DispatchState::Invoking);
        let controller = self.resolve_controller(&route)?;
        let action = route.action().unwrap_or_default();
        if !controller.has_action_dyn(action) {
            let controller_name = route.controller().unwrap_or_default();
            tracing::error!(
                controller = controller_name,
                action,
                "controller action not found"
            );
            return Err(DispatchFailure::ActionNotFound {
                controller: controller_name.to_owned(),
                action: action.to_owned(),
            });
        }

        let request = ActionRequest {
            params: params.clone(),
            token: token.to_owned(),
            route: Arc::clone(&route),
        };
        if let Err(error) = controller.call_dyn(action, request).await {
            tracing::error!(token, route = %route.pattern(), action, %error, "action failed");
            return Err(DispatchFailure::Action(error));
        }

        trace_state(token, DispatchState::Dispatched);
        self.hooks
            .dispatched
            .notify(&Dispatched {
                token: token.to_owned(),
                route,
                params: params.clone(),
                controller,
            })
            .await;

        Ok(params)
    }

    /// `Matching ⇄ Validating` until a candidate passes its rules.
    fn select(&self, token: &str) -> Option<RouteMatch> {
        let mut candidates = RouteMatcher::new(&self.table).candidates(token);
        loop {
            trace_state(token, DispatchState::Matching);
            let candidate = candidates.next()?;

            trace_state(token, DispatchState::Validating);
            match candidate.route.validate(&candidate.params) {
                Ok(()) => return Some(candidate),
                Err(param) => {
                    tracing::debug!(
                        token,
                        route = %candidate.route.pattern(),
                        param,
                        "rule rejected parameter; trying next route"
                    );
                }
            }
        }
    }

    /// Looks the controller up by its configured name, then by the
    /// capitalized name. The winning spelling is cached on the route.
    fn resolve_controller(&self, route: &CompiledRoute) -> Result<ControllerRef, DispatchFailure> {
        let Some(name) = route.controller() else {
            tracing::error!(route = %route.pattern(), "controller not found: route names no controller");
            return Err(DispatchFailure::ControllerNotFound(String::new()));
        };

        if let Some(controller) = self.resolver.resolve(name) {
            return Ok(controller);
        }

        let capitalized = capitalize(name);
        if capitalized != name
            && let Some(controller) = self.resolver.resolve(&capitalized)
        {
            route.remember_controller(&capitalized);
            return Ok(controller);
        }

        tracing::error!(controller = name, "controller not found");
        Err(DispatchFailure::ControllerNotFound(name.to_owned()))
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.table.len())
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

fn trace_state(token: &str, state: DispatchState) {
    tracing::debug!(token, %state, "dispatch state");
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        compiler::RouteCompiler,
        controllers::ControllerRegistry,
        testing::{RecordingController, RecordingHook},
    };
    use navroute_core::{HookResult, RouteSpec, RouteTarget, Rule, from_fn};
    use tracing_test::traced_test;

    fn dispatcher(specs: Vec<RouteSpec>, controllers: ControllerRegistry) -> Dispatcher {
        let table = RouteCompiler::lenient().compile(specs).unwrap();
        Dispatcher::new(table, Arc::new(controllers))
    }

    #[tokio::test]
    async fn dispatches_to_matching_action() {
        let users = RecordingController::new(["edit"]);
        let controllers = ControllerRegistry::builder()
            .register("users", users.clone())
            .build();
        let dispatcher = dispatcher(vec![RouteSpec::new("users/:id/edit", "users#edit")], controllers);

        let params = dispatcher.dispatch("users/42/edit").await.unwrap();

        assert_eq!(params.get("id"), Some("42"));
        let calls = users.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "edit");
        assert_eq!(calls[0].1.token, "users/42/edit");
    }

    #[tokio::test]
    async fn unmatched_token_raises_route_missed() {
        let missed = RecordingHook::new();
        let before = RecordingHook::new();
        let dispatcher = dispatcher(
            vec![RouteSpec::new("users", "users#list")],
            ControllerRegistry::new(),
        )
        .with_hooks(
            LifecycleHooks::builder()
                .on_route_missed(missed.clone())
                .on_before_dispatch(before.clone())
                .build(),
        );

        let err = dispatcher.dispatch("nowhere/at/all").await.unwrap_err();

        assert!(err.is_missed());
        assert_eq!(missed.events(), [RouteMissed { token: "nowhere/at/all".into() }]);
        assert_eq!(before.count(), 0);
    }

    #[tokio::test]
    async fn rule_failure_falls_through_to_next_route() {
        let users = RecordingController::new(["show", "by_name"]);
        let controllers = ControllerRegistry::builder()
            .register("users", users.clone())
            .build();
        let dispatcher = dispatcher(
            vec![
                RouteSpec::new(
                    "users/:id",
                    RouteTarget::to("users", "show").rule("id", Rule::predicate(|v| v.parse::<u32>().is_ok())),
                ),
                RouteSpec::new("users/:name", "users#by_name"),
            ],
            controllers,
        );

        dispatcher.dispatch("users/7").await.unwrap();
        dispatcher.dispatch("users/ann").await.unwrap();

        assert_eq!(users.actions_called(), ["show", "by_name"]);
    }

    #[tokio::test]
    async fn rule_failure_without_fallback_is_a_miss() {
        let missed = RecordingHook::new();
        let dispatcher = dispatcher(
            vec![RouteSpec::new(
                "users/:id",
                RouteTarget::to("users", "show").rule("id", "1"),
            )],
            ControllerRegistry::builder()
                .register("users", RecordingController::new(["show"]))
                .build(),
        )
        .with_hooks(LifecycleHooks::builder().on_route_missed(missed.clone()).build());

        assert!(dispatcher.dispatch("users/2").await.unwrap_err().is_missed());
        assert_eq!(missed.count(), 1);
    }

    #[tokio::test]
    async fn before_dispatch_stop_cancels_everything() {
        let users = RecordingController::new(["list"]);
        let missed = RecordingHook::new();
        let dispatched = RecordingHook::new();
        let dispatcher = dispatcher(
            vec![RouteSpec::new("users", "users#list")],
            ControllerRegistry::builder()
                .register("users", users.clone())
                .build(),
        )
        .with_hooks(
            LifecycleHooks::builder()
                .on_route_missed(missed.clone())
                .on_before_dispatch(from_fn(|_: &BeforeDispatch| HookResult::Stop))
                .on_dispatch(dispatched.clone())
                .build(),
        );

        let err = dispatcher.dispatch("users").await.unwrap_err();

        assert!(err.is_cancelled());
        assert!(users.calls().is_empty());
        assert_eq!(missed.count(), 0);
        assert_eq!(dispatched.count(), 0);
    }

    #[tokio::test]
    async fn dispatched_event_carries_route_and_params() {
        let dispatched = RecordingHook::new();
        let dispatcher = dispatcher(
            vec![RouteSpec::new("search", "search#run")],
            ControllerRegistry::builder()
                .register("search", RecordingController::new(["run"]))
                .build(),
        )
        .with_hooks(LifecycleHooks::builder().on_dispatch(dispatched.clone()).build());

        dispatcher.dispatch("search?q=cats").await.unwrap();

        let events: Vec<Dispatched> = dispatched.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].token, "search?q=cats");
        assert_eq!(events[0].route.pattern(), "search");
        assert_eq!(events[0].params.get("q"), Some("cats"));
        assert!(events[0].controller.has_action_dyn("run"));
    }

    #[tokio::test]
    #[traced_test]
    async fn capitalized_controller_name_is_resolved_and_cached() {
        let home = RecordingController::new(["index"]);
        let dispatcher = dispatcher(
            vec![RouteSpec::new("/", "home#index")],
            ControllerRegistry::builder()
                .register("Home", home.clone())
                .build(),
        );

        dispatcher.dispatch("").await.unwrap();
        dispatcher.dispatch("/").await.unwrap();

        assert_eq!(home.count(), 2);
        let route = dispatcher.table().get(0).unwrap();
        assert_eq!(route.controller(), Some("Home"));
        assert_eq!(route.configured_controller(), Some("home"));
    }

    #[tokio::test]
    #[traced_test]
    async fn missing_controller_and_action_are_logged() {
        let dispatcher = dispatcher(
            vec![
                RouteSpec::new("ghost", "ghost#haunt"),
                RouteSpec::new("users", "users#destroy"),
            ],
            ControllerRegistry::builder()
                .register("users", RecordingController::new(["list"]))
                .build(),
        );

        let err = dispatcher.dispatch("ghost").await.unwrap_err();
        assert!(matches!(err, DispatchFailure::ControllerNotFound(ref name) if name == "ghost"));
        assert!(logs_contain("controller not found"));

        let err = dispatcher.dispatch("users").await.unwrap_err();
        assert!(matches!(err, DispatchFailure::ActionNotFound { ref action, .. } if action == "destroy"));
        assert!(logs_contain("controller action not found"));
    }

    #[tokio::test]
    #[traced_test]
    async fn failing_action_skips_dispatch_notification() {
        let dispatched = RecordingHook::new();
        let dispatcher = dispatcher(
            vec![RouteSpec::new("save", "doc#save")],
            ControllerRegistry::builder()
                .register("doc", RecordingController::new(["save"]).failing_on("save"))
                .build(),
        )
        .with_hooks(LifecycleHooks::builder().on_dispatch(dispatched.clone()).build());

        let err = dispatcher.dispatch("save").await.unwrap_err();

        assert!(matches!(err, DispatchFailure::Action(_)));
        assert_eq!(dispatched.count(), 0);
        assert!(logs_contain("action failed"));
    }

    #[tokio::test]
    async fn find_match_does_not_notify() {
        let users = RecordingController::new(["edit"]);
        let missed = RecordingHook::new();
        let dispatcher = dispatcher(
            vec![RouteSpec::new("users/:id/edit", "users#edit")],
            ControllerRegistry::builder()
                .register("users", users.clone())
                .build(),
        )
        .with_hooks(LifecycleHooks::builder().on_route_missed(missed.clone()).build());

        let found = dispatcher.find_match("users/3/edit").unwrap();
        assert_eq!(found.params.get("id"), Some("3"));
        assert!(dispatcher.find_match("users").is_none());
        assert_eq!(users.count(), 0);
        assert_eq!(missed.count(), 0);
    }

    #[test]
    fn capitalize_handles_edge_cases() {
        assert_eq!(capitalize("users"), "Users");
        assert_eq!(capitalize("Users"), "Users");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("élan"), "Élan");
    }
}
