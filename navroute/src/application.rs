//! # Application bootstrap
//!
//! An [`Application`] owns the router and runs start-up in explicit phases:
//!
//! 1. `before_launch` callbacks, in registration order
//! 2. router initialization, when `enable_router` is set
//! 3. `launch` callbacks, in registration order
//!
//! [`run`](Application::run) then hands navigation over to the router.

use crate::{error::RouterError, router::Router};
use navroute_core::{ControllerResolver, History, RouteSpec, RouteTarget};
use navroute_std::{compiler::CompileMode, config::RouterConfig, controllers::ControllerRegistry};
use std::{fmt, future::Future, sync::Arc};

type Phase = Box<dyn Fn(&Router) + Send + Sync>;

/// Builder for [`Application`].
pub struct ApplicationBuilder {
    name: String,
    enable_router: bool,
    router: Option<Router>,
    compile_mode: Option<CompileMode>,
    routes: Vec<RouteSpec>,
    resolver: Option<Arc<dyn ControllerResolver>>,
    before_launch: Vec<Phase>,
    launch: Vec<Phase>,
}

impl ApplicationBuilder {
    /// Turns automatic router initialization on or off. On by default.
    pub fn enable_router(mut self, enable: bool) -> Self {
        self.enable_router = enable;
        self
    }

    /// Uses a preconfigured router instead of `Router::new()`.
    pub fn router(mut self, router: Router) -> Self {
        self.router = Some(router);
        self
    }

    /// Appends a route.
    pub fn route(mut self, pattern: impl Into<String>, target: impl Into<RouteTarget>) -> Self {
        self.routes.push(RouteSpec::new(pattern, target));
        self
    }

    /// Appends routes in order.
    pub fn routes<I: IntoIterator<Item = RouteSpec>>(mut self, routes: I) -> Self {
        self.routes.extend(routes);
        self
    }

    /// Applies loaded settings: the `enable_router` flag, the routes and the
    /// compile mode.
    ///
    /// The loaded compile mode replaces the one of a router passed to
    /// [`router`](Self::router), whichever is called first.
    pub fn config(mut self, config: &RouterConfig) -> Result<Self, RouterError> {
        self.enable_router = config.enable_router;
        self.compile_mode = Some(config.compile_mode);
        self.routes.extend(config.routes.to_specs()?);
        Ok(self)
    }

    /// Installs the controller resolver.
    pub fn controllers<R: ControllerResolver>(mut self, resolver: R) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Runs `phase` before the router is initialized.
    pub fn before_launch<F>(mut self, phase: F) -> Self
    where
        F: Fn(&Router) + Send + Sync + 'static,
    {
        self.before_launch.push(Box::new(phase));
        self
    }

    /// Runs `phase` after the router is initialized.
    pub fn launch<F>(mut self, phase: F) -> Self
    where
        F: Fn(&Router) + Send + Sync + 'static,
    {
        self.launch.push(Box::new(phase));
        self
    }

    /// Finishes the application without launching it.
    pub fn build(self) -> Application {
        let router = self.router.unwrap_or_default();
        let router = match self.compile_mode {
            Some(mode) => router.with_compile_mode(mode),
            None => router,
        };

        Application {
            name: self.name,
            enable_router: self.enable_router,
            router: Arc::new(router),
            routes: self.routes,
            resolver: self
                .resolver
                .unwrap_or_else(|| Arc::new(ControllerRegistry::new())),
            before_launch: self.before_launch,
            launch: self.launch,
        }
    }
}

/// An application shell owning a [`Router`].
pub struct Application {
    name: String,
    enable_router: bool,
    router: Arc<Router>,
    routes: Vec<RouteSpec>,
    resolver: Arc<dyn ControllerResolver>,
    before_launch: Vec<Phase>,
    launch: Vec<Phase>,
}

impl Application {
    /// Starts describing an application called `name`.
    pub fn builder(name: impl Into<String>) -> ApplicationBuilder {
        ApplicationBuilder {
            name: name.into(),
            enable_router: true,
            router: None,
            compile_mode: None,
            routes: Vec::new(),
            resolver: None,
            before_launch: Vec::new(),
            launch: Vec::new(),
        }
    }

    /// The application name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether launching initializes the router.
    pub fn router_enabled(&self) -> bool {
        self.enable_router
    }

    /// The router, shared so actions can redirect through it.
    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    /// Runs the bootstrap phases.
    pub fn launch(&self) -> Result<(), RouterError> {
        tracing::debug!(app = %self.name, "before launch");
        for phase in &self.before_launch {
            phase(&self.router);
        }

        if self.enable_router {
            self.router
                .initialize_shared(&self.routes, Arc::clone(&self.resolver))?;
        } else {
            tracing::info!(app = %self.name, "router disabled");
        }

        tracing::debug!(app = %self.name, "launch");
        for phase in &self.launch {
            phase(&self.router);
        }
        Ok(())
    }

    /// Launches and then follows `history` until it closes. Without the
    /// router, only the bootstrap phases run.
    pub async fn run<H, F>(&self, history: Arc<H>, ready: F) -> Result<(), RouterError>
    where
        H: History,
        F: Future<Output = ()>,
    {
        self.launch()?;
        if !self.enable_router {
            return Ok(());
        }
        self.router.start(history, ready).await
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("name", &self.name)
            .field("enable_router", &self.enable_router)
            .field("routes", &self.routes.len())
            .field("router", &self.router)
            .finish_non_exhaustive()
    }
}
