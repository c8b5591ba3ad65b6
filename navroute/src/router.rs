//! # Router
//!
//! The owned router instance an application performs navigation through.
//!
//! A [`Router`] is built once with its lifecycle subscribers, then
//! [`initialize`](Router::initialize)d with the route table and the controller
//! resolver. Driving it from a [`History`] is optional: [`parse`](Router::parse)
//! dispatches any token directly.
//!
//! ```rust,ignore
//! let router = Arc::new(
//!     Router::builder()
//!         .on_route_missed(LoggingHook)
//!         .build(),
//! );
//! router.initialize(
//!     [
//!         RouteSpec::new("/", "home#index"),
//!         RouteSpec::new("users/:id/edit", "users#edit"),
//!     ],
//!     controllers,
//! )?;
//!
//! let history = Arc::new(MemoryHistory::new());
//! router.start(history, std::future::ready(())).await?;
//! ```

use crate::error::RouterError;
use futures::{Stream, StreamExt, stream::BoxStream};
use navroute_core::{
    BeforeDispatch, ControllerResolver, Dispatched, DynHook, History, Navigation, Params,
    RouteMissed, RouteSpec,
};
use navroute_std::{
    compiler::{CompileMode, RouteCompiler},
    config::RouteConfig,
    dispatch::{Dispatcher, LifecycleHooks, LifecycleHooksBuilder},
    matcher::RouteMatch,
};
use std::{
    borrow::Borrow,
    fmt,
    future::Future,
    pin::pin,
    sync::{Arc, OnceLock},
};

/// Builder for [`Router`].
#[derive(Default)]
pub struct RouterBuilder {
    mode: CompileMode,
    hooks: LifecycleHooksBuilder,
}

impl RouterBuilder {
    /// Chooses how malformed routes are treated. Strict by default.
    pub fn compile_mode(mut self, mode: CompileMode) -> Self {
        self.mode = mode;
        self
    }

    /// Subscribes to route-missed notifications.
    pub fn on_route_missed<H: DynHook<RouteMissed>>(mut self, hook: H) -> Self {
        self.hooks = self.hooks.on_route_missed(hook);
        self
    }

    /// Subscribes to before-dispatch notifications. A subscriber answering
    /// `Stop` cancels the dispatch.
    pub fn on_before_dispatch<H: DynHook<BeforeDispatch>>(mut self, hook: H) -> Self {
        self.hooks = self.hooks.on_before_dispatch(hook);
        self
    }

    /// Subscribes to dispatch notifications.
    pub fn on_dispatch<H: DynHook<Dispatched>>(mut self, hook: H) -> Self {
        self.hooks = self.hooks.on_dispatch(hook);
        self
    }

    /// Builds an uninitialized router.
    pub fn build(self) -> Router {
        Router {
            compiler: RouteCompiler::with_mode(self.mode),
            hooks: self.hooks.build(),
            dispatcher: OnceLock::new(),
            history: OnceLock::new(),
        }
    }
}

/// Routes navigation tokens to controller actions.
pub struct Router {
    compiler: RouteCompiler,
    hooks: LifecycleHooks,
    dispatcher: OnceLock<Dispatcher>,
    history: OnceLock<Arc<dyn History>>,
}

impl Router {
    /// A router without subscribers, compiling strictly.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts configuring a router.
    pub fn builder() -> RouterBuilder {
        RouterBuilder::default()
    }

    /// Replaces the compile mode. Only affects a later
    /// [`initialize`](Self::initialize).
    pub fn with_compile_mode(mut self, mode: CompileMode) -> Self {
        self.compiler = RouteCompiler::with_mode(mode);
        self
    }

    /// The mode routes are compiled with.
    pub fn compile_mode(&self) -> CompileMode {
        self.compiler.mode()
    }

    /// Compiles `specs` and installs `resolver`. Only the first call succeeds.
    pub fn initialize<I, R>(&self, specs: I, resolver: R) -> Result<(), RouterError>
    where
        I: IntoIterator,
        I::Item: Borrow<RouteSpec>,
        R: ControllerResolver,
    {
        self.initialize_shared(specs, Arc::new(resolver))
    }

    /// Like [`initialize`](Self::initialize) with an already shared resolver.
    pub fn initialize_shared<I>(
        &self,
        specs: I,
        resolver: Arc<dyn ControllerResolver>,
    ) -> Result<(), RouterError>
    where
        I: IntoIterator,
        I::Item: Borrow<RouteSpec>,
    {
        if self.is_initialized() {
            return Err(RouterError::AlreadyInitialized);
        }

        let table = self.compiler.compile(specs)?;
        let routes = table.len();
        let dispatcher = Dispatcher::new(table, resolver).with_hooks(self.hooks.clone());
        self.dispatcher
            .set(dispatcher)
            .map_err(|_| RouterError::AlreadyInitialized)?;

        tracing::info!(routes, "router initialized");
        Ok(())
    }

    /// Initializes from a loaded [`RouteConfig`].
    pub fn initialize_from_config<R: ControllerResolver>(
        &self,
        routes: &RouteConfig,
        resolver: R,
    ) -> Result<(), RouterError> {
        let specs = routes.to_specs()?;
        self.initialize(specs, resolver)
    }

    /// Whether [`initialize`](Self::initialize) succeeded.
    pub fn is_initialized(&self) -> bool {
        self.dispatcher.get().is_some()
    }

    /// The dispatcher behind this router.
    pub fn dispatcher(&self) -> Result<&Dispatcher, RouterError> {
        self.dispatcher.get().ok_or(RouterError::NotInitialized)
    }

    /// Runs a full matching and dispatch cycle for `token`.
    pub async fn parse(&self, token: &str) -> Result<Params, RouterError> {
        Ok(self.dispatcher()?.dispatch(token).await?)
    }

    /// The route `token` would dispatch to, without notifying subscribers or
    /// invoking an action.
    pub fn find_match(&self, token: &str) -> Result<Option<RouteMatch>, RouterError> {
        Ok(self.dispatcher()?.find_match(token))
    }

    /// Attaches `history`: initializes it and subscribes to its changes.
    ///
    /// A router drives at most one history.
    pub fn attach<H: History>(
        &self,
        history: Arc<H>,
    ) -> Result<BoxStream<'static, Navigation>, RouterError> {
        let history: Arc<dyn History> = history;
        self.history
            .set(Arc::clone(&history))
            .map_err(|_| RouterError::HistoryAttached)?;

        history.init();
        Ok(history.changes())
    }

    /// The attached history, if any.
    pub fn history(&self) -> Option<&Arc<dyn History>> {
        self.history.get()
    }

    /// Dispatches every navigation of `changes`, one at a time and in order,
    /// until the stream ends.
    pub async fn run<S>(&self, changes: S)
    where
        S: Stream<Item = Navigation>,
    {
        let mut changes = pin!(changes);
        while let Some(navigation) = changes.next().await {
            if let Err(error) = self.parse(&navigation.token).await {
                tracing::debug!(token = %navigation.token, %error, "navigation was not dispatched");
            }
        }
        tracing::debug!("history closed; router stopped");
    }

    /// Attaches `history`, waits for `ready`, dispatches the current token and
    /// then follows history changes until the history closes.
    ///
    /// Changes raised while waiting for `ready` are queued and dispatched
    /// after the initial token.
    pub async fn start<H, F>(&self, history: Arc<H>, ready: F) -> Result<(), RouterError>
    where
        H: History,
        F: Future<Output = ()>,
    {
        self.dispatcher()?;
        let changes = self.attach(Arc::clone(&history))?;

        ready.await;
        let token = history.token();
        if let Err(error) = self.parse(&token).await {
            tracing::debug!(%token, %error, "initial navigation was not dispatched");
        }

        self.run(changes).await;
        Ok(())
    }

    /// Navigates to `token`, re-running the dispatch in place when `token` is
    /// already current. Same as `redirect_with(token, true)`.
    ///
    /// Calling this from inside an action re-enters dispatch on the same task
    /// before the outer dispatch has finished; the outer `Dispatched`
    /// notification is then raised after the inner one.
    pub async fn redirect(&self, token: &str) -> Result<(), RouterError> {
        self.redirect_with(token, true).await
    }

    /// Navigates to `token`.
    ///
    /// With `prevent_duplicate` and `token` equal to the current token, the
    /// dispatch is re-run without pushing a history step. Otherwise a step is
    /// always pushed and the attached history's change notification triggers
    /// the dispatch.
    pub async fn redirect_with(&self, token: &str, prevent_duplicate: bool) -> Result<(), RouterError> {
        let history = self.history.get().ok_or(RouterError::NoHistory)?;

        if prevent_duplicate && history.token() == token {
            tracing::debug!(token, "redirect to current token; dispatching in place");
            if let Err(error) = self.parse(token).await {
                tracing::debug!(token, %error, "navigation was not dispatched");
            }
        } else {
            history.add(token);
        }
        Ok(())
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("compile_mode", &self.compiler.mode())
            .field("dispatcher", &self.dispatcher.get())
            .field("history_attached", &self.history.get().is_some())
            .finish()
    }
}
