//! # navroute - Navigation Token Router
//!
//! `navroute` maps navigation tokens (the fragment part of a URL, such as
//! `users/42/edit?tab=notes`) to controller actions.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use navroute::prelude::*;
//!
//! struct Users;
//!
//! #[navroute::controller]
//! impl Users {
//!     #[action]
//!     async fn list(&self) {}
//!
//!     #[action]
//!     async fn edit(&self, params: Params) -> Result<(), BoxError> {
//!         let id: u32 = params.get_as("id")?;
//!         Ok(())
//!     }
//! }
//!
//! let router = Router::new();
//! router.initialize(
//!     [
//!         RouteSpec::new("/", "home#index"),
//!         RouteSpec::new("users", "users#list"),
//!         RouteSpec::new("users/:id/edit", "users#edit"),
//!     ],
//!     ControllerRegistry::builder().register("Users", Users).build(),
//! )?;
//!
//! router.parse("users/42/edit").await?;
//! ```
//!
//! ## Layers
//!
//! - `navroute-core`: traits and the route model
//! - `navroute-std`: compiler, matcher, dispatcher, registries, history
//! - `navroute`: the [`Router`] and [`Application`] facade

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod application;
mod error;
mod router;

pub use application::{Application, ApplicationBuilder};
pub use error::RouterError;
pub use router::{Router, RouterBuilder};

pub use navroute_core::{
    // Controllers
    ActionRequest,
    // Notifications
    BeforeDispatch,
    // Errors
    BoxError,
    CompiledRoute,
    Controller,
    ControllerRef,
    ControllerResolver,
    DispatchFailure,
    DispatchResult,
    Dispatched,
    DynController,
    // Hooks
    DynHook,
    FnHook,
    // History
    History,
    Hook,
    HookResult,
    IntoActionResult,
    Message,
    Navigation,
    ParamError,
    // Route model
    Params,
    RouteError,
    RouteKind,
    RouteMissed,
    RouteSpec,
    RouteTable,
    RouteTarget,
    Rule,
    Rules,
    TargetSpec,
    from_fn,
    regex,
};

pub use navroute_std::{
    compiler::{CompileMode, RouteCompiler},
    config::{ConfigError, RouteConfig, RouterConfig},
    controllers::{ControllerRegistry, ControllerRegistryBuilder},
    dispatch::{DispatchState, Dispatcher, LifecycleHooks, LifecycleHooksBuilder},
    history::MemoryHistory,
    matcher::{RouteMatch, RouteMatcher},
    token::ParsedToken,
};

/// Standard hook implementations.
pub mod hooks {
    pub use navroute_std::hooks::{LoggingHook, Registry, RegistryBuilder};
}

/// Testing utilities.
pub mod testing {
    pub use navroute_std::testing::{RecordingController, RecordingHook};
}

/// Prelude module - common imports for navroute.
///
/// # Usage
///
/// ```rust,ignore
/// use navroute::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ActionRequest, Application, BoxError, Controller, ControllerRegistry, History, Hook,
        HookResult, MemoryHistory, Params, RouteSpec, RouteTarget, Router, RouterError, Rule,
        from_fn,
    };

    #[cfg(feature = "macros")]
    pub use crate::controller;
}

#[cfg(feature = "macros")]
pub use navroute_macros::controller;
