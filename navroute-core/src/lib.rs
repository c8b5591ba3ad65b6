//! # navroute-core
//!
//! Core traits and the route model for the navroute token router.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! applications that only implement controllers or history adapters and do not
//! need the full `navroute-std` implementation.
//!
//! # Collaborators
//!
//! The router sits between two external facilities and talks to both through
//! traits defined here:
//!
//! ## Navigation Adapter ([`History`])
//!
//! Reports the current token, accepts new tokens, and raises a change
//! notification whenever the user navigates.
//!
//! ## Controller Registry ([`ControllerResolver`], [`Controller`])
//!
//! Maps a controller name to a value that can be asked to invoke an action
//! by name. There is no reflection: a controller advertises its actions.
//!
//! # Route Model
//!
//! [`RouteSpec`] is what authors write; [`CompiledRoute`] and [`RouteTable`]
//! are what the matcher and dispatcher consume.
//!
//! # Notifications
//!
//! [`RouteMissed`], [`BeforeDispatch`] and [`Dispatched`] are [`Message`]s
//! delivered to [`Hook`]s. A before-dispatch hook returning
//! [`HookResult::Stop`] cancels the dispatch.
//!
//! # Error Types
//!
//! - [`RouteError`] - Compile-time configuration errors
//! - [`DispatchFailure`] - Per-navigation failures

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod controller;
mod error;
mod events;
mod history;
mod hook;
mod message;
mod params;
mod route;

// Re-exports
pub use controller::{
    ActionRequest, Controller, ControllerRef, ControllerResolver, DynController, IntoActionResult,
};
pub use error::{BoxError, DispatchFailure, DispatchResult, RouteError};
pub use events::{BeforeDispatch, Dispatched, Navigation, RouteMissed};
pub use history::History;
pub use hook::{DynHook, FnHook, Hook, HookResult, from_fn};
pub use message::Message;
pub use params::{ParamError, Params};
pub use route::{CompiledRoute, RouteKind, RouteSpec, RouteTable, RouteTarget, Rule, Rules, TargetSpec};

/// Re-exported so downstream crates build rules and regex routes against the
/// same `regex` version.
pub use regex;
