//! # navroute-std
//!
//! Standard implementations for the navroute token router.
//!
//! This crate provides:
//! - **Compilation**: [`compiler::RouteCompiler`] turns route specs into a table
//! - **Parsing**: [`token::ParsedToken`] splits a token into segments and query
//! - **Matching**: [`matcher::RouteMatcher`] finds candidate routes in order
//! - **Dispatch**: [`dispatch::Dispatcher`] runs the dispatch state machine
//! - **Hooks**: [`hooks::Registry`] and the [`hooks::LoggingHook`]
//! - **Controllers**: [`controllers::ControllerRegistry`]
//! - **History**: [`history::MemoryHistory`]
//! - **Configuration**: [`config::RouterConfig`] from JSON or TOML

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use navroute_core;

// Modules
pub mod compiler;
pub mod config;
pub mod controllers;
pub mod dispatch;
pub mod history;
pub mod hooks;
pub mod matcher;
pub mod testing;
pub mod token;
