//! # Navigation Adapter
//!
//! The contract between the router and a browser-history-like facility. The
//! router only needs to read the current token, push new tokens, and listen
//! for changes; how history is stored or rendered is up to the implementation.

use crate::events::Navigation;
use futures::stream::BoxStream;

/// A history facility the router can drive.
pub trait History: Send + Sync + 'static {
    /// Prepares the facility. Called exactly once by the router.
    fn init(&self) {}

    /// The current token.
    fn token(&self) -> String;

    /// Pushes `token` as a new navigation step.
    ///
    /// Implementations raise a change notification for the new token.
    fn add(&self, token: &str);

    /// Subscribes to token changes (back/forward or programmatic).
    ///
    /// Changes are yielded in the order they happened. The stream ends when
    /// the facility shuts down.
    fn changes(&self) -> BoxStream<'static, Navigation>;
}
