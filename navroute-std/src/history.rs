//! # In-memory history
//!
//! [`MemoryHistory`] keeps a list of visited tokens and a cursor, the way a
//! browser tab does. Every change of the current token (a push, `back`,
//! `forward`) is broadcast to all subscribers of [`History::changes`].

use futures::{
    StreamExt,
    channel::mpsc::{self, UnboundedSender},
    stream::BoxStream,
};
use navroute_core::{History, Navigation};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct State {
    entries: Vec<String>,
    index: usize,
    initialized: bool,
    closed: bool,
    subscribers: Vec<UnboundedSender<Navigation>>,
}

impl State {
    fn current(&self) -> &str {
        &self.entries[self.index]
    }

    fn broadcast(&mut self) {
        let navigation = Navigation::new(self.current());
        self.subscribers
            .retain(|tx| tx.unbounded_send(navigation.clone()).is_ok());
    }
}

/// A [`History`] kept entirely in memory.
#[derive(Debug)]
pub struct MemoryHistory {
    state: Mutex<State>,
}

impl MemoryHistory {
    /// A history positioned at the root token `""`.
    pub fn new() -> Self {
        Self::with_token("")
    }

    /// A history whose first entry is `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(State {
                entries: vec![token.into()],
                index: 0,
                initialized: false,
                closed: false,
                subscribers: Vec::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Moves one entry back and notifies. Returns `false` at the oldest entry.
    pub fn back(&self) -> bool {
        let mut state = self.state();
        if state.index == 0 {
            return false;
        }
        state.index -= 1;
        state.broadcast();
        true
    }

    /// Moves one entry forward and notifies. Returns `false` at the newest entry.
    pub fn forward(&self) -> bool {
        let mut state = self.state();
        if state.index + 1 >= state.entries.len() {
            return false;
        }
        state.index += 1;
        state.broadcast();
        true
    }

    /// Every entry, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.state().entries.clone()
    }

    /// Index of the current entry in [`entries`](Self::entries).
    pub fn position(&self) -> usize {
        self.state().index
    }

    /// Whether [`History::init`] ran.
    pub fn is_initialized(&self) -> bool {
        self.state().initialized
    }

    /// Ends every change stream. Later navigation is still recorded but no
    /// longer broadcast.
    pub fn close(&self) {
        let mut state = self.state();
        state.closed = true;
        state.subscribers.clear();
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl History for MemoryHistory {
    fn init(&self) {
        let mut state = self.state();
        if state.initialized {
            tracing::warn!("history initialized twice");
        }
        state.initialized = true;
    }

    fn token(&self) -> String {
        self.state().current().to_owned()
    }

    fn add(&self, token: &str) {
        let mut state = self.state();
        let next = state.index + 1;
        state.entries.truncate(next);
        state.entries.push(token.to_owned());
        state.index = next;
        state.broadcast();
    }

    fn changes(&self) -> BoxStream<'static, Navigation> {
        let (tx, rx) = mpsc::unbounded();
        let mut state = self.state();
        if !state.closed {
            state.subscribers.push(tx);
        }
        rx.boxed()
    }
}
