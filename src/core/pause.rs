//! Pause/resume coordination
//!
//! A [`PauseCoordinator`] is a shared suppression switch plus a FIFO queue of
//! deferred dispatches. Loggers holding clones of the same coordinator pause
//! and resume together; loggers built without an explicit coordinator share
//! the process-wide one from [`PauseCoordinator::global`].

use super::error::Result;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::{Arc, OnceLock};

/// A dispatch deferred while paused, replayed on resume
pub type DeferredDispatch = Box<dyn FnOnce() -> Result<()> + Send + 'static>;

#[derive(Default)]
struct PauseState {
    paused: bool,
    queue: VecDeque<DeferredDispatch>,
}

#[derive(Clone, Default)]
pub struct PauseCoordinator {
    state: Arc<Mutex<PauseState>>,
}

static GLOBAL: OnceLock<PauseCoordinator> = OnceLock::new();

impl PauseCoordinator {
    /// A fresh coordinator, independent of every other one
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide coordinator
    pub fn global() -> Self {
        GLOBAL.get_or_init(PauseCoordinator::new).clone()
    }

    pub fn pause(&self) {
        self.state.lock().paused = true;
    }

    pub fn is_paused(&self) -> bool {
        self.state.lock().paused
    }

    pub fn queued(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Queue `dispatch` if paused; otherwise hand it back to run now
    pub fn defer_or_return(&self, dispatch: DeferredDispatch) -> Option<DeferredDispatch> {
        let mut state = self.state.lock();
        if state.paused {
            state.queue.push_back(dispatch);
            None
        } else {
            Some(dispatch)
        }
    }

    /// Unpause and replay every queued dispatch in submission order.
    ///
    /// All queued dispatches run before this returns, each exactly once. The
    /// first dispatch error is returned after the queue is drained.
    pub fn resume(&self) -> Result<()> {
        let drained: Vec<DeferredDispatch> = {
            let mut state = self.state.lock();
            state.paused = false;
            state.queue.drain(..).collect()
        };

        let mut first_error = None;
        for dispatch in drained {
            if let Err(e) = dispatch() {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Whether both handles share the same switch and queue
    pub fn same_as(&self, other: &PauseCoordinator) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl std::fmt::Debug for PauseCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("PauseCoordinator")
            .field("paused", &state.paused)
            .field("queued", &state.queue.len())
            .finish()
    }
}
