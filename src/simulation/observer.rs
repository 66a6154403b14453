//! Engine notifications

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which phase the engine is in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineState {
    /// Resting shape. Initial state, and the state every rebuild returns to.
    #[default]
    Stable,
    /// Voxels are falling and bouncing
    Dismantling,
    /// Voxels are travelling to a new shape
    Rebuilding,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineState::Stable => "stable",
            EngineState::Dismantling => "dismantling",
            EngineState::Rebuilding => "rebuilding",
        };
        f.write_str(name)
    }
}

/// Receives engine notifications synchronously at the point of change.
///
/// Both methods default to doing nothing so hosts can listen to one only.
pub trait EngineObserver {
    /// Called on every state transition, and on every load
    fn on_state_changed(&mut self, _state: EngineState) {}

    /// Called after every load with the new voxel count
    fn on_count_changed(&mut self, _count: usize) {}
}

/// Observer that forwards to a pair of closures
pub struct CallbackObserver<S, C>
where
    S: FnMut(EngineState),
    C: FnMut(usize),
{
    on_state: S,
    on_count: C,
}

impl<S, C> CallbackObserver<S, C>
where
    S: FnMut(EngineState),
    C: FnMut(usize),
{
    pub fn new(on_state: S, on_count: C) -> Self {
        Self { on_state, on_count }
    }
}

impl<S, C> EngineObserver for CallbackObserver<S, C>
where
    S: FnMut(EngineState),
    C: FnMut(usize),
{
    fn on_state_changed(&mut self, state: EngineState) {
        (self.on_state)(state);
    }

    fn on_count_changed(&mut self, count: usize) {
        (self.on_count)(count);
    }
}
