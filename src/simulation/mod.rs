//! Destruction and reassembly simulation

pub mod config;
pub mod matcher;
pub mod physics;
pub mod rebuild;
pub mod observer;
pub mod engine;

pub use config::{EngineConfig, PhysicsConfig, RebuildConfig};
pub use matcher::{Assignment, match_colors, release_delay};
pub use rebuild::RebuildPlan;
pub use observer::{CallbackObserver, EngineObserver, EngineState};
pub use engine::Engine;
