//! Timer state module
//!
//! This module contains the countdown state machine, its tick source and the
//! notifications it publishes.

pub mod engine;
pub mod events;
pub mod tick_handle;
pub mod timer_state;

// Re-export main types
pub use engine::{EngineConfig, TimerEngine};
pub use events::{TickUpdate, TimerEvent};
pub use tick_handle::{FirstTick, TickHandle, TICK_PERIOD};
pub use timer_state::{TimerSnapshot, TimerStatus};
