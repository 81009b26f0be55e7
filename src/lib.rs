//! Countdown Timer - a single countdown with pause, resume and cancel
//!
//! This library provides the countdown state machine, the background task
//! that ticks it once per second, and a terminal front end that renders its
//! notifications.

pub mod config;
pub mod error;
pub mod state;
pub mod tasks;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::TimerError;
pub use state::{TimerEngine, TimerEvent, TimerSnapshot, TimerStatus};
pub use tasks::TimerController;
