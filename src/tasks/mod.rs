//! Background tasks module
//!
//! This module contains the countdown task and the controller used to reach it.

pub mod timer_task;

// Re-export main types
pub use timer_task::{timer_task, TimerCommand, TimerController};
