//! Terminal presentation module
//!
//! This module renders timer events and turns typed commands into timer
//! operations. It only talks to the timer through a [`TimerController`].
//!
//! [`TimerController`]: crate::tasks::TimerController

pub mod console;
pub mod display;
pub mod input;

// Re-export main types
pub use console::{render_events, run, Console, Outcome};
pub use display::Display;
pub use input::{parse_command, UserCommand};
