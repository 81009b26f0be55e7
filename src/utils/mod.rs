//! Utility functions module
//!
//! Duration parsing shared by the CLI and the console, and signal handling.

pub mod duration;
pub mod signals;

// Re-export main functions
pub use duration::{format_hms, parse_duration};
pub use signals::shutdown_signal;
