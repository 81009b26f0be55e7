//! Notifications emitted by the timer engine

use serde::{Deserialize, Serialize};

/// Per-tick countdown values handed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickUpdate {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    /// `remaining / total`, 1.0 at start and 0.0 on the final tick
    pub progress: f64,
    pub remaining_seconds: i64,
    pub total_duration_seconds: i64,
}

impl TickUpdate {
    /// Split the remaining seconds with truncating integer division
    pub fn compute(remaining_seconds: i64, total_duration_seconds: i64) -> Self {
        Self {
            hours: remaining_seconds / 3600,
            minutes: (remaining_seconds % 3600) / 60,
            seconds: remaining_seconds % 60,
            progress: remaining_seconds as f64 / total_duration_seconds as f64,
            remaining_seconds,
            total_duration_seconds,
        }
    }

    /// Zero-padded `HH:MM:SS`
    pub fn clock_text(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// Everything the engine reports to its subscribers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimerEvent {
    Started { total_duration_seconds: i64 },
    Tick(TickUpdate),
    Paused { remaining_seconds: i64 },
    Resumed { remaining_seconds: i64 },
    Cancelled { remaining_seconds: i64 },
    /// The countdown reached zero; the collaborator should play its alert
    Finished { total_duration_seconds: i64 },
}

impl TimerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TimerEvent::Started { .. } => "started",
            TimerEvent::Tick(_) => "tick",
            TimerEvent::Paused { .. } => "paused",
            TimerEvent::Resumed { .. } => "resumed",
            TimerEvent::Cancelled { .. } => "cancelled",
            TimerEvent::Finished { .. } => "finished",
        }
    }
}
