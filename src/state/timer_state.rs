//! Timer status and snapshot structures

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Countdown status. `Idle` is both the initial state and the state every
/// finished or cancelled countdown returns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerStatus {
    #[default]
    Idle,
    Running,
    Paused,
}

impl TimerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::Idle => "idle",
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
        }
    }

    /// Running or paused
    pub fn is_active(&self) -> bool {
        !matches!(self, TimerStatus::Idle)
    }
}

impl fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time copy of the engine state, published after every change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub status: TimerStatus,
    pub total_duration_seconds: i64,
    pub remaining_seconds: i64,
    pub started_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl TimerSnapshot {
    /// Create an idle snapshot
    pub fn idle() -> Self {
        Self {
            status: TimerStatus::Idle,
            total_duration_seconds: 0,
            remaining_seconds: 0,
            started_at: None,
            updated_at: Utc::now(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Remaining time as a fraction of the total, or 0 when idle
    pub fn progress(&self) -> f64 {
        if self.total_duration_seconds > 0 {
            self.remaining_seconds as f64 / self.total_duration_seconds as f64
        } else {
            0.0
        }
    }
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self::idle()
    }
}
