//! Countdown state machine

use chrono::Utc;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use super::{FirstTick, TickHandle, TickUpdate, TimerEvent, TimerSnapshot, TimerStatus};
use crate::error::TimerError;

/// Capacity of the event channel; a slow subscriber lags rather than blocks
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Engine construction options
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfig {
    pub first_tick: FirstTick,
}

/// Owns the countdown state and the tick handle.
///
/// Every method must be called from the single task that owns the engine;
/// see [`crate::tasks::timer_task`].
#[derive(Debug)]
pub struct TimerEngine {
    config: EngineConfig,
    status: TimerStatus,
    total_duration_seconds: i64,
    remaining_seconds: i64,
    tick: Option<TickHandle>,
    started_at: Option<chrono::DateTime<Utc>>,
    event_tx: broadcast::Sender<TimerEvent>,
    snapshot_tx: watch::Sender<TimerSnapshot>,
}

impl TimerEngine {
    /// Create an idle engine with no tick handle
    pub fn new(config: EngineConfig) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (snapshot_tx, _) = watch::channel(TimerSnapshot::idle());

        Self {
            config,
            status: TimerStatus::Idle,
            total_duration_seconds: 0,
            remaining_seconds: 0,
            tick: None,
            started_at: None,
            event_tx,
            snapshot_tx,
        }
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn total_duration_seconds(&self) -> i64 {
        self.total_duration_seconds
    }

    pub fn remaining_seconds(&self) -> i64 {
        self.remaining_seconds
    }

    pub fn has_tick_handle(&self) -> bool {
        self.tick.is_some()
    }

    /// Sender side of the event channel, for handing out new subscriptions
    pub fn event_sender(&self) -> broadcast::Sender<TimerEvent> {
        self.event_tx.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.event_tx.subscribe()
    }

    pub fn watch(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            status: self.status,
            total_duration_seconds: self.total_duration_seconds,
            remaining_seconds: self.remaining_seconds,
            started_at: self.started_at,
            updated_at: Utc::now(),
        }
    }

    /// Begin a countdown of `duration_seconds`. Only valid while idle.
    pub fn start(&mut self, duration_seconds: u64) -> Result<TimerSnapshot, TimerError> {
        if self.status != TimerStatus::Idle {
            return Err(TimerError::invalid_state("start", self.status));
        }
        let duration = i64::try_from(duration_seconds)
            .ok()
            .filter(|d| *d >= 1)
            .ok_or_else(|| TimerError::InvalidDuration(duration_seconds.to_string()))?;

        self.total_duration_seconds = duration;
        self.remaining_seconds = duration;
        self.status = TimerStatus::Running;
        self.started_at = Some(Utc::now());

        // Every path back to idle releases the handle
        debug_assert!(self.tick.is_none(), "tick handle survived into idle");
        if self.tick.is_none() {
            self.tick = Some(TickHandle::schedule(self.config.first_tick));
        }

        info!("Countdown started for {}s", duration);
        self.emit(TimerEvent::Started {
            total_duration_seconds: duration,
        });
        Ok(self.publish())
    }

    /// Pause a running countdown or resume a paused one
    pub fn toggle(&mut self) -> Result<TimerSnapshot, TimerError> {
        match self.status {
            TimerStatus::Idle => Err(TimerError::invalid_state("toggle", self.status)),
            TimerStatus::Running => {
                self.handle_mut()?.suspend()?;
                self.status = TimerStatus::Paused;
                info!("Countdown paused at {}s remaining", self.remaining_seconds);
                self.emit(TimerEvent::Paused {
                    remaining_seconds: self.remaining_seconds,
                });
                Ok(self.publish())
            }
            TimerStatus::Paused => {
                self.handle_mut()?.resume()?;
                self.status = TimerStatus::Running;
                info!("Countdown resumed at {}s remaining", self.remaining_seconds);
                self.emit(TimerEvent::Resumed {
                    remaining_seconds: self.remaining_seconds,
                });
                Ok(self.publish())
            }
        }
    }

    /// Stop the countdown without a completion notification.
    /// Cancelling while idle does nothing.
    pub fn cancel(&mut self) -> Result<TimerSnapshot, TimerError> {
        if self.status == TimerStatus::Idle {
            debug!("Cancel requested while idle, nothing to do");
            return Ok(self.snapshot());
        }

        let remaining_seconds = self.remaining_seconds;
        self.release()?;
        info!("Countdown cancelled with {}s remaining", remaining_seconds);
        self.emit(TimerEvent::Cancelled { remaining_seconds });
        Ok(self.publish())
    }

    /// Wait until the tick handle fires. Pending forever unless running.
    pub async fn next_tick(&mut self) {
        match self.tick.as_mut() {
            Some(handle) if self.status == TimerStatus::Running => {
                handle.tick().await;
            }
            _ => std::future::pending::<()>().await,
        }
    }

    /// Tick callback: decrement, report, and finish once the counter runs out.
    ///
    /// The decrement happens before the zero check, so a countdown started at
    /// `d` reports `d - 1, ..., 0` and finishes on the tick that reads 0. The
    /// arithmetic stays signed and unclamped: an engine that somehow ticked
    /// with nothing left would report `-1` rather than hide it.
    pub fn on_tick(&mut self) -> Option<TickUpdate> {
        if self.status != TimerStatus::Running {
            debug!("Ignoring tick while {}", self.status);
            return None;
        }

        self.remaining_seconds -= 1;
        let update = TickUpdate::compute(self.remaining_seconds, self.total_duration_seconds);
        debug!("Tick {} ({:.3})", update.clock_text(), update.progress);
        self.emit(TimerEvent::Tick(update));

        if self.remaining_seconds <= 0 {
            if let Err(e) = self.release() {
                warn!("Failed to release tick handle on finish: {}", e);
            }
            info!("Countdown finished after {}s", self.total_duration_seconds);
            self.emit(TimerEvent::Finished {
                total_duration_seconds: self.total_duration_seconds,
            });
        }

        self.publish();
        Some(update)
    }

    /// Return to idle, resuming a suspended handle before cancelling it
    fn release(&mut self) -> Result<(), TimerError> {
        let was_paused = self.status == TimerStatus::Paused;
        self.status = TimerStatus::Idle;
        self.started_at = None;

        if let Some(mut handle) = self.tick.take() {
            if was_paused {
                handle.resume()?;
            }
            handle.cancel()?;
        }
        Ok(())
    }

    fn handle_mut(&mut self) -> Result<&mut TickHandle, TimerError> {
        self.tick
            .as_mut()
            .ok_or(TimerError::HandleState("no tick handle while active"))
    }

    fn emit(&self, event: TimerEvent) {
        // No subscribers is fine; the presentation layer may not be attached yet
        let _ = self.event_tx.send(event);
    }

    fn publish(&self) -> TimerSnapshot {
        let snapshot = self.snapshot();
        self.snapshot_tx.send_replace(snapshot.clone());
        snapshot
    }
}

impl Drop for TimerEngine {
    fn drop(&mut self) {
        if self.tick.is_some() {
            debug!("Engine dropped while {}, releasing tick handle", self.status);
            if let Err(e) = self.release() {
                warn!("Failed to release tick handle at teardown: {}", e);
            }
        }
    }
}
