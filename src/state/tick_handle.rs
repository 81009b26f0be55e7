//! Repeating one-second tick source

use std::{future, pin::Pin, time::Duration};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tokio::time::{sleep_until, Instant, Sleep};

use crate::error::TimerError;

/// Fixed tick cadence
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// When the first tick fires after a countdown starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FirstTick {
    /// One full period after start
    #[default]
    Delayed,
    /// Right away, then every period
    Immediate,
}

/// Live repeating tick. Owned by exactly one engine.
///
/// Mirrors a platform timer source: suspend and resume must alternate, a
/// suspended source refuses to be cancelled, and resuming keeps whatever was
/// left of the period that was interrupted.
#[derive(Debug)]
pub struct TickHandle {
    sleep: Pin<Box<Sleep>>,
    /// Time left until the next tick, captured at suspension
    suspended: Option<Duration>,
}

impl TickHandle {
    /// Schedule a new repeating tick
    pub fn schedule(first_tick: FirstTick) -> Self {
        let start = match first_tick {
            FirstTick::Delayed => Instant::now() + TICK_PERIOD,
            FirstTick::Immediate => Instant::now(),
        };

        Self {
            sleep: Box::pin(sleep_until(start)),
            suspended: None,
        }
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended.is_some()
    }

    /// When the next tick is due, if not suspended
    pub fn deadline(&self) -> Option<Instant> {
        match self.suspended {
            Some(_) => None,
            None => Some(self.sleep.deadline()),
        }
    }

    pub fn suspend(&mut self) -> Result<(), TimerError> {
        if self.suspended.is_some() {
            return Err(TimerError::HandleState("suspend called on a suspended handle"));
        }
        let left = self.sleep.deadline().saturating_duration_since(Instant::now());
        self.suspended = Some(left);
        Ok(())
    }

    /// Resume ticking; the next tick fires after the part of the period that
    /// was still outstanding at suspension
    pub fn resume(&mut self) -> Result<(), TimerError> {
        let Some(left) = self.suspended.take() else {
            return Err(TimerError::HandleState("resume called on a running handle"));
        };
        self.sleep.as_mut().reset(Instant::now() + left);
        Ok(())
    }

    /// Stop the tick for good
    pub fn cancel(self) -> Result<(), TimerError> {
        if self.suspended.is_some() {
            return Err(TimerError::HandleState("cancel called on a suspended handle"));
        }
        Ok(())
    }

    /// Wait for the next tick and return the instant it was due.
    /// Never completes while suspended.
    ///
    /// Cancel safe: dropping the future before it completes loses no tick.
    /// A late tick pushes the following one a full period past the moment it
    /// actually fired, so ticks never burst.
    pub async fn tick(&mut self) -> Instant {
        if self.suspended.is_some() {
            return future::pending().await;
        }
        self.sleep.as_mut().await;

        let due = self.sleep.deadline();
        let now = Instant::now();
        let next = if due + TICK_PERIOD > now {
            due + TICK_PERIOD
        } else {
            now + TICK_PERIOD
        };
        self.sleep.as_mut().reset(next);
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    #[tokio::test(start_paused = true)]
    async fn delayed_first_tick_waits_one_period() {
        let start = Instant::now();
        let mut handle = TickHandle::schedule(FirstTick::Delayed);

        let first = handle.tick().await;
        assert_eq!(first - start, TICK_PERIOD);
        let second = handle.tick().await;
        assert_eq!(second - start, TICK_PERIOD * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_first_tick_fires_at_start() {
        let start = Instant::now();
        let mut handle = TickHandle::schedule(FirstTick::Immediate);

        assert_eq!(handle.tick().await, start);
        assert_eq!(handle.tick().await - start, TICK_PERIOD);
    }

    #[tokio::test(start_paused = true)]
    async fn suspended_handle_never_ticks() {
        let mut handle = TickHandle::schedule(FirstTick::Delayed);
        handle.suspend().unwrap();

        let waited = timeout(Duration::from_secs(60), handle.tick()).await;
        assert!(waited.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn resume_keeps_the_rest_of_the_period() {
        let mut handle = TickHandle::schedule(FirstTick::Delayed);
        tokio::time::advance(Duration::from_millis(400)).await;
        handle.suspend().unwrap();
        tokio::time::advance(Duration::from_millis(5_000)).await;

        handle.resume().unwrap();
        let resumed_at = Instant::now();
        assert_eq!(handle.tick().await - resumed_at, Duration::from_millis(600));
        assert_eq!(handle.tick().await - resumed_at, Duration::from_millis(1_600));
    }

    #[tokio::test(start_paused = true)]
    async fn instant_pause_and_resume_leaves_schedule_alone() {
        let start = Instant::now();
        let mut handle = TickHandle::schedule(FirstTick::Delayed);

        for _ in 0..3 {
            tokio::time::advance(Duration::from_millis(900)).await;
            handle.suspend().unwrap();
            assert_eq!(handle.deadline(), None);
            handle.resume().unwrap();
            let due = handle.tick().await;
            assert_eq!(handle.deadline(), Some(due + TICK_PERIOD));
        }
        assert_eq!(Instant::now() - start, Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn late_tick_does_not_burst() {
        let start = Instant::now();
        let mut handle = TickHandle::schedule(FirstTick::Delayed);
        tokio::time::advance(Duration::from_millis(3_500)).await;

        assert_eq!(handle.tick().await - start, TICK_PERIOD);
        assert_eq!(handle.deadline(), Some(start + Duration::from_millis(4_500)));
    }

    #[tokio::test(start_paused = true)]
    async fn suspend_and_resume_must_alternate() {
        let mut handle = TickHandle::schedule(FirstTick::Delayed);
        assert!(matches!(handle.resume(), Err(TimerError::HandleState(_))));

        handle.suspend().unwrap();
        assert!(matches!(handle.suspend(), Err(TimerError::HandleState(_))));
        assert!(handle.is_suspended());
    }

    #[tokio::test(start_paused = true)]
    async fn suspended_handle_refuses_cancel() {
        let mut handle = TickHandle::schedule(FirstTick::Delayed);
        handle.suspend().unwrap();
        assert!(handle.cancel().is_err());

        let mut handle = TickHandle::schedule(FirstTick::Delayed);
        handle.suspend().unwrap();
        handle.resume().unwrap();
        assert!(handle.cancel().is_ok());
    }
}
