//! Countdown background task and the controller that drives it

use tokio::{
    sync::{broadcast, mpsc, oneshot, watch},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    error::TimerError,
    state::{EngineConfig, TimerEngine, TimerEvent, TimerSnapshot},
};

type Reply = oneshot::Sender<Result<TimerSnapshot, TimerError>>;

/// Requests sent from a controller to the timer task
#[derive(Debug)]
pub enum TimerCommand {
    Start { duration_seconds: u64, reply: Reply },
    Toggle { reply: Reply },
    Cancel { reply: Reply },
    Shutdown,
}

/// Background task that owns the engine.
///
/// Commands and ticks are handled one at a time on this task, so the engine
/// is never shared. Commands win over a tick that is ready at the same time,
/// and a command's reply is only sent once its transition is complete.
pub async fn timer_task(mut engine: TimerEngine, mut commands: mpsc::Receiver<TimerCommand>) {
    info!("Starting timer task");

    loop {
        tokio::select! {
            biased;

            command = commands.recv() => {
                let Some(command) = command else {
                    debug!("All controllers dropped");
                    break;
                };
                match command {
                    TimerCommand::Start { duration_seconds, reply } => {
                        respond(reply, engine.start(duration_seconds));
                    }
                    TimerCommand::Toggle { reply } => respond(reply, engine.toggle()),
                    TimerCommand::Cancel { reply } => respond(reply, engine.cancel()),
                    TimerCommand::Shutdown => {
                        debug!("Shutdown requested");
                        break;
                    }
                }
            }

            _ = engine.next_tick() => {
                engine.on_tick();
            }
        }
    }

    if engine.status().is_active() {
        if let Err(e) = engine.cancel() {
            warn!("Failed to cancel countdown during shutdown: {}", e);
        }
    }
    info!("Timer task stopped");
}

fn respond(reply: Reply, result: Result<TimerSnapshot, TimerError>) {
    if let Err(e) = &result {
        warn!("Timer command rejected: {}", e);
    }
    if reply.send(result).is_err() {
        debug!("Caller went away before the reply");
    }
}

/// Cloneable handle for the presentation layer.
///
/// Holds no engine state itself; every operation is forwarded to the timer
/// task, which stops once the last controller is dropped.
#[derive(Debug, Clone)]
pub struct TimerController {
    commands: mpsc::Sender<TimerCommand>,
    event_tx: broadcast::Sender<TimerEvent>,
    snapshot_rx: watch::Receiver<TimerSnapshot>,
}

impl TimerController {
    /// Spawn the timer task on the current runtime
    pub fn spawn(config: EngineConfig) -> (Self, JoinHandle<()>) {
        let engine = TimerEngine::new(config);
        let (commands, commands_rx) = mpsc::channel(16);

        let controller = Self {
            commands,
            event_tx: engine.event_sender(),
            snapshot_rx: engine.watch(),
        };
        let handle = tokio::spawn(timer_task(engine, commands_rx));

        (controller, handle)
    }

    pub async fn start(&self, duration_seconds: u64) -> Result<TimerSnapshot, TimerError> {
        self.request(|reply| TimerCommand::Start {
            duration_seconds,
            reply,
        })
        .await
    }

    pub async fn toggle(&self) -> Result<TimerSnapshot, TimerError> {
        self.request(|reply| TimerCommand::Toggle { reply }).await
    }

    /// Once this resolves no further tick or finish event is emitted
    pub async fn cancel(&self) -> Result<TimerSnapshot, TimerError> {
        self.request(|reply| TimerCommand::Cancel { reply }).await
    }

    /// Stop the timer task, cancelling any countdown in progress
    pub async fn shutdown(&self) -> Result<(), TimerError> {
        self.commands
            .send(TimerCommand::Shutdown)
            .await
            .map_err(|_| TimerError::ControllerClosed)
    }

    /// Latest published state
    pub fn snapshot(&self) -> TimerSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.event_tx.subscribe()
    }

    pub fn watch(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshot_rx.clone()
    }

    async fn request<F>(&self, command: F) -> Result<TimerSnapshot, TimerError>
    where
        F: FnOnce(Reply) -> TimerCommand,
    {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| TimerError::ControllerClosed)?;
        response.await.map_err(|_| TimerError::ControllerClosed)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TimerStatus;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test(start_paused = true)]
    async fn commands_round_trip_through_task() {
        let (controller, _task) = TimerController::spawn(EngineConfig::default());

        let started = controller.start(5).await.unwrap();
        assert_eq!(started.status, TimerStatus::Running);
        assert_eq!(controller.snapshot().remaining_seconds, 5);

        assert_eq!(controller.toggle().await.unwrap().status, TimerStatus::Paused);
        assert_eq!(controller.toggle().await.unwrap().status, TimerStatus::Running);
        assert_eq!(controller.cancel().await.unwrap().status, TimerStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_command_reports_invalid_state() {
        let (controller, _task) = TimerController::spawn(EngineConfig::default());

        let err = controller.toggle().await.unwrap_err();
        assert_eq!(err, TimerError::invalid_state("toggle", TimerStatus::Idle));

        controller.start(3).await.unwrap();
        let err = controller.start(3).await.unwrap_err();
        assert_eq!(err, TimerError::invalid_state("start", TimerStatus::Running));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_task_and_closes_controller() {
        let (controller, task) = TimerController::spawn(EngineConfig::default());
        controller.start(30).await.unwrap();

        controller.shutdown().await.unwrap();
        task.await.unwrap();

        assert_eq!(controller.snapshot().status, TimerStatus::Idle);
        assert_eq!(controller.start(1).await, Err(TimerError::ControllerClosed));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_last_controller_ends_task() {
        let (controller, task) = TimerController::spawn(EngineConfig::default());
        let mut events = controller.subscribe();
        controller.start(30).await.unwrap();

        drop(controller);
        timeout(Duration::from_secs(5), task).await.unwrap().unwrap();

        let mut saw_tick = false;
        while let Ok(event) = events.try_recv() {
            saw_tick |= matches!(event, TimerEvent::Tick(_));
        }
        assert!(!saw_tick);
    }
}
