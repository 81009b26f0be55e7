//! Interactive terminal front end for the timer

use std::{io::BufRead, thread};

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use super::{
    display::Display,
    input::{parse_command, UserCommand, HELP},
};
use crate::{
    config::Config,
    error::TimerError,
    state::{TimerEvent, TimerSnapshot, TimerStatus},
    tasks::TimerController,
    utils::{format_hms, shutdown_signal},
};

/// Result of handling one user command
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub message: Option<String>,
    pub quit: bool,
}

impl Outcome {
    fn say(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            quit: false,
        }
    }
}

/// Maps user actions onto timer operations.
///
/// Controls follow the timer status the way the buttons of a timer screen
/// are enabled and disabled, so the engine never sees a call it would reject:
/// the toggle button starts an idle timer, cancel does nothing while idle,
/// and the duration cannot change during a countdown.
#[derive(Debug)]
pub struct Console {
    controller: TimerController,
    selected_seconds: u64,
}

impl Console {
    pub fn new(controller: TimerController, selected_seconds: u64) -> Self {
        Self {
            controller,
            selected_seconds,
        }
    }

    pub fn selected_seconds(&self) -> u64 {
        self.selected_seconds
    }

    pub async fn handle(&mut self, command: UserCommand) -> Outcome {
        let snapshot = self.controller.snapshot();

        match command {
            UserCommand::Toggle if !snapshot.is_active() => self.start(None).await,
            UserCommand::Toggle => self.toggle_or_start().await,
            UserCommand::Start(_) if snapshot.is_active() => {
                Outcome::say("A countdown is already in progress")
            }
            UserCommand::Start(duration) => self.start(duration).await,
            UserCommand::Cancel if !snapshot.is_active() => Outcome::say("Nothing to cancel"),
            UserCommand::Cancel => self.report(self.controller.cancel().await),
            UserCommand::Select(_) if snapshot.is_active() => {
                Outcome::say("Cancel the countdown before choosing a new duration")
            }
            UserCommand::Select(seconds) => {
                self.selected_seconds = seconds;
                Outcome::say(format!("Duration set to {}", format_hms(seconds)))
            }
            UserCommand::Status => Outcome::say(self.status_line(&snapshot)),
            UserCommand::Help => Outcome::say(HELP),
            UserCommand::Quit => Outcome {
                message: None,
                quit: true,
            },
        }
    }

    /// The countdown may finish between reading the snapshot and the toggle
    /// reaching the engine; the button then acts as start, as it would if
    /// pressed a moment later
    async fn toggle_or_start(&mut self) -> Outcome {
        match self.controller.toggle().await {
            Err(TimerError::InvalidState {
                status: TimerStatus::Idle,
                ..
            }) => self.start(None).await,
            result => self.report(result),
        }
    }

    async fn start(&mut self, duration: Option<u64>) -> Outcome {
        if let Some(seconds) = duration {
            self.selected_seconds = seconds;
        }
        self.report(self.controller.start(self.selected_seconds).await)
    }

    /// Successful transitions are shown by the event renderer
    fn report(&self, result: Result<TimerSnapshot, TimerError>) -> Outcome {
        match result {
            Ok(_) => Outcome::default(),
            Err(e) => Outcome::say(format!("Error: {}", e)),
        }
    }

    fn status_line(&self, snapshot: &TimerSnapshot) -> String {
        match snapshot.status {
            TimerStatus::Idle => format!(
                "idle, duration {} selected",
                format_hms(self.selected_seconds)
            ),
            status => format!(
                "{}, {} of {} remaining",
                status,
                format_hms(snapshot.remaining_seconds.max(0) as u64),
                format_hms(snapshot.total_duration_seconds.max(0) as u64),
            ),
        }
    }
}

/// Print every timer event until the event channel closes
pub async fn render_events(mut events: broadcast::Receiver<TimerEvent>, mut display: Display) {
    loop {
        match events.recv().await {
            Ok(event) => {
                if let Some(line) = display.render(&event) {
                    println!("{}", line);
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Display fell behind, skipped {} events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    debug!("Event renderer stopped");
}

/// Read stdin on a plain thread so a pending read never holds up runtime
/// shutdown
fn spawn_input_reader() -> mpsc::Receiver<std::io::Result<String>> {
    let (tx, rx) = mpsc::channel(16);
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Run the console until the user quits, input ends with no countdown in
/// progress, or a shutdown signal arrives
pub async fn run(controller: TimerController, config: &Config) -> anyhow::Result<()> {
    let display = Display::new(config.format, !config.no_bell);
    let renderer = tokio::spawn(render_events(controller.subscribe(), display));
    let mut console = Console::new(controller.clone(), config.duration);
    let mut snapshots = controller.watch();

    if config.autostart {
        print_outcome(console.handle(UserCommand::Start(None)).await);
    } else {
        eprintln!(
            "Duration {} selected. Press enter to start, 'help' for commands.",
            format_hms(console.selected_seconds())
        );
    }

    let mut input = spawn_input_reader();
    let mut input_open = true;
    let shutdown = async {
        match shutdown_signal().await {
            Ok(signal) => signal,
            Err(e) => {
                warn!("Signal handling unavailable: {}", e);
                std::future::pending().await
            }
        }
    };
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = input.recv(), if input_open => match line {
                Some(Ok(line)) => match parse_command(&line) {
                    Ok(command) => {
                        let outcome = console.handle(command).await;
                        let quit = outcome.quit;
                        print_outcome(outcome);
                        if quit {
                            break;
                        }
                    }
                    Err(e) => eprintln!("{}", e),
                },
                Some(Err(e)) => {
                    warn!("Failed to read input: {}", e);
                    input_open = false;
                }
                None => {
                    debug!("Input closed");
                    input_open = false;
                }
            },

            // With input gone, stay until the countdown is over
            changed = snapshots.changed(), if !input_open => {
                if changed.is_err() {
                    break;
                }
            }

            signal = &mut shutdown => {
                info!("Shutting down on signal {}", signal);
                break;
            }
        }

        if !input_open && !snapshots.borrow().is_active() {
            break;
        }
    }

    if let Err(e) = controller.shutdown().await {
        debug!("Timer task already stopped: {}", e);
    }
    drop(console);
    drop(controller);
    renderer.await?;
    Ok(())
}

fn print_outcome(outcome: Outcome) {
    if let Some(message) = outcome.message {
        eprintln!("{}", message);
    }
}
