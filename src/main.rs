//! Countdown Timer - a single countdown with pause, resume and cancel
//!
//! This is the main entry point for the countdown-timer application.

use tracing::info;

use countdown_timer::{config::Config, tasks::TimerController, ui};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so stdout carries only the countdown display
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_timer={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting countdown-timer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: duration={}s, first_tick={:?}, format={:?}",
        config.duration, config.first_tick, config.format
    );

    let (controller, timer_task) = TimerController::spawn(config.engine_config());

    ui::run(controller, &config).await?;
    timer_task.await?;

    info!("Countdown timer stopped");
    Ok(())
}
