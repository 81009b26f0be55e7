//! Rendering of timer events for the terminal

use crate::{
    config::OutputFormat,
    state::{TickUpdate, TimerEvent},
    utils::format_hms,
};

const BAR_WIDTH: usize = 20;
const SPINNER_FRAMES: [char; 4] = ['|', '/', '-', '\\'];
const BELL: &str = "\x07";

/// Turns timer events into output lines.
///
/// Keeps the spinner position between ticks, the terminal counterpart of the
/// icon that turns once per second.
#[derive(Debug)]
pub struct Display {
    format: OutputFormat,
    bell: bool,
    frame: usize,
}

impl Display {
    pub fn new(format: OutputFormat, bell: bool) -> Self {
        Self {
            format,
            bell,
            frame: 0,
        }
    }

    /// Render one event. Returns `None` for events with nothing to show.
    pub fn render(&mut self, event: &TimerEvent) -> Option<String> {
        match self.format {
            OutputFormat::Json => match serde_json::to_string(event) {
                Ok(line) => Some(line),
                Err(e) => {
                    tracing::error!("Failed to serialize {} event: {}", event.name(), e);
                    None
                }
            },
            OutputFormat::Text => self.render_text(event),
        }
    }

    fn render_text(&mut self, event: &TimerEvent) -> Option<String> {
        match event {
            TimerEvent::Started {
                total_duration_seconds,
            } => {
                self.frame = 0;
                let total = u64::try_from(*total_duration_seconds).unwrap_or_default();
                Some(format!("Started {}", format_hms(total)))
            }
            TimerEvent::Tick(update) => Some(self.tick_line(update)),
            TimerEvent::Paused { .. } => Some("Paused".to_string()),
            TimerEvent::Resumed { .. } => Some("Resumed".to_string()),
            TimerEvent::Cancelled { .. } => Some("Cancelled".to_string()),
            TimerEvent::Finished { .. } => {
                let mut line = "Time's up!".to_string();
                if self.bell {
                    line.push_str(BELL);
                }
                Some(line)
            }
        }
    }

    fn tick_line(&mut self, update: &TickUpdate) -> String {
        let spinner = SPINNER_FRAMES[self.frame % SPINNER_FRAMES.len()];
        self.frame = self.frame.wrapping_add(1);

        format!(
            "{} {} [{}] {:>3}%",
            spinner,
            update.clock_text(),
            progress_bar(update.progress, BAR_WIDTH),
            (update.progress.clamp(0.0, 1.0) * 100.0).round() as u32,
        )
    }
}

/// Fixed-width bar; out-of-range fractions are clamped for drawing only
pub fn progress_bar(progress: f64, width: usize) -> String {
    let filled = (progress.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), "-".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_line_shows_clock_bar_and_percent() {
        let mut display = Display::new(OutputFormat::Text, true);
        let line = display
            .render(&TimerEvent::Tick(TickUpdate::compute(5, 10)))
            .unwrap();
        assert_eq!(line, "| 00:00:05 [##########----------]  50%");
    }

    #[test]
    fn spinner_advances_each_tick() {
        let mut display = Display::new(OutputFormat::Text, true);
        let frames: Vec<char> = (0..5)
            .map(|i| {
                let line = display
                    .render(&TimerEvent::Tick(TickUpdate::compute(10 - i, 10)))
                    .unwrap();
                line.chars().next().unwrap()
            })
            .collect();
        assert_eq!(frames, ['|', '/', '-', '\\', '|']);
    }

    #[test]
    fn finished_rings_bell_unless_disabled() {
        let finished = TimerEvent::Finished {
            total_duration_seconds: 3,
        };
        let mut loud = Display::new(OutputFormat::Text, true);
        assert!(loud.render(&finished).unwrap().ends_with(BELL));

        let mut quiet = Display::new(OutputFormat::Text, false);
        assert_eq!(quiet.render(&finished).unwrap(), "Time's up!");
    }

    #[test]
    fn json_format_emits_tagged_event() {
        let mut display = Display::new(OutputFormat::Json, true);
        let line = display
            .render(&TimerEvent::Paused {
                remaining_seconds: 7,
            })
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["event"], "paused");
        assert_eq!(value["remaining_seconds"], 7);
    }

    #[test]
    fn started_shows_full_duration() {
        let mut display = Display::new(OutputFormat::Text, true);
        let line = display
            .render(&TimerEvent::Started {
                total_duration_seconds: 3_725,
            })
            .unwrap();
        assert_eq!(line, "Started 01:02:05");
    }

    #[test]
    fn bar_clamps_out_of_range_progress() {
        assert_eq!(progress_bar(-0.1, 4), "----");
        assert_eq!(progress_bar(1.5, 4), "####");
    }
}
