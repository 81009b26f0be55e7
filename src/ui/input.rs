//! Console command parsing

use crate::utils::parse_duration;

/// A user action typed on the console
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Start with the given duration, or the selected one
    Start(Option<u64>),
    /// The start/pause button
    Toggle,
    Cancel,
    /// Change the selected duration
    Select(u64),
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  <enter> | t | toggle    start, pause or resume
  start [DURATION]        start a countdown
  c | cancel              cancel the countdown
  set DURATION            select the duration (SS, MM:SS or HH:MM:SS)
  s | status              show the current state
  h | help                show this help
  q | quit                exit";

/// Parse one input line
pub fn parse_command(line: &str) -> Result<UserCommand, String> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(UserCommand::Toggle);
    };
    let argument = words.next();
    if words.next().is_some() {
        return Err(format!("too many arguments in '{}'", line.trim()));
    }

    let command = match (word.to_lowercase().as_str(), argument) {
        ("t" | "toggle" | "p" | "pause", None) => UserCommand::Toggle,
        ("start", duration) => UserCommand::Start(duration.map(parse_duration).transpose()?),
        ("c" | "cancel", None) => UserCommand::Cancel,
        ("set", Some(duration)) => UserCommand::Select(parse_duration(duration)?),
        ("set", None) => return Err("set needs a duration".to_string()),
        ("s" | "status", None) => UserCommand::Status,
        ("h" | "help" | "?", None) => UserCommand::Help,
        ("q" | "quit" | "exit", None) => UserCommand::Quit,
        (other, _) => return Err(format!("unknown command '{}', try 'help'", other)),
    };
    Ok(command)
}
