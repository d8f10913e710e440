//! Rotation CLI commands: the daemon, manual ticks and enable/disable.

use std::io::{self, BufRead};
use std::sync::Arc;

use super::Context;
use crate::app::Rotator;
use crate::cli::output::{print_history, print_outcome};
use crate::config::{ConfigKey, watch_config_file};
use crate::error::FluidError;
use crate::wallpaper::TickOutcome;

/// A line read by the daemon from stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaemonInput {
    /// Change the wallpaper now.
    Now,
    /// Print the next scheduled change.
    Next,
    /// Print the history.
    History,
    /// Re-apply a history entry.
    Apply(usize),
    /// Stop the daemon.
    Quit,
    /// Print the available inputs.
    Help,
}

impl DaemonInput {
    /// Parses one stdin line. Blank lines yield `None`.
    ///
    /// # Errors
    ///
    /// Returns a message for unknown input.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(None);
        };

        let input = match command.to_lowercase().as_str() {
            "now" | "change" => Self::Now,
            "next" => Self::Next,
            "history" => Self::History,
            "apply" => {
                let index = words
                    .next()
                    .and_then(|word| word.parse::<usize>().ok())
                    .ok_or_else(|| "usage: apply <history index>".to_string())?;
                Self::Apply(index)
            }
            "quit" | "exit" => Self::Quit,
            "help" | "?" => Self::Help,
            other => return Err(format!("unknown command '{other}', try 'help'")),
        };

        Ok(Some(input))
    }
}

const DAEMON_HELP: &str = "commands: now, next, history, apply <n>, quit";

/// Runs the rotation daemon until `quit` is read or the process is killed.
///
/// # Errors
///
/// Returns an error if stdin cannot be read.
pub fn run_daemon(ctx: &Context) -> Result<(), FluidError> {
    let rotator = Arc::new(Rotator::open(ctx.data_dir()));

    let watched = Arc::downgrade(&rotator);
    let _watcher = watch_config_file(rotator.config().path(), move || {
        if let Some(rotator) = watched.upgrade() {
            rotator.apply_config();
        }
    });

    rotator.apply_config();
    tracing::info!(
        config = %rotator.config().path().display(),
        next = %rotator.next_tick_timestamp(),
        "FluidBG started"
    );

    let mut quit = false;
    for line in io::stdin().lock().lines() {
        match DaemonInput::parse(&line?) {
            Ok(Some(DaemonInput::Quit)) => {
                quit = true;
                break;
            }
            Ok(Some(input)) => handle_input(&rotator, &input),
            Ok(None) => {}
            Err(message) => eprintln!("{message}"),
        }
    }

    // Stdin closed (detached daemon): keep rotating until the process is killed.
    if !quit {
        loop {
            std::thread::park();
        }
    }

    rotator.shutdown();
    tracing::info!("FluidBG stopped");
    Ok(())
}

fn handle_input(rotator: &Rotator, input: &DaemonInput) {
    match input {
        DaemonInput::Now => print_outcome(&rotator.change_now()),
        DaemonInput::Next => println!("Next change: {}", rotator.next_tick_timestamp()),
        DaemonInput::History => print_history(&rotator.history()),
        DaemonInput::Apply(index) => match rotator.apply_history(*index) {
            Ok(entry) => println!("Applied {}", entry.display_text),
            Err(err) => eprintln!("{err}"),
        },
        DaemonInput::Help => println!("{DAEMON_HELP}"),
        DaemonInput::Quit => {}
    }
}

/// Changes the wallpaper once and prints the outcome.
///
/// # Errors
///
/// Returns an error if the wallpaper could not be applied.
pub fn change_now(ctx: &Context) -> Result<(), FluidError> {
    let rotator = Rotator::open(ctx.data_dir());
    let outcome = rotator.change_now();
    print_outcome(&outcome);

    match outcome {
        TickOutcome::SetFailed { error, .. } => Err(error.into()),
        _ => Ok(()),
    }
}

/// Persists `enabled`; a running daemon picks the change up.
///
/// # Errors
///
/// This function currently always succeeds.
#[allow(clippy::unnecessary_wraps)] // Consistent return type with other CLI functions
pub fn set_enabled(ctx: &Context, enabled: bool) -> Result<(), FluidError> {
    ctx.store().set(ConfigKey::Enabled, enabled);
    println!("Rotation {}", if enabled { "enabled" } else { "disabled" });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_daemon_input() {
        assert_eq!(DaemonInput::parse("now"), Ok(Some(DaemonInput::Now)));
        assert_eq!(DaemonInput::parse("  NEXT "), Ok(Some(DaemonInput::Next)));
        assert_eq!(DaemonInput::parse("history"), Ok(Some(DaemonInput::History)));
        assert_eq!(DaemonInput::parse("apply 3"), Ok(Some(DaemonInput::Apply(3))));
        assert_eq!(DaemonInput::parse("exit"), Ok(Some(DaemonInput::Quit)));
        assert_eq!(DaemonInput::parse(""), Ok(None));
    }

    #[test]
    fn test_parse_daemon_input_errors() {
        assert!(DaemonInput::parse("apply").is_err());
        assert!(DaemonInput::parse("apply x").is_err());
        assert!(DaemonInput::parse("dance").unwrap_err().contains("dance"));
    }
}
