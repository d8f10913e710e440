//! CLI command definitions using Clap.
//!
//! Commands are organized into domain-specific submodules:
//!
//! - `rotation` - The daemon, manual ticks and enable/disable
//! - `interval` - Rotation interval
//! - `source` - Source list editing
//! - `settings` - Remote image, fit mode and tiling
//! - `config_cmd` - Configuration file inspection
//! - `log` - Activity log

use std::io;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::config::{ConfigStore, default_data_dir};
use crate::error::FluidError;
use crate::logging::ActivityLog;
use crate::platform::path::expand;
use crate::schema;

pub mod config_cmd;
pub mod interval;
pub mod log;
pub mod rotation;
pub mod settings;
pub mod source;

pub use config_cmd::ConfigCommands;
pub use interval::IntervalCommands;
pub use log::LogCommands;
pub use settings::{ModeCommands, RemoteCommands, Switch};
pub use source::SourceCommands;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// FluidBG - rotates the desktop wallpaper on an interval.
#[derive(Parser, Debug)]
#[command(name = "fluidbg")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding `config.json` and the activity log.
    ///
    /// Defaults to the per-user data directory (for example
    /// `~/.local/share/fluidbg`).
    #[arg(long, short = 'd', global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Run the rotation daemon in the foreground.
    ///
    /// Applies the configuration, follows edits made by other `fluidbg`
    /// invocations and changes the wallpaper on every tick. Reads simple
    /// commands from stdin: now, next, history, apply <n>, quit.
    Run,

    /// Change the wallpaper once, right now.
    #[command(name = "change-now")]
    ChangeNow,

    /// Enable interval rotation.
    Enable,

    /// Disable interval rotation.
    Disable,

    /// Rotation interval commands.
    #[command(subcommand)]
    Interval(IntervalCommands),

    /// Source list commands.
    #[command(subcommand)]
    Source(SourceCommands),

    /// Remote daily image commands.
    #[command(subcommand)]
    Remote(RemoteCommands),

    /// Display fit mode commands.
    #[command(subcommand)]
    Mode(ModeCommands),

    /// Tile the image across the screen.
    Tile {
        /// Whether tiling is on.
        #[arg(value_enum)]
        state: Switch,
    },

    /// Configuration file commands.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Activity log commands.
    #[command(subcommand)]
    Log(LogCommands),

    /// Output the configuration JSON Schema.
    ///
    /// Can be redirected to a file for use with editors that support JSON
    /// Schema validation.
    Schema,

    /// Generate shell completions.
    ///
    /// Usage:
    ///   eval "$(fluidbg completions --shell zsh)"
    ///   fluidbg completions --shell fish > ~/.config/fish/completions/fluidbg.fish
    #[command(verbatim_doc_comment)]
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

/// Paths shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    data_dir: PathBuf,
}

impl Context {
    /// Creates a context rooted at `data_dir`.
    #[must_use]
    pub const fn new(data_dir: PathBuf) -> Self { Self { data_dir } }

    /// Returns the data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path { &self.data_dir }

    /// Opens the configuration store.
    #[must_use]
    pub fn store(&self) -> ConfigStore { ConfigStore::in_dir(&self.data_dir) }

    /// Returns the activity log.
    #[must_use]
    pub fn activity_log(&self) -> ActivityLog { ActivityLog::in_dir(&self.data_dir) }
}

impl Cli {
    /// Returns the data directory, honoring `--data-dir`.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .as_ref()
            .map_or_else(default_data_dir, |dir| expand(&dir.to_string_lossy()))
    }

    /// Returns whether the command is the long-running daemon.
    #[must_use]
    pub const fn is_daemon(&self) -> bool { matches!(self.command, Commands::Run) }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), FluidError> {
        let ctx = Context::new(self.data_dir());

        match &self.command {
            Commands::Run => rotation::run_daemon(&ctx),
            Commands::ChangeNow => rotation::change_now(&ctx),
            Commands::Enable => rotation::set_enabled(&ctx, true),
            Commands::Disable => rotation::set_enabled(&ctx, false),
            Commands::Interval(cmd) => interval::execute(&ctx, cmd),
            Commands::Source(cmd) => source::execute(&ctx, cmd),
            Commands::Remote(cmd) => settings::execute_remote(&ctx, cmd),
            Commands::Mode(cmd) => settings::execute_mode(&ctx, cmd),
            Commands::Tile { state } => settings::execute_tile(&ctx, *state),
            Commands::Config(cmd) => config_cmd::execute(&ctx, cmd),
            Commands::Log(cmd) => log::execute(&ctx, cmd),

            Commands::Schema => {
                println!("{}", schema::generate_schema_json());
                Ok(())
            }

            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "fluidbg", &mut io::stdout());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IntervalUnit, WallpaperMode};

    // ========================================================================
    // CLI parsing tests
    // ========================================================================

    #[test]
    fn test_cli_definition_is_consistent() { Cli::command().debug_assert(); }

    #[test]
    fn test_cli_parses_run() {
        let cli = Cli::try_parse_from(["fluidbg", "run"]).unwrap();
        assert!(matches!(cli.command, Commands::Run));
        assert!(cli.is_daemon());
    }

    #[test]
    fn test_cli_parses_change_now() {
        let cli = Cli::try_parse_from(["fluidbg", "change-now"]).unwrap();
        assert!(matches!(cli.command, Commands::ChangeNow));
        assert!(!cli.is_daemon());
    }

    #[test]
    fn test_cli_parses_enable_disable() {
        let cli = Cli::try_parse_from(["fluidbg", "enable"]).unwrap();
        assert!(matches!(cli.command, Commands::Enable));
        let cli = Cli::try_parse_from(["fluidbg", "disable"]).unwrap();
        assert!(matches!(cli.command, Commands::Disable));
    }

    #[test]
    fn test_cli_parses_interval_set_with_unit() {
        let cli =
            Cli::try_parse_from(["fluidbg", "interval", "set", "2.5", "--unit", "hours"]).unwrap();
        match cli.command {
            Commands::Interval(IntervalCommands::Set { value, unit }) => {
                assert!((value - 2.5).abs() < f64::EPSILON);
                assert_eq!(unit, Some(IntervalUnit::Hours));
            }
            _ => panic!("Expected Interval Set command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_unit() {
        assert!(
            Cli::try_parse_from(["fluidbg", "interval", "set", "1", "--unit", "fortnights"])
                .is_err()
        );
    }

    #[test]
    fn test_cli_parses_source_add() {
        let cli = Cli::try_parse_from(["fluidbg", "source", "add", "~/Pictures"]).unwrap();
        match cli.command {
            Commands::Source(SourceCommands::Add { path }) => assert_eq!(path, "~/Pictures"),
            _ => panic!("Expected Source Add command"),
        }
    }

    #[test]
    fn test_cli_parses_mode_set_by_name_and_index() {
        let cli = Cli::try_parse_from(["fluidbg", "mode", "set", "span"]).unwrap();
        match cli.command {
            Commands::Mode(ModeCommands::Set { mode }) => assert_eq!(mode, WallpaperMode::Span),
            _ => panic!("Expected Mode Set command"),
        }

        let cli = Cli::try_parse_from(["fluidbg", "mode", "set", "1"]).unwrap();
        match cli.command {
            Commands::Mode(ModeCommands::Set { mode }) => assert_eq!(mode, WallpaperMode::Fit),
            _ => panic!("Expected Mode Set command"),
        }
    }

    #[test]
    fn test_cli_parses_tile() {
        let cli = Cli::try_parse_from(["fluidbg", "tile", "on"]).unwrap();
        assert!(matches!(cli.command, Commands::Tile { state: Switch::On }));
    }

    #[test]
    fn test_cli_parses_remote() {
        let cli = Cli::try_parse_from(["fluidbg", "remote", "disable"]).unwrap();
        assert!(matches!(cli.command, Commands::Remote(RemoteCommands::Disable)));
    }

    #[test]
    fn test_cli_parses_completions_zsh() {
        let cli = Cli::try_parse_from(["fluidbg", "completions", "--shell", "zsh"]).unwrap();
        match cli.command {
            Commands::Completions { shell } => assert_eq!(shell, Shell::Zsh),
            _ => panic!("Expected Completions command"),
        }
    }

    // ========================================================================
    // --data-dir flag tests
    // ========================================================================

    #[test]
    fn test_cli_parses_data_dir_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["fluidbg", "schema", "--data-dir", "/tmp/fbg"]).unwrap();
        assert_eq!(cli.data_dir(), PathBuf::from("/tmp/fbg"));
        assert!(matches!(cli.command, Commands::Schema));
    }

    #[test]
    fn test_cli_data_dir_defaults_to_app_dir() {
        let cli = Cli::try_parse_from(["fluidbg", "schema"]).unwrap();
        assert_eq!(cli.data_dir(), default_data_dir());
    }

    #[test]
    fn test_app_version_is_not_empty() {
        assert!(!APP_VERSION.is_empty());
    }
}
