//! Source list CLI commands.

use clap::Subcommand;

use super::Context;
use crate::cli::output::print_sources;
use crate::config::ConfigKey;
use crate::error::FluidError;
use crate::wallpaper::sources::classify;

/// Source subcommands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum SourceCommands {
    /// Add an image file, a folder of images, or `remote`.
    ///
    /// Paths are expanded (`~`) and resolved against the current directory.
    /// Every entry is one slot: a folder is as likely to be picked as a file.
    #[command(after_long_help = r#"Examples:
  fluidbg source add ~/Pictures/Walls     # A folder
  fluidbg source add ./beach.jpg          # A single image
  fluidbg source add remote               # Same as `fluidbg remote enable`"#)]
    Add {
        /// Path to add, or `remote`.
        #[arg(value_name = "PATH")]
        path: String,
    },

    /// Remove the first matching source entry.
    Remove {
        /// Entry to remove, as listed or as a path.
        #[arg(value_name = "PATH")]
        path: String,
    },

    /// List configured sources and what they point at.
    List,
}

/// Execute source subcommands.
///
/// # Errors
///
/// Returns an error if a path to add does not exist or nothing matched a removal.
pub fn execute(ctx: &Context, cmd: &SourceCommands) -> Result<(), FluidError> {
    match cmd {
        SourceCommands::Add { path } => {
            let stored = ctx.store().add_source(path)?;
            println!("Added {stored}");
            Ok(())
        }
        SourceCommands::Remove { path } => {
            if !ctx.store().remove_source(path) {
                return Err(FluidError::NotFound(format!("No source matches '{path}'")));
            }
            println!("Removed {path}");
            Ok(())
        }
        SourceCommands::List => {
            let sources: Vec<String> = ctx.store().get(ConfigKey::SourcePaths);
            let classified: Vec<_> = sources
                .into_iter()
                .map(|source| {
                    let kind = classify(&source);
                    (source, kind)
                })
                .collect();
            print_sources(&classified);
            Ok(())
        }
    }
}
