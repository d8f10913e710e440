#![allow(clippy::multiple_crate_versions)]

//! FluidBG - wallpaper rotator.
//!
//! `fluidbg run` starts the rotation daemon; every other subcommand edits or
//! inspects the shared configuration and exits.

fn main() {
    if let Err(err) = fluidbg_lib::cli::run() {
        eprintln!("fluidbg: {err}");
        std::process::exit(1);
    }
}
