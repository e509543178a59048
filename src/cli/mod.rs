//! Command-line interface module.
//!
//! `RunArgs` is parsed by site programs through `Site::run`; `Cli` drives the
//! `litepage` binary.

mod args;
pub mod check;
pub mod preview;

pub use args::{Cli, Commands, Mode, RunArgs};

use clap::ColorChoice;

use crate::logger;

/// Apply color and verbosity flags to the global output settings.
pub fn apply_output_flags(color: ColorChoice, verbose: bool) {
    match color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(verbose);
}
