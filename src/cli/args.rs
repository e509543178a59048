//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{
    ColorChoice, Command, CommandFactory, FromArgMatches, Parser, Subcommand, ValueEnum,
};

use crate::config::CONFIG_FILE;

/// What a site program does when run.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Write the static tree to the output directory
    #[default]
    Build,
    /// Answer HTTP requests without writing to disk
    Serve,
}

/// Flags understood by a program that calls `Site::run`.
///
/// Prefixed with `lp-` so they stay out of the way of the program's own
/// arguments.
#[derive(Parser, Debug, Clone, Default)]
#[command(about = "Build or serve a litepage site", long_about = None)]
pub struct RunArgs {
    /// Start the dev server (same as LP_MODE=serve)
    #[arg(long = "lp-serve")]
    pub serve: bool,

    /// Execution mode
    #[arg(long = "lp-mode", env = "LP_MODE", value_enum, default_value_t = Mode::Build)]
    pub mode: Mode,

    /// Dev server port (default: 3000)
    #[arg(long = "lp-port", env = "LP_PORT")]
    pub port: Option<u16>,

    /// Enable verbose output for debugging
    #[arg(long = "lp-verbose")]
    pub verbose: bool,

    /// Control colored output (auto, always, never)
    #[arg(long = "lp-color", default_value = "auto")]
    pub color: ColorChoice,
}

impl RunArgs {
    /// Resolved mode; `--lp-serve` wins over `LP_MODE`.
    pub fn mode(&self) -> Mode {
        if self.serve { Mode::Serve } else { self.mode }
    }

    /// Same arguments, with the serve and port flags renamed, e.g.
    /// `("serve", "port")` for `--serve --port 8080`.
    pub fn command_with_flags(serve_flag: &str, port_flag: &str) -> Command {
        Self::command()
            .mut_arg("serve", |arg| arg.long(serve_flag.to_string()))
            .mut_arg("port", |arg| arg.long(port_flag.to_string()))
    }

    /// Parse the process arguments with renamed serve and port flags.
    ///
    /// Exits with a usage message on bad input, like `RunArgs::parse`.
    pub fn parse_with_flags(serve_flag: &str, port_flag: &str) -> Self {
        let matches = Self::command_with_flags(serve_flag, port_flag).get_matches();
        Self::from_arg_matches(&matches).unwrap_or_else(|err| err.exit())
    }
}

/// litepage command-line tools
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve a built output directory as a static host would
    #[command(visible_alias = "p")]
    Preview {
        /// Build output directory
        #[arg(default_value = "dist", value_hint = clap::ValueHint::DirPath)]
        dir: PathBuf,

        /// Port number to listen on
        #[arg(short, long, env = "LP_PORT")]
        port: Option<u16>,

        /// Base path the site was built with, e.g. /blog
        #[arg(short, long, default_value = "")]
        base_path: String,
    },

    /// Validate a config file and show the routes of page paths
    #[command(visible_alias = "c")]
    Check {
        /// Config file path
        #[arg(short = 'C', long, default_value = CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
        config: PathBuf,

        /// Page paths to resolve, e.g. /blog/index.html
        #[arg(value_name = "PATH")]
        paths: Vec<String>,
    },
}
