//! litepage - preview built sites and check configuration.

use anyhow::Result;
use clap::Parser;
use litepage::cli::{self, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::apply_output_flags(cli.color, cli.verbose);

    match &cli.command {
        Commands::Preview {
            dir,
            port,
            base_path,
        } => cli::preview::run_preview(dir, *port, base_path),
        Commands::Check { config, paths } => cli::check::run_check(config, paths),
    }
}
