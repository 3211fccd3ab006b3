use anyhow::Result;
use clap::Parser;
use cjk_merge_cli::cli::Cli;
use env_logger::{Builder, Env};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(level)).init();
    cli.run()
}
