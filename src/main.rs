use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use pdpatch::cli::{Cli, Commands};
use pdpatch::output::Printer;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    let printer = Printer::new();
    let config = cli.config.as_deref();

    let ok = match cli.command {
        Commands::List(args) => pdpatch::cli::list::run(args, config, &printer)?,
        Commands::Have(args) => pdpatch::cli::have::run(args, config)?,
        Commands::Element(args) => pdpatch::cli::element::run(args, &printer)?,
        Commands::Setup(args) => {
            pdpatch::cli::setup::run(args, config, &printer)?;
            true
        }
        Commands::Completions(args) => {
            pdpatch::cli::completions::run(args)?;
            true
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
