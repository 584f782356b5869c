//! lbm - schema migrator and localization key tool for the lesson shop bot

use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::common::ExitCode;
use commands::{backup, keys, migrate, plan, verify};

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let result = match &cli.command {
        cli::Commands::Migrate(args) => migrate::execute(args, &cli.global),
        cli::Commands::Plan(args) => plan::execute(args, &cli.global),
        cli::Commands::Verify(args) => verify::execute(args, &cli.global),
        cli::Commands::Backup(args) => backup::execute(args, &cli.global),
        cli::Commands::Keys(args) => keys::execute(args, &cli.global),
    };

    if let Err(err) = result {
        if let Some(ExitCode(code)) = err.downcast_ref::<ExitCode>() {
            std::process::exit(*code);
        }
        eprintln!("Error: {err:#}");
        eprintln!("Consult the logs (RUST_LOG=debug or -v) or contact support.");
        std::process::exit(1);
    }
}
