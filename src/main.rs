use backtrace::Backtrace;
use clap::{value_parser, Command};
use std::path::PathBuf;
use tracing::debug;

mod app;
mod commands;
mod compact;
mod config;
mod error;
mod loader;
mod metadata;
mod storage;
mod table;

use config::Config;

fn main() {
    // custom panic hook to terminate whole process after unwinding
    std::panic::set_hook(Box::new(|s| {
        eprintln!("{s}");
        eprintln!("{:?}", Backtrace::new());
        std::process::exit(101);
    }));

    let matches = cli().get_matches();

    let config = match Config::try_from(&matches) {
        Ok(c) => c,
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    };

    // stdout carries payloads, so logs go to stderr
    tracing_subscriber::fmt()
        .with_max_level(config.log().level())
        .with_writer(std::io::stderr)
        .init();

    debug!(
        "data directory: {} metadata: {}",
        config.general().data_dir().display(),
        config.general().metadata_file().display()
    );

    let result = match matches.subcommand() {
        Some(("users", args)) => commands::run_users(&config, args),
        Some(("plot", args)) => commands::run_plot(&config, args),
        Some(("pair", args)) => commands::run_pair(&config, args),
        Some(("compare", args)) => commands::run_compare(&config, args),
        Some(("summary", _)) => commands::run_summary(&config),
        Some(("compact", args)) => compact::Config::try_from(args).and_then(compact::run),
        _ => unreachable!("subcommand is required"),
    };

    if let Err(error) = result {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_about("Serves health tracker time series as chart payloads.")
        .subcommand_required(true)
        .arg(
            clap::Arg::new("CONFIG")
                .long("config")
                .help("Configuration file")
                .value_parser(value_parser!(PathBuf))
                .action(clap::ArgAction::Set)
                .global(true),
        )
        .arg(
            clap::Arg::new("DATA_DIR")
                .long("data-dir")
                .short('p')
                .help("Directory holding one folder of exports per view")
                .value_parser(value_parser!(PathBuf))
                .action(clap::ArgAction::Set)
                .global(true),
        )
        .arg(
            clap::Arg::new("METADATA")
                .long("metadata")
                .short('m')
                .help("Per-user record count table")
                .value_parser(value_parser!(PathBuf))
                .action(clap::ArgAction::Set)
                .global(true),
        )
        .arg(
            clap::Arg::new("VERBOSE")
                .long("verbose")
                .short('v')
                .help("Increase the verbosity")
                .action(clap::ArgAction::Count)
                .global(true),
        )
        .subcommand(commands::users())
        .subcommand(commands::plot())
        .subcommand(commands::pair())
        .subcommand(commands::compare())
        .subcommand(commands::summary())
        .subcommand(compact::command())
}
