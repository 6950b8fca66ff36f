use clap::Parser;
use pocket_ledger::args::{Args, Command};
use pocket_ledger::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().ledger_home().path();

    let _: () = match args.command() {
        Command::Init => commands::init(home)?.print(),

        Command::Deposit(record_args) => {
            commands::deposit(Config::load(home)?, record_args.clone())?.print()
        }

        Command::Payment(record_args) => {
            commands::payment(Config::load(home)?, record_args.clone())?.print()
        }

        Command::Ledger(ledger_args) => {
            commands::ledger(Config::load(home)?, ledger_args.clone())?.print()
        }

        Command::Report(report_args) => {
            commands::report(Config::load(home)?, report_args.clone())?.print()
        }

        Command::Vendor(vendor_args) => {
            commands::vendor(Config::load(home)?, vendor_args.clone())?.print()
        }

        Command::Search(search_args) => {
            commands::search(Config::load(home)?, search_args.clone())?.print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for the library and the binary only.
            EnvFilter::new(format!(
                "pocket_ledger={},{}={}",
                level,
                env!("CARGO_CRATE_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
