use std::error::Error;

use clap::{Parser, Subcommand};
use flexi_logger::{FlexiLoggerError, Logger, LoggerHandle};

use commands::{
    doctor::{self, DoctorArgs},
    export::{self, ExportArgs},
    models::{self, ModelsArgs},
    show::{self, ShowArgs},
    subset::{self, SubsetArgs},
    summary::{self, SummaryArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "snlc", version, about = "SNANA light-curve ingestion tools")]
struct Cli {
    /// Log specification, e.g. `info` or `snlc_ingest=debug`. `RUST_LOG` wins when set.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingest a cadence and print a JSON summary.
    Summary(SummaryArgs),
    /// Ingest a cadence and write its light curves as JSON or CSV.
    Export(ExportArgs),
    /// Print the light curve of one object from a header/photometry pair.
    Show(ShowArgs),
    /// Copy selected objects into a smaller header/photometry pair.
    Subset(SubsetArgs),
    /// List the simulation model catalogue.
    Models(ModelsArgs),
    /// Check that the data root and a cadence are readable.
    Doctor(DoctorArgs),
}

fn setup_logging(spec: &str) -> Result<LoggerHandle, FlexiLoggerError> {
    Logger::try_with_env_or_str(spec)?.log_to_stderr().start()
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let _logger = setup_logging(&cli.log_level)?;
    match cli.command {
        Command::Summary(args) => summary::run(&args),
        Command::Export(args) => export::run(&args),
        Command::Show(args) => show::run(&args),
        Command::Subset(args) => subset::run(&args),
        Command::Models(args) => models::run(&args),
        Command::Doctor(args) => doctor::run(&args),
    }
}
