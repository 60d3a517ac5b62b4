use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use snlc_ingest::serde::to_canonical_json_bytes;
use snlc_ingest::CadenceData;

use super::{check_strict, print_json, SourceArgs};

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Cadence directory name under the data root.
    #[arg(long)]
    pub cadence: String,
    #[command(flatten)]
    pub source: SourceArgs,
    /// Also write the summary to this file.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Exit with an error when any record or file pair was excluded.
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: &SummaryArgs) -> Result<(), Box<dyn Error>> {
    let config = args.source.resolve()?;
    let catalog = config.catalog()?;
    let data = CadenceData::load(&config, &args.cadence)?;
    let summary = data.summary(&catalog)?;
    if let Some(out) = &args.out {
        let json =
            to_canonical_json_bytes(&summary).map_err(|err| Box::new(err) as Box<dyn Error>)?;
        fs::write(out, json)?;
    }
    print_json(&summary)?;
    check_strict(args.strict, data.diagnostics(), data.failures())
}
