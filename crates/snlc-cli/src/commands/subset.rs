use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use snlc_fits::Table;
use snlc_ingest::{write_subset, FilePair};

use super::{print_json, SourceArgs};

#[derive(Args, Debug)]
pub struct SubsetArgs {
    /// Header table to copy from.
    #[arg(long)]
    pub header: PathBuf,
    /// Objects to keep, in output order.
    #[arg(long = "snid", value_name = "SNID", required = true)]
    pub snids: Vec<i64>,
    /// Directory receiving the new pair.
    #[arg(long)]
    pub out: PathBuf,
    #[command(flatten)]
    pub source: SourceArgs,
}

pub fn run(args: &SubsetArgs) -> Result<(), Box<dyn Error>> {
    let config = args.source.resolve()?;
    let pair = FilePair::from_header(&args.header);
    let header = Table::open(&pair.header)?;
    let photometry = Table::open(&pair.photometry)?;
    let written = write_subset(
        &header,
        &photometry,
        &args.snids,
        &args.out,
        config.index_base,
    )?;
    print_json(&written)
}
