use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use snlc_fits::Table;
use snlc_ingest::{assemble_with, build_index, AssembleOptions, FilePair, IndexOptions};

use super::{print_json, SourceArgs};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Header table; the photometry table is its `PHOT` sibling.
    #[arg(long)]
    pub header: PathBuf,
    #[arg(long)]
    pub snid: i64,
    #[command(flatten)]
    pub source: SourceArgs,
}

pub fn run(args: &ShowArgs) -> Result<(), Box<dyn Error>> {
    let config = args.source.resolve()?;
    let pair = FilePair::from_header(&args.header);
    let header = Table::open(&pair.header)?;
    let photometry = Table::open(&pair.photometry)?;
    let index = build_index(
        &header,
        &IndexOptions {
            model_code: pair.model_code,
            ..config.index_options()
        },
    )?;
    let Some(record) = index.get(args.snid) else {
        let reason = index
            .diagnostics()
            .iter()
            .find(|diagnostic| diagnostic.snid == Some(args.snid))
            .map(|diagnostic| format!(": {}", diagnostic.error))
            .unwrap_or_default();
        return Err(format!(
            "SNID {} not indexed in {}{reason}",
            args.snid,
            args.header.display()
        )
        .into());
    };
    let curve = assemble_with(
        record,
        &photometry,
        &AssembleOptions {
            check_snid: config.check_snid,
        },
    )?;
    print_json(&curve)
}
