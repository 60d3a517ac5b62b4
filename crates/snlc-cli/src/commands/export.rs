use std::error::Error;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use log::info;
use snlc_ingest::{export_csv_file, export_json, CadenceData};

use super::{check_strict, SourceArgs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[arg(long)]
    pub cadence: String,
    #[command(flatten)]
    pub source: SourceArgs,
    #[arg(long, value_enum, default_value = "csv")]
    pub format: ExportFormat,
    /// Output file.
    #[arg(long)]
    pub out: PathBuf,
    /// Restrict the export to these objects.
    #[arg(long = "snid", value_name = "SNID")]
    pub snids: Vec<i64>,
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: &ExportArgs) -> Result<(), Box<dyn Error>> {
    let config = args.source.resolve()?;
    let data = CadenceData::load(&config, &args.cadence)?;
    check_strict(args.strict, data.diagnostics(), data.failures())?;

    let curves: Vec<_> = if args.snids.is_empty() {
        data.light_curves().collect()
    } else {
        args.snids
            .iter()
            .map(|snid| {
                data.get_lightcurve(*snid)
                    .ok_or_else(|| format!("SNID {snid} not found in {}", args.cadence))
            })
            .collect::<Result<_, _>>()?
    };
    match args.format {
        ExportFormat::Json => export_json(curves.iter().copied(), &args.out)?,
        ExportFormat::Csv => {
            let rows =
                export_csv_file(curves.iter().copied(), &config.filter_prefix, &args.out)?;
            info!("wrote {rows} observations");
        }
    }
    info!("exported {} light curves to {}", curves.len(), args.out.display());
    Ok(())
}
