use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use snlc_ingest::{ModelCatalog, ModelEntry};

use super::print_json;

#[derive(Args, Debug)]
pub struct ModelsArgs {
    /// Alternative catalogue (YAML list of `{code, name}`).
    #[arg(long)]
    pub catalog: Option<PathBuf>,
    /// Only list the names of this code.
    #[arg(long)]
    pub code: Option<i32>,
}

pub fn run(args: &ModelsArgs) -> Result<(), Box<dyn Error>> {
    let catalog = match &args.catalog {
        Some(path) => ModelCatalog::load(path)?,
        None => ModelCatalog::builtin(),
    };
    let entries: Vec<ModelEntry> = catalog
        .iter()
        .filter(|(code, _)| args.code.map_or(true, |wanted| wanted == *code))
        .flat_map(|(code, names)| {
            names.iter().map(move |name| ModelEntry {
                code,
                name: name.clone(),
            })
        })
        .collect();
    if let Some(code) = args.code {
        if entries.is_empty() {
            return Err(format!("model code {code} is not in the catalogue").into());
        }
    }
    print_json(&entries)
}
