use std::error::Error;
use std::path::Path;

use clap::Args;
use serde::Serialize;
use snlc_ingest::discover_pairs;

use super::{print_json, SourceArgs};

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Cadence to inspect; only the data root is checked when omitted.
    #[arg(long)]
    pub cadence: Option<String>,
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: String,
    ok: bool,
    detail: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    status: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(args: &DoctorArgs) -> Result<(), Box<dyn Error>> {
    let report = diagnose(args)?;
    print_json(&report)?;
    if report.status != "ok" {
        return Err("one or more checks failed".into());
    }
    Ok(())
}

fn diagnose(args: &DoctorArgs) -> Result<DoctorReport, Box<dyn Error>> {
    let config = args.source.resolve()?;
    let mut checks = Vec::new();
    match config.data_root() {
        Ok(root) => {
            checks.push(check_dir("data root", &root));
            if let Some(cadence) = &args.cadence {
                checks.extend(check_cadence(&root, cadence));
            }
        }
        Err(err) => checks.push(DoctorCheck {
            name: "data root".into(),
            ok: false,
            detail: err.to_string(),
        }),
    }
    if let Err(err) = config.catalog() {
        checks.push(DoctorCheck {
            name: "model catalogue".into(),
            ok: false,
            detail: err.to_string(),
        });
    }
    let status = if checks.iter().all(|check| check.ok) {
        "ok"
    } else {
        "needs-attention"
    };
    Ok(DoctorReport {
        status: status.into(),
        checks,
    })
}

fn check_cadence(root: &Path, cadence: &str) -> Vec<DoctorCheck> {
    let pairs = match discover_pairs(root, cadence) {
        Ok(pairs) => pairs,
        Err(err) => {
            return vec![DoctorCheck {
                name: format!("cadence {cadence}"),
                ok: false,
                detail: err.to_string(),
            }]
        }
    };
    let mut checks = vec![DoctorCheck {
        name: format!("cadence {cadence}"),
        ok: !pairs.is_empty(),
        detail: format!("{} header files", pairs.len()),
    }];
    checks.extend(
        pairs
            .iter()
            .filter(|pair| !pair.photometry.is_file())
            .map(|pair| DoctorCheck {
                name: "photometry partner".into(),
                ok: false,
                detail: format!("missing {}", pair.photometry.display()),
            }),
    );
    checks
}

fn check_dir(name: &str, path: &Path) -> DoctorCheck {
    DoctorCheck {
        name: name.into(),
        ok: path.is_dir(),
        detail: path.display().to_string(),
    }
}
