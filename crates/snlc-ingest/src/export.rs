use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use snlc_core::errors::{ErrorInfo, LcError};
use snlc_core::{LightCurve, PHOTOMETRIC_SYSTEM};

use crate::serde::to_canonical_json_bytes;

fn export_error(code: &str, path: Option<&Path>, err: impl ToString) -> LcError {
    let info = ErrorInfo::new(code, err.to_string());
    LcError::Serde(match path {
        Some(path) => info.with_path(path),
        None => info,
    })
}

/// One flattened photometry row of the CSV export.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    snid: i64,
    mjd: f64,
    band: String,
    field: &'a str,
    photflag: i64,
    photprob: f64,
    flux: f64,
    flux_err: f64,
    psf_sig1: f64,
    sky_sig: Option<f64>,
    zero_point: f64,
    sim_magobs: Option<f64>,
    zpsys: &'static str,
}

/// Writes light curves as a canonical JSON array.
pub fn export_json<'a>(
    curves: impl IntoIterator<Item = &'a LightCurve>,
    path: &Path,
) -> Result<(), LcError> {
    let curves: Vec<&LightCurve> = curves.into_iter().collect();
    let bytes = to_canonical_json_bytes(&curves)?;
    std::fs::write(path, bytes).map_err(|err| export_error("export_write", Some(path), err))
}

/// Writes one CSV row per observation, bands renamed to `<prefix><band>`.
/// Returns the number of rows written.
pub fn export_csv<'a, W: Write>(
    curves: impl IntoIterator<Item = &'a LightCurve>,
    filter_prefix: &str,
    writer: W,
) -> Result<usize, LcError> {
    let mut csv = csv::Writer::from_writer(writer);
    let mut rows = 0;
    for curve in curves {
        for obs in curve.observations() {
            csv.serialize(CsvRow {
                snid: curve.snid(),
                mjd: obs.mjd,
                band: obs.prefixed_band(filter_prefix),
                field: &obs.field,
                photflag: obs.flag.code(),
                photprob: obs.photprob,
                flux: obs.flux,
                flux_err: obs.flux_err,
                psf_sig1: obs.psf_sig1,
                sky_sig: obs.sky_sig,
                zero_point: obs.zero_point,
                sim_magobs: obs.sim_magobs,
                zpsys: PHOTOMETRIC_SYSTEM,
            })
            .map_err(|err| export_error("csv_serialize", None, err))?;
            rows += 1;
        }
    }
    csv.flush()
        .map_err(|err| export_error("csv_flush", None, err))?;
    Ok(rows)
}

/// [`export_csv`] into a file at `path`.
pub fn export_csv_file<'a>(
    curves: impl IntoIterator<Item = &'a LightCurve>,
    filter_prefix: &str,
    path: &Path,
) -> Result<usize, LcError> {
    let file =
        File::create(path).map_err(|err| export_error("export_write", Some(path), err))?;
    export_csv(curves, filter_prefix, BufWriter::new(file)).map_err(|err| match err {
        LcError::Serde(info) => LcError::Serde(info.with_path(path)),
        other => other,
    })
}
