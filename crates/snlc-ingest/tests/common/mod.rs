#![allow(dead_code)]

use std::path::Path;

use snlc_fits::{ColumnData, TableWriter};

/// One header row: `(snid, ptrobs_min, ptrobs_max, model_name)`.
pub type HeaderRow<'a> = (i64, i64, i64, &'a str);

/// One photometry row: `(mjd, band, photflag)`.
pub type PhotRow<'a> = (f64, &'a str, i64);

pub fn header_writer(rows: &[HeaderRow]) -> TableWriter {
    TableWriter::new("HEADER")
        .column("SNID", ColumnData::Int(rows.iter().map(|r| r.0).collect()))
        .column(
            "RA",
            ColumnData::Float(rows.iter().map(|r| 10.0 + r.0 as f64).collect()),
        )
        .column("DECL", ColumnData::Float(vec![-30.0; rows.len()]))
        .column("MWEBV", ColumnData::Float(vec![0.02; rows.len()]))
        .column("PTROBS_MIN", ColumnData::Int(rows.iter().map(|r| r.1).collect()))
        .column("PTROBS_MAX", ColumnData::Int(rows.iter().map(|r| r.2).collect()))
        .column(
            "SIM_MODEL_NAME",
            ColumnData::Text(rows.iter().map(|r| r.3.to_string()).collect()),
        )
}

pub fn write_header(path: &Path, rows: &[HeaderRow]) {
    header_writer(rows).write(path).expect("write header");
}

pub fn photometry_writer(rows: &[PhotRow]) -> TableWriter {
    let n = rows.len();
    TableWriter::new("PHOTOMETRY")
        .column("MJD", ColumnData::Float(rows.iter().map(|r| r.0).collect()))
        .column(
            "FLT",
            ColumnData::Text(rows.iter().map(|r| r.1.to_string()).collect()),
        )
        .column("FIELD", ColumnData::Text(vec!["WFD".into(); n]))
        .column("PHOTFLAG", ColumnData::Int(rows.iter().map(|r| r.2).collect()))
        .column("PHOTPROB", ColumnData::Float(vec![1.0; n]))
        .column(
            "FLUXCAL",
            ColumnData::Float((0..n).map(|i| 100.0 + i as f64).collect()),
        )
        .column("FLUXCALERR", ColumnData::Float(vec![5.0; n]))
        .column("PSF_SIG1", ColumnData::Float(vec![1.8; n]))
        .column("SKY_SIG", ColumnData::Float(vec![30.0; n]))
        .column("ZEROPT", ColumnData::Float(vec![27.5; n]))
        .column("SIM_MAGOBS", ColumnData::Float(vec![22.0; n]))
}

pub fn write_photometry(path: &Path, rows: &[PhotRow]) {
    photometry_writer(rows).write(path).expect("write photometry");
}

/// Writes `<dir>/<stem>_HEAD.FITS` and `<dir>/<stem>_PHOT.FITS`.
pub fn write_pair(dir: &Path, stem: &str, header: &[HeaderRow], photometry: &[PhotRow]) {
    std::fs::create_dir_all(dir).expect("create dir");
    write_header(&dir.join(format!("{stem}_HEAD.FITS")), header);
    write_photometry(&dir.join(format!("{stem}_PHOT.FITS")), photometry);
}
