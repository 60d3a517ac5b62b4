use std::ops::Range;
use std::slice;

use log::warn;
use snlc_core::errors::{Diagnostic, ErrorInfo, LcError};
use snlc_core::{LightCurve, ObjectRecord, Observation, PhotFlag};
use snlc_fits::Table;

use crate::index::{decode_ids, HeaderIndex};
use crate::validate::{is_monotonic, is_valid_span};

/// Columns every photometry table must carry.
pub const PHOTOMETRY_COLUMNS: [&str; 9] = [
    "MJD",
    "FLT",
    "FIELD",
    "PHOTFLAG",
    "PHOTPROB",
    "FLUXCAL",
    "FLUXCALERR",
    "PSF_SIG1",
    "ZEROPT",
];

const SIM_MAGOBS: &str = "SIM_MAGOBS";
const SKY_SIG: &str = "SKY_SIG";
const SNID: &str = "SNID";

/// Knobs for [`assemble_with`] and [`assemble_all_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Require photometry `SNID` values, when present, to match the header.
    pub check_snid: bool,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self { check_snid: true }
    }
}

/// Optional columns present in one photometry table, resolved once.
#[derive(Debug, Clone, Copy)]
struct PhotometryLayout {
    sim_magobs: bool,
    sky_sig: bool,
    snid: bool,
}

impl PhotometryLayout {
    fn resolve(table: &Table) -> Result<Self, LcError> {
        let missing: Vec<&str> = PHOTOMETRY_COLUMNS
            .iter()
            .copied()
            .filter(|name| !table.has_column(name))
            .collect();
        if !missing.is_empty() {
            return Err(LcError::Schema(
                ErrorInfo::new(
                    "snlc_ingest.photometry_schema",
                    format!("photometry table is missing {}", missing.join(", ")),
                )
                .with_path(table.path())
                .with_context("missing", missing.join(",")),
            ));
        }
        Ok(Self {
            sim_magobs: table.has_column(SIM_MAGOBS),
            sky_sig: table.has_column(SKY_SIG),
            snid: table.has_column(SNID),
        })
    }

    fn assemble(
        &self,
        record: &ObjectRecord,
        table: &Table,
        opts: &AssembleOptions,
    ) -> Result<LightCurve, LcError> {
        if !is_valid_span(record.span_start, record.span_end, table.row_count()) {
            return Err(LcError::Range(
                ErrorInfo::new(
                    "snlc_ingest.span_range",
                    format!(
                        "span {}..={} outside photometry table of {} rows",
                        record.span_start,
                        record.span_end,
                        table.row_count()
                    ),
                )
                .with_path(table.path())
                .with_context("snid", record.snid.to_string()),
            ));
        }
        let rows = record.span_start..record.span_end + 1;
        let floats = |name: &str| -> Result<Vec<f64>, LcError> {
            table.column_range(name, rows.clone())?.into_floats(name)
        };

        let mjd = floats("MJD")?;
        let bands = table.column_range("FLT", rows.clone())?.into_texts();
        let fields = table.column_range("FIELD", rows.clone())?.into_texts();
        let flags = table
            .column_range("PHOTFLAG", rows.clone())?
            .into_ints("PHOTFLAG")?;
        let photprob = floats("PHOTPROB")?;
        let flux = floats("FLUXCAL")?;
        let flux_err = floats("FLUXCALERR")?;
        let psf_sig1 = floats("PSF_SIG1")?;
        let zero_point = floats("ZEROPT")?;
        let sky_sig = if self.sky_sig {
            Some(floats(SKY_SIG)?)
        } else {
            None
        };
        let sim_magobs = if self.sim_magobs {
            Some(floats(SIM_MAGOBS)?)
        } else {
            None
        };
        if self.snid && opts.check_snid {
            check_snids(record, table, rows.clone())?;
        }

        let mut observations = Vec::with_capacity(rows.len());
        for (offset, row) in rows.enumerate() {
            let flag = PhotFlag::try_from(flags[offset]).map_err(|err| match err {
                LcError::Validation(info) => LcError::Validation(
                    info.with_path(table.path())
                        .with_context("row", row.to_string())
                        .with_context("snid", record.snid.to_string()),
                ),
                other => other,
            })?;
            observations.push(Observation {
                mjd: mjd[offset],
                band: bands[offset].trim().to_string(),
                field: fields[offset].trim().to_string(),
                flag,
                photprob: photprob[offset],
                flux: flux[offset],
                flux_err: flux_err[offset],
                psf_sig1: psf_sig1[offset],
                sky_sig: sky_sig.as_ref().map(|values| values[offset]),
                zero_point: zero_point[offset],
                sim_magobs: sim_magobs.as_ref().map(|values| values[offset]),
            });
        }

        let curve = LightCurve::new(record.clone(), observations);
        if !is_monotonic(&curve.mjds()) {
            warn!(
                "light curve {} in {} has unordered timestamps after sorting",
                record.snid,
                table.path().display()
            );
        }
        Ok(curve)
    }
}

fn check_snids(record: &ObjectRecord, table: &Table, rows: Range<usize>) -> Result<(), LcError> {
    let ids = decode_ids(table.column_range(SNID, rows.clone())?);
    for (row, id) in rows.zip(ids) {
        if id != Some(record.snid) {
            let found = id.map_or_else(|| "unreadable".to_string(), |id| id.to_string());
            return Err(LcError::Validation(
                ErrorInfo::new(
                    "snlc_ingest.snid_mismatch",
                    format!(
                        "photometry row {row} belongs to SNID {found}, header expects {}",
                        record.snid
                    ),
                )
                .with_path(table.path())
                .with_context("row", row.to_string()),
            ));
        }
    }
    Ok(())
}

/// Builds the light curve of one header record from its photometry span.
pub fn assemble(record: &ObjectRecord, photometry: &Table) -> Result<LightCurve, LcError> {
    assemble_with(record, photometry, &AssembleOptions::default())
}

/// [`assemble`] with explicit options.
pub fn assemble_with(
    record: &ObjectRecord,
    photometry: &Table,
    opts: &AssembleOptions,
) -> Result<LightCurve, LcError> {
    PhotometryLayout::resolve(photometry)?.assemble(record, photometry, opts)
}

/// Lazily assembles every record of `index` against `photometry`.
///
/// Fails up front with `Schema` when required photometry columns are
/// missing; per-record failures surface as diagnostics during iteration.
pub fn assemble_all<'a>(
    index: &'a HeaderIndex,
    photometry: &'a Table,
) -> Result<Assembly<'a>, LcError> {
    assemble_all_with(index, photometry, AssembleOptions::default())
}

/// [`assemble_all`] with explicit options.
pub fn assemble_all_with<'a>(
    index: &'a HeaderIndex,
    photometry: &'a Table,
    opts: AssembleOptions,
) -> Result<Assembly<'a>, LcError> {
    Ok(Assembly {
        index,
        photometry,
        layout: PhotometryLayout::resolve(photometry)?,
        opts,
    })
}

/// A restartable view over the light curves of one file pair.
///
/// Each call to [`Assembly::iter`] starts a fresh pass that re-reads the
/// photometry table; no cursor is shared between passes.
#[derive(Debug, Clone, Copy)]
pub struct Assembly<'a> {
    index: &'a HeaderIndex,
    photometry: &'a Table,
    layout: PhotometryLayout,
    opts: AssembleOptions,
}

impl<'a> Assembly<'a> {
    /// Starts a new pass over the records.
    pub fn iter(&self) -> LightCurveIter<'a> {
        LightCurveIter {
            records: self.index.records().iter(),
            photometry: self.photometry,
            layout: self.layout,
            opts: self.opts,
        }
    }

    /// Diagnostics produced while building the header index.
    pub fn index_diagnostics(&self) -> &'a [Diagnostic] {
        self.index.diagnostics()
    }

    /// Runs a full pass, collecting curves and every diagnostic.
    ///
    /// A file-level error met while reading aborts the pass.
    pub fn collect_report(&self) -> Result<AssemblyReport, LcError> {
        let mut report = AssemblyReport {
            light_curves: Vec::with_capacity(self.index.len()),
            diagnostics: self.index.diagnostics().to_vec(),
        };
        for item in self.iter() {
            match item {
                Ok(curve) => report.light_curves.push(curve),
                Err(diagnostic) if diagnostic.error.is_file_level() => {
                    return Err(diagnostic.error)
                }
                Err(diagnostic) => {
                    warn!("excluded light curve: {diagnostic}");
                    report.diagnostics.push(diagnostic);
                }
            }
        }
        Ok(report)
    }
}

impl<'a, 'b> IntoIterator for &'b Assembly<'a> {
    type Item = Result<LightCurve, Diagnostic>;
    type IntoIter = LightCurveIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One pass of an [`Assembly`].
#[derive(Debug, Clone)]
pub struct LightCurveIter<'a> {
    records: slice::Iter<'a, ObjectRecord>,
    photometry: &'a Table,
    layout: PhotometryLayout,
    opts: AssembleOptions,
}

impl<'a> Iterator for LightCurveIter<'a> {
    type Item = Result<LightCurve, Diagnostic>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(
            self.layout
                .assemble(record, self.photometry, &self.opts)
                .map_err(|err| {
                    Diagnostic::new(err)
                        .with_source(self.photometry.path())
                        .with_snid(record.snid)
                }),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

impl ExactSizeIterator for LightCurveIter<'_> {}

/// Output of a full assembly pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyReport {
    /// Curves of the accepted records, in index order.
    pub light_curves: Vec<LightCurve>,
    /// Index diagnostics first, then assembly failures, in record order.
    pub diagnostics: Vec<Diagnostic>,
}

impl AssemblyReport {
    /// True when nothing was excluded.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
