use std::collections::BTreeSet;
use std::fmt::{self, Display};

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::{ErrorInfo, LcError};

/// Photometric system reported for every light curve.
pub const PHOTOMETRIC_SYSTEM: &str = "AB";

/// Zero point the simulations conventionally write for every observation.
pub const NOMINAL_ZERO_POINT: f64 = 27.5;

/// Detection state of a single observation (`PHOTFLAG`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotFlag {
    /// Flux measured without a detection.
    NonDetection,
    /// Detection above threshold.
    Detection,
    /// First detection that triggered the object.
    FirstTrigger,
}

impl PhotFlag {
    /// Raw `PHOTFLAG` value written by the simulation.
    pub const fn code(self) -> i64 {
        match self {
            PhotFlag::NonDetection => 0,
            PhotFlag::Detection => 4096,
            PhotFlag::FirstTrigger => 6144,
        }
    }

    /// Decodes a raw `PHOTFLAG` value, returning `None` for unknown codes.
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(PhotFlag::NonDetection),
            4096 => Some(PhotFlag::Detection),
            6144 => Some(PhotFlag::FirstTrigger),
            _ => None,
        }
    }

    /// True for both detection states.
    pub const fn is_detection(self) -> bool {
        !matches!(self, PhotFlag::NonDetection)
    }
}

impl TryFrom<i64> for PhotFlag {
    type Error = LcError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        PhotFlag::from_code(code).ok_or_else(|| {
            LcError::Validation(
                ErrorInfo::new("snlc.photflag", format!("unrecognised PHOTFLAG value {code}"))
                    .with_context("value", code.to_string())
                    .with_hint("expected one of 0, 4096, 6144"),
            )
        })
    }
}

impl Display for PhotFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PhotFlag::NonDetection => "non-detection",
            PhotFlag::Detection => "detection",
            PhotFlag::FirstTrigger => "first-trigger",
        };
        f.write_str(label)
    }
}

/// One object described by a row of the header table.
///
/// `span_start` and `span_end` are zero-based and inclusive row indices
/// into the paired photometry table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// Unique object identifier (`SNID`).
    pub snid: i64,
    /// Right ascension in degrees.
    pub ra: f64,
    /// Declination in degrees.
    pub decl: f64,
    /// Milky-Way extinction estimate E(B-V).
    pub mwebv: f64,
    /// Numeric simulation model code, when known.
    pub model_code: Option<i32>,
    /// Simulation model name, surfaced verbatim from `SIM_MODEL_NAME`.
    pub model_name: String,
    /// Simulated CMB-frame redshift, when the header carries it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redshift: Option<f64>,
    /// First photometry row of the object.
    pub span_start: usize,
    /// Last photometry row of the object (inclusive).
    pub span_end: usize,
}

impl ObjectRecord {
    /// Number of photometry rows covered by the span.
    pub fn span_len(&self) -> usize {
        self.span_end - self.span_start + 1
    }
}

/// A single photometry row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Modified Julian date of the exposure.
    pub mjd: f64,
    /// Filter band as stored in `FLT`, trimmed.
    pub band: String,
    /// Survey field identifier.
    pub field: String,
    /// Detection state.
    pub flag: PhotFlag,
    /// Photometric probability.
    pub photprob: f64,
    /// Calibrated flux.
    pub flux: f64,
    /// Calibrated flux uncertainty.
    pub flux_err: f64,
    /// PSF width parameter.
    pub psf_sig1: f64,
    /// Sky noise, when the table carries `SKY_SIG`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sky_sig: Option<f64>,
    /// Photometric zero point as stored.
    pub zero_point: f64,
    /// Simulated observed magnitude, only for simulated sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sim_magobs: Option<f64>,
}

impl Observation {
    /// Band name in the `<prefix><lowercase band>` convention, e.g. `lsstg`.
    pub fn prefixed_band(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.band.trim().to_lowercase())
    }
}

/// Sorts observations by ascending MJD, keeping table order for equal timestamps.
pub fn sort_observations(observations: &mut [Observation]) {
    // slice::sort_by is stable
    observations.sort_by(|a, b| a.mjd.total_cmp(&b.mjd));
}

/// Header metadata joined with its time ordered photometry.
///
/// Deserializing goes through [`LightCurve::new`], so decoded curves are
/// sorted as well.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightCurve {
    record: ObjectRecord,
    observations: Vec<Observation>,
}

impl<'de> Deserialize<'de> for LightCurve {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Parts {
            record: ObjectRecord,
            observations: Vec<Observation>,
        }

        let parts = Parts::deserialize(deserializer)?;
        Ok(LightCurve::new(parts.record, parts.observations))
    }
}

impl LightCurve {
    /// Builds a light curve, sorting the observations by MJD.
    pub fn new(record: ObjectRecord, mut observations: Vec<Observation>) -> Self {
        sort_observations(&mut observations);
        Self {
            record,
            observations,
        }
    }

    /// Header metadata of the object.
    pub fn record(&self) -> &ObjectRecord {
        &self.record
    }

    /// Object identifier.
    pub fn snid(&self) -> i64 {
        self.record.snid
    }

    /// Observations in ascending MJD order.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// True when the curve carries no observations.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Observation timestamps in curve order.
    pub fn mjds(&self) -> Vec<f64> {
        self.observations.iter().map(|obs| obs.mjd).collect()
    }

    /// Distinct bands in order of first appearance.
    pub fn bands(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.observations
            .iter()
            .map(|obs| obs.band.as_str())
            .filter(|band| seen.insert(*band))
            .collect()
    }

    /// Observations flagged as detections or first triggers.
    pub fn detections(&self) -> impl Iterator<Item = &Observation> {
        self.observations.iter().filter(|obs| obs.flag.is_detection())
    }

    /// The first-trigger observation, if any.
    pub fn first_trigger(&self) -> Option<&Observation> {
        self.observations
            .iter()
            .find(|obs| obs.flag == PhotFlag::FirstTrigger)
    }

    /// Consumes the curve, returning its parts.
    pub fn into_parts(self) -> (ObjectRecord, Vec<Observation>) {
        (self.record, self.observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(mjd: f64, band: &str, flag: PhotFlag) -> Observation {
        Observation {
            mjd,
            band: band.into(),
            field: "WFD".into(),
            flag,
            photprob: 1.0,
            flux: 10.0,
            flux_err: 1.0,
            psf_sig1: 2.0,
            sky_sig: None,
            zero_point: NOMINAL_ZERO_POINT,
            sim_magobs: None,
        }
    }

    fn record() -> ObjectRecord {
        ObjectRecord {
            snid: 7,
            ra: 10.0,
            decl: -30.0,
            mwebv: 0.02,
            model_code: Some(11),
            model_name: "SALT2".into(),
            redshift: None,
            span_start: 0,
            span_end: 2,
        }
    }

    #[test]
    fn flag_codes_round_trip() {
        for flag in [
            PhotFlag::NonDetection,
            PhotFlag::Detection,
            PhotFlag::FirstTrigger,
        ] {
            assert_eq!(PhotFlag::from_code(flag.code()), Some(flag));
        }
        assert!(PhotFlag::try_from(12).is_err());
    }

    #[test]
    fn curve_sorts_and_reports_bands() {
        let curve = LightCurve::new(
            record(),
            vec![
                obs(3.0, "r", PhotFlag::Detection),
                obs(1.0, "g", PhotFlag::NonDetection),
                obs(2.0, "r", PhotFlag::FirstTrigger),
            ],
        );
        assert_eq!(curve.mjds(), vec![1.0, 2.0, 3.0]);
        assert_eq!(curve.bands(), vec!["g", "r"]);
        assert_eq!(curve.detections().count(), 2);
        assert_eq!(curve.first_trigger().map(|o| o.mjd), Some(2.0));
    }

    #[test]
    fn prefixed_band_lowercases_and_trims() {
        assert_eq!(obs(0.0, "G ", PhotFlag::Detection).prefixed_band("lsst"), "lsstg");
    }
}
