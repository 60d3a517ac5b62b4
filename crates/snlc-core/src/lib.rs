#![deny(missing_docs)]
#![doc = "Core error taxonomy and light-curve data types shared by the SNLC crates."]

pub mod errors;
pub mod provenance;
mod types;

pub use errors::{Diagnostic, ErrorInfo, LcError};
pub use provenance::{IngestProvenance, SchemaVersion};
pub use types::{
    sort_observations, LightCurve, ObjectRecord, Observation, PhotFlag, NOMINAL_ZERO_POINT,
    PHOTOMETRIC_SYSTEM,
};
