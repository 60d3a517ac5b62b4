use std::path::{Component, Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use snlc_core::errors::{ErrorInfo, LcError};
use walkdir::WalkDir;

const HEADER_SUFFIXES: [&str; 2] = ["HEAD.FITS", "HEAD.FITS.GZ"];

/// A header table and the photometry table it points into.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FilePair {
    /// Header table (`*HEAD.FITS`).
    pub header: PathBuf,
    /// Photometry table (`*PHOT.FITS`).
    pub photometry: PathBuf,
    /// Model code parsed from a `MODEL<nn>` path component.
    pub model_code: Option<i32>,
}

impl FilePair {
    /// Pairs a header file with its `PHOT` sibling.
    pub fn from_header(header: impl Into<PathBuf>) -> Self {
        let header = header.into();
        Self {
            photometry: photometry_path_for(&header),
            model_code: model_code_from_path(&header),
            header,
        }
    }
}

/// True for `*HEAD.FITS` and `*HEAD.FITS.gz`, ignoring case.
pub fn is_header_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| {
            let upper = name.to_ascii_uppercase();
            HEADER_SUFFIXES.iter().any(|suffix| upper.ends_with(suffix))
        })
        .unwrap_or(false)
}

/// Replaces the last `HEAD` in the file name with `PHOT`, keeping case.
pub fn photometry_path_for(header: &Path) -> PathBuf {
    let Some(name) = header.file_name().and_then(|name| name.to_str()) else {
        return header.to_path_buf();
    };
    let upper = name.to_ascii_uppercase();
    let Some(pos) = upper.rfind("HEAD") else {
        return header.to_path_buf();
    };
    let original = &name[pos..pos + 4];
    let replacement = if original == "head" { "phot" } else { "PHOT" };
    let renamed = format!("{}{}{}", &name[..pos], replacement, &name[pos + 4..]);
    header.with_file_name(renamed)
}

/// Model code from the last path component containing `MODEL<digits>`,
/// e.g. `LSST_WFD_MODEL11` gives 11.
pub fn model_code_from_path(path: &Path) -> Option<i32> {
    path.components().rev().find_map(|component| match component {
        Component::Normal(part) => part.to_str().and_then(parse_model_component),
        _ => None,
    })
}

fn parse_model_component(part: &str) -> Option<i32> {
    let pos = part.rfind("MODEL")?;
    let digits: String = part[pos + "MODEL".len()..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Finds every header/photometry pair under `root/cadence`, sorted by header path.
///
/// The photometry partner is not required to exist here; a missing partner
/// fails that pair when it is ingested.
pub fn discover_pairs(root: &Path, cadence: &str) -> Result<Vec<FilePair>, LcError> {
    let dir = root.join(cadence);
    if !dir.is_dir() {
        return Err(LcError::NotFound(
            ErrorInfo::new(
                "snlc_ingest.cadence_dir",
                format!("cadence {cadence} not found under {}", root.display()),
            )
            .with_path(&dir)
            .with_hint("download and extract the cadence archives into the data root"),
        ));
    }
    let mut pairs = Vec::new();
    for entry in WalkDir::new(&dir).follow_links(true) {
        let entry = entry.map_err(|err| {
            LcError::NotFound(
                ErrorInfo::new("snlc_ingest.walk", err.to_string()).with_path(&dir),
            )
        })?;
        if entry.file_type().is_file() && is_header_file(entry.path()) {
            pairs.push(FilePair::from_header(entry.path()));
        }
    }
    pairs.sort();
    debug!("found {} file pairs under {}", pairs.len(), dir.display());
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photometry_partner_keeps_case() {
        assert_eq!(
            photometry_path_for(Path::new("a/LSST_WFD_NONIa-0001_HEAD.FITS")),
            PathBuf::from("a/LSST_WFD_NONIa-0001_PHOT.FITS")
        );
        assert_eq!(
            photometry_path_for(Path::new("a/run_head.fits.gz")),
            PathBuf::from("a/run_phot.fits.gz")
        );
    }

    #[test]
    fn only_the_file_name_is_rewritten() {
        assert_eq!(
            photometry_path_for(Path::new("HEAD/x_HEAD.FITS")),
            PathBuf::from("HEAD/x_PHOT.FITS")
        );
    }

    #[test]
    fn model_code_from_directory() {
        assert_eq!(
            model_code_from_path(Path::new("/sims/kraken/LSST_WFD_MODEL11/x_HEAD.FITS")),
            Some(11)
        );
        assert_eq!(model_code_from_path(Path::new("/sims/x_HEAD.FITS")), None);
    }

    #[test]
    fn header_suffixes() {
        assert!(is_header_file(Path::new("x_HEAD.FITS")));
        assert!(is_header_file(Path::new("x_head.fits.gz")));
        assert!(!is_header_file(Path::new("x_PHOT.FITS")));
    }
}
