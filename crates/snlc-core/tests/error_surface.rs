use snlc_core::errors::{Diagnostic, ErrorInfo, LcError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("path", "MODEL11/LSST_HEAD.FITS")
        .with_context("column", "SNID")
}

#[test]
fn file_level_families() {
    for err in [
        LcError::NotFound(sample_info("N001", "missing file")),
        LcError::Format(sample_info("F001", "not a table")),
        LcError::Schema(sample_info("S001", "missing column")),
    ] {
        assert!(err.is_file_level());
        assert!(!err.is_record_level());
        assert!(err.info().context.contains_key("path"));
    }
}

#[test]
fn record_level_families() {
    for err in [
        LcError::Range(sample_info("R001", "span past end")),
        LcError::Validation(sample_info("V001", "bad flag")),
    ] {
        assert!(err.is_record_level());
        assert!(!err.is_file_level());
    }
}

#[test]
fn column_not_found_surface() {
    let err = LcError::ColumnNotFound(sample_info("C001", "no such column"));
    assert_eq!(err.info().code, "C001");
    assert_eq!(err.family(), "column_not_found");
    assert!(!err.is_file_level() && !err.is_record_level());
}

#[test]
fn display_includes_context_and_hint() {
    let err = LcError::Config(ErrorInfo::new("K001", "no data root").with_hint("set CADENCE_SIMS"));
    let rendered = err.to_string();
    assert!(rendered.starts_with("config error: no data root (code: K001)"));
    assert!(rendered.ends_with("hint: set CADENCE_SIMS"));
}

#[test]
fn diagnostic_display_prefixes_location() {
    let diag = Diagnostic::new(LcError::Validation(ErrorInfo::new("V002", "inverted span")))
        .with_source("HEAD.FITS")
        .with_snid(100)
        .with_row(4);
    assert_eq!(
        diag.to_string(),
        "HEAD.FITS: snid 100: row 4: validation error: inverted span (code: V002)"
    );
}
