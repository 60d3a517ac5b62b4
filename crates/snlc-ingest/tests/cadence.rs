mod common;

use std::fs;

use common::{write_header, write_pair};
use snlc_core::LcError;
use snlc_ingest::{
    discover_pairs, ingest_pairs, CadenceData, IngestConfig, ModelCatalog, PairOutcome,
};
use tempfile::tempdir;

fn config(root: &std::path::Path, concurrency: usize) -> IngestConfig {
    IngestConfig {
        data_root: Some(root.to_path_buf()),
        concurrency,
        ..IngestConfig::default()
    }
}

fn seed(root: &std::path::Path) {
    let cadence = root.join("kraken_2026");
    write_pair(
        &cadence.join("LSST_WFD_MODEL11"),
        "LSST_WFD_NONIa-0001",
        &[(1, 1, 2, "SALT2"), (2, 3, 3, "SALT2")],
        &[(58001.0, "g", 0), (58000.0, "r", 4096), (58002.0, "i", 6144)],
    );
    write_pair(
        &cadence.join("LSST_WFD_MODEL51"),
        "LSST_WFD_NONIa-0001",
        &[(2, 1, 1, "KN"), (3, 2, 2, "KN")],
        &[(58010.0, "z", 0), (58011.0, "y", 0)],
    );
    let lonely = cadence.join("LSST_WFD_MODEL60");
    fs::create_dir_all(&lonely).expect("dir");
    write_header(&lonely.join("LSST_WFD_NONIa-0001_HEAD.FITS"), &[(9, 1, 1, "SLSN")]);
}

#[test]
fn discovery_is_sorted_and_parses_model_codes() {
    let dir = tempdir().expect("tmp");
    seed(dir.path());
    let pairs = discover_pairs(dir.path(), "kraken_2026").expect("discover");
    let codes: Vec<_> = pairs.iter().map(|pair| pair.model_code).collect();
    assert_eq!(codes, vec![Some(11), Some(51), Some(60)]);
    assert!(pairs[0]
        .photometry
        .ends_with("LSST_WFD_MODEL11/LSST_WFD_NONIa-0001_PHOT.FITS"));
}

#[test]
fn unknown_cadence_is_not_found() {
    let dir = tempdir().expect("tmp");
    let err = discover_pairs(dir.path(), "baseline").unwrap_err();
    assert!(matches!(err, LcError::NotFound(_)));
    assert!(err.info().hint.is_some());
}

#[test]
fn dispatch_keeps_pair_order_and_isolates_failures() {
    let dir = tempdir().expect("tmp");
    seed(dir.path());
    let pairs = discover_pairs(dir.path(), "kraken_2026").expect("discover");

    let serial = ingest_pairs(&pairs, &config(dir.path(), 1)).expect("serial");
    let parallel = ingest_pairs(&pairs, &config(dir.path(), 4)).expect("parallel");
    assert_eq!(serial, parallel);

    let order: Vec<_> = parallel.iter().map(|outcome| outcome.pair().clone()).collect();
    assert_eq!(order, pairs);
    assert!(matches!(parallel[0], PairOutcome::Ingested(_)));
    match &parallel[2] {
        PairOutcome::Failed(failure) => assert!(matches!(failure.error, LcError::NotFound(_))),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn cadence_data_merges_pairs() {
    let dir = tempdir().expect("tmp");
    seed(dir.path());
    let data = CadenceData::load(&config(dir.path(), 2), "kraken_2026").expect("load");

    assert_eq!(data.object_names(), vec![1, 2, 3]);
    assert_eq!(data.filter_set()[0], "lsstu");
    assert_eq!(data.failures().len(), 1);

    // SNID 2 is read from MODEL11 first; the MODEL51 copy is reported.
    let two = data.get_lightcurve(2).expect("snid 2");
    assert_eq!(two.record().model_name, "SALT2");
    assert_eq!(data.diagnostics().len(), 1);
    assert_eq!(data.diagnostics()[0].snid, Some(2));

    let one = data.get_lightcurve(1).expect("snid 1");
    assert_eq!(one.mjds(), vec![58000.0, 58001.0]);
    assert_eq!(one.record().model_code, Some(11));
    assert!(data.get_lightcurve(9).is_none());
}

#[test]
fn summary_counts_models_and_hashes_content() {
    let dir = tempdir().expect("tmp");
    seed(dir.path());
    let config = config(dir.path(), 1);
    let data = CadenceData::load(&config, "kraken_2026").expect("load");
    let summary = data.summary(&ModelCatalog::builtin()).expect("summary");

    assert_eq!(summary.objects, 3);
    assert_eq!(summary.observations, 4);
    assert_eq!(summary.pairs.len(), 3);
    assert!(!summary.pairs[2].ingested);

    // MODEL51 also carries SNID 2, which MODEL11 already supplied.
    assert_eq!(summary.pairs[1].light_curves, 1);
    assert_eq!(summary.pairs[1].observations, 1);
    assert_eq!(summary.pairs[1].diagnostics, 1);
    let per_pair: usize = summary.pairs.iter().map(|pair| pair.light_curves).sum();
    assert_eq!(per_pair, summary.objects);
    assert!(!summary.is_clean());
    let kn = summary
        .models
        .iter()
        .find(|model| model.model_name == "KN")
        .expect("KN");
    assert_eq!(kn.objects, 1);
    assert_eq!(kn.classes, vec!["KN".to_string()]);

    let again = CadenceData::load(&config, "kraken_2026")
        .expect("reload")
        .summary(&ModelCatalog::builtin())
        .expect("summary");
    assert_eq!(summary.provenance.content_hash, again.provenance.content_hash);
    assert_eq!(summary.provenance.content_hash.len(), 64);
}
