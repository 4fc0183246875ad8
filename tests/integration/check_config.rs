#![allow(missing_docs)]

use std::fs;

use sombra_consistency::{
    access::RecordFilter,
    logging::init_logging,
    options::{CheckOptions, ConfigError},
    types::CheckError,
};
use tempfile::TempDir;

#[test]
fn loads_options_from_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("consistency.toml");
    fs::write(
        &path,
        "max_findings = 12\nfilter = \"dynamic_properties_only\"\n",
    )
    .expect("write config");

    let options = CheckOptions::load(&path).expect("load config");

    assert_eq!(options.max_findings, 12);
    assert_eq!(options.filter, RecordFilter::DynamicPropertiesOnly);
    assert_eq!(options.chain_visit_budget, None);
    assert!(options.detect_cycles);
}

#[test]
fn parse_errors_name_the_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("broken.toml");
    fs::write(&path, "filter = \"sometimes\"\n").expect("write config");

    let err = CheckOptions::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("broken.toml"));

    let wrapped: CheckError = err.into();
    assert!(matches!(wrapped, CheckError::Config(_)));
}

#[test]
fn explicit_path_wins_over_default_location() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("explicit.toml");
    fs::write(&path, "chain_visit_budget = 500\n").expect("write config");

    let options = CheckOptions::load_or_default(Some(path)).expect("load config");
    assert_eq!(options.chain_visit_budget, Some(500));
}

#[test]
fn logging_rejects_bad_directives() {
    assert!(matches!(
        init_logging("sombra_consistency=notalevel"),
        Err(CheckError::Logging(_))
    ));
}
