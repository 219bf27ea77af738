//! Integration tests for case-file loading from disk.

use std::io::Write;

use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

use carneades::{error::ConfigError, CaseFile, PropLiteral, ProofStandard, Resolution};

const SELF_DEFENSE_CASE: &str = r#"{
    "propositions": ["murder", "kill", "self_defense", "witness"],
    "assumptions": ["kill", "witness"],
    "arguments": [
        {"id": "charge", "conclusion": "murder",
         "premises": ["kill"], "exceptions": ["self_defense"], "weight": 0.8},
        {"id": "undercut", "conclusion": "self_defense",
         "premises": ["witness"], "weight": 0.6}
    ],
    "proofstandards": [
        {"proposition": "murder", "standard": "clear and convincing"}
    ],
    "issues": ["murder"]
}"#;

#[test]
fn test_load_case_file_from_disk() {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(SELF_DEFENSE_CASE.as_bytes()).expect("write");

    let case = CaseFile::from_path(file.path())
        .expect("file parses")
        .build()
        .expect("case builds");

    assert_eq!(case.graph.argument_count(), 2);
    assert_eq!(case.issues, vec![PropLiteral::new("murder")]);
    assert_eq!(
        case.standards.standard_for(&PropLiteral::new("murder")),
        ProofStandard::ClearAndConvincing
    );
}

#[test]
fn test_missing_file_reports_the_path() {
    let err = CaseFile::from_path("no/such/case.json").unwrap_err();
    match err {
        ConfigError::Io { path, .. } => assert_eq!(path, "no/such/case.json"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_loaded_case_supports_static_evaluation() {
    let case = CaseFile::from_json_str(SELF_DEFENSE_CASE)
        .unwrap()
        .build()
        .unwrap();
    let caes = case.caes();

    // the self-defense exception is provable, so the charge is undercut
    let murder = PropLiteral::new("murder");
    assert!(!caes.acceptable(&murder).unwrap());
    assert!(caes.acceptable(&PropLiteral::new("self_defense")).unwrap());
}

#[test]
fn test_loaded_case_supports_dialogues() {
    let case = CaseFile::from_json_str(SELF_DEFENSE_CASE)
        .unwrap()
        .build()
        .unwrap();

    let outcome = case.dialogue().run(&case.issues[0]).unwrap();
    assert_eq!(outcome.resolution, Resolution::Unresolved);
    assert!(outcome.graph.contains_argument("undercut"));
}

#[test]
fn test_graph_export_is_json_serializable() {
    let case = CaseFile::from_json_str(SELF_DEFENSE_CASE)
        .unwrap()
        .build()
        .unwrap();

    let export = case.graph.export();
    let json = serde_json::to_value(&export).unwrap();
    let nodes = json["nodes"].as_array().unwrap();
    let labels: Vec<_> = nodes.iter().map(|n| n["label"].as_str().unwrap()).collect();
    assert!(labels.contains(&"murder"));
    assert!(labels.contains(&"-murder"));
    assert!(labels.contains(&"charge"));
    assert!(json["edges"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["is_exception"].as_bool().unwrap()));
}
