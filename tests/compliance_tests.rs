//! Compliance checks on converted tables read from disk.

use ferro_mave::check::{ComplianceReport, MAX_ERROR_VARIANTS};
use ferro_mave::{io, ComplianceValidator, MaveError, MaveTable, TableKind};
use std::path::Path;
use tempfile::TempDir;

fn read(dir: &Path, name: &str, content: &str) -> MaveTable {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    MaveTable::from_raw(&io::read_table(&path).unwrap())
}

#[test]
fn test_converted_scores_table_is_compliant() {
    let dir = TempDir::new().unwrap();
    let table = read(
        dir.path(),
        "scores.csv",
        "hgvs_nt,hgvs_pro,score,SE\n\
         c.4A>G,p.Lys2Arg,0.5,0.1\n\
         c.[4A>T;12G>A],p.[Lys2Ter;Trp4Ter],-2.0,0.3\n\
         _wt,_wt,0.0,0.0\n",
    );
    let report = ComplianceValidator::new(TableKind::Scores).validate(&table);
    assert!(report.is_compliant(), "{:?}", report.reasons());
    assert_eq!(report.primary_column.as_deref(), Some("hgvs_nt"));
    assert!(report.to_error().is_none());
}

#[test]
fn test_empty_nucleotide_column_makes_protein_primary() {
    let dir = TempDir::new().unwrap();
    let table = read(
        dir.path(),
        "scores.tsv",
        "hgvs_nt\thgvs_pro\tscore\n\tp.Lys2Arg\t1\n\tp.Lys2Arg\t2\n",
    );
    let report = ComplianceValidator::new(TableKind::Scores).validate(&table);
    assert_eq!(report.primary_column.as_deref(), Some("hgvs_pro"));
    assert_eq!(report.duplicate_warnings, vec!["p.Lys2Arg".to_string()]);
    assert!(report.is_compliant());
}

#[test]
fn test_violations_are_collected_together() {
    let dir = TempDir::new().unwrap();
    let table = read(
        dir.path(),
        "scores.csv",
        "hgvs_nt,score,note\n\
         c.1A>G,1,a\n\
         c.1A>G,2,b\n\
         ,3,c\n\
         c.2AG,4,d\n",
    );
    let report = ComplianceValidator::new(TableKind::Scores).validate(&table);
    assert!(!report.is_compliant());
    assert_eq!(report.null_primary_rows, vec![2]);
    assert_eq!(report.duplicate_identifiers, vec!["c.1A>G".to_string()]);
    assert_eq!(report.non_numeric_columns, vec!["note".to_string()]);
    assert_eq!(report.invalid_identifiers, vec!["c.2AG".to_string()]);

    let Some(MaveError::ComplianceViolation { reasons }) = report.to_error() else {
        panic!("expected a compliance violation");
    };
    assert_eq!(reasons, report.reasons());
    assert_eq!(reasons.len(), 4);
}

#[test]
fn test_custom_score_column() {
    let dir = TempDir::new().unwrap();
    let table = read(dir.path(), "scores.csv", "hgvs_nt,log_ratio\nc.1A>G,0.2\n");
    assert!(!ComplianceValidator::new(TableKind::Scores)
        .validate(&table)
        .is_compliant());
    assert!(ComplianceValidator::new(TableKind::Scores)
        .with_score_column("log_ratio")
        .validate(&table)
        .is_compliant());
}

#[test]
fn test_paired_tables_mismatch_is_bounded() {
    let dir = TempDir::new().unwrap();
    let mut scores = String::from("hgvs_nt,score\n");
    for i in 1..=8 {
        scores.push_str(&format!("c.{}A>G,1\n", i));
    }
    let scores = read(dir.path(), "scores.csv", &scores);
    let counts = read(dir.path(), "counts.csv", "hgvs_nt,c_0\nc.1A>G,4\n");

    let mismatches = ComplianceValidator::cross_check(&scores, &counts);
    assert_eq!(mismatches.len(), 1);
    assert!(mismatches[0].starts_with("'hgvs_nt' values only in the first table"));
    assert!(mismatches[0].ends_with(", ..."));
    assert_eq!(mismatches[0].matches("A>G").count(), MAX_ERROR_VARIANTS);
}

#[test]
fn test_report_serializes() {
    let report = ComplianceReport {
        missing_columns: vec!["score".to_string()],
        ..Default::default()
    };
    let json = serde_json::to_string(&report).unwrap();
    let back: ComplianceReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
    assert!(!back.is_compliant());
}
