//! Table conversion tests
//!
//! End-to-end conversion of Enrich2-style tables: reading, converting,
//! partitioning, compliance, and writing.

use ferro_mave::convert::{ConversionOutcome, ConversionState, HGVS_NT, HGVS_PRO};
use ferro_mave::event::{CoordinatePrefix, NucleotideEvent};
use ferro_mave::normalize::{group_by_codon, OffsetResolver, SilentInference, VariantAssembler};
use ferro_mave::sequence::Base;
use ferro_mave::{io, ConvertConfig, DatasetConverter, ElementKind, MaveError, RawTable, SequenceModel, TableKind};
use rstest::rstest;
use tempfile::TempDir;

// Met Lys Phe Trp Gly Ala Ser Tyr Cys His Ile Val
const TARGET: &str = "ATGAAATTTTGGGGTGCTTCTTATTGTCATATTGTT";

fn model() -> SequenceModel {
    SequenceModel::coding(TARGET).unwrap()
}

fn raw(columns: &[&str], rows: &[Vec<&str>]) -> RawTable {
    RawTable::from_rows(columns, rows).unwrap()
}

fn sub(position: i64, reference: Base, alternate: Base) -> NucleotideEvent {
    NucleotideEvent::substitution(CoordinatePrefix::Coding, position, reference, alternate)
}

// =============================================================================
// Concrete scenarios
// =============================================================================

#[test]
fn test_silent_start_codon_infers_met1() {
    let model = model();
    let events = [
        sub(1, Base::A, Base::A),
        sub(2, Base::T, Base::T),
        sub(3, Base::G, Base::G),
    ];
    let groups = group_by_codon(&events).unwrap();
    let inferred = SilentInference::new(&model).infer(&groups[0]).unwrap();
    assert_eq!(inferred.edit(), "Met1=");
    assert_eq!(inferred.to_string(), "p.Met1=");
}

#[test]
fn test_adjacent_codon_events_collapse() {
    let events = [sub(4, Base::T, Base::G), sub(5, Base::T, Base::G)];
    assert_eq!(
        VariantAssembler::new().assemble_nucleotide(&events).unwrap(),
        "c.4_5delinsGG"
    );
}

#[test]
fn test_gapped_codon_events_stay_separate() {
    let events = [sub(7, Base::G, Base::A), sub(9, Base::T, Base::A)];
    assert_eq!(
        VariantAssembler::new().assemble_nucleotide(&events).unwrap(),
        "c.[7G>A;9T>A]"
    );
}

#[test]
fn test_offset_search_falls_back_to_zero() {
    let model = model();
    // Correct as written; a declared shift of 1 puts every event on the
    // wrong base.
    let events = [
        sub(1, Base::A, Base::G),
        sub(3, Base::G, Base::A),
        sub(6, Base::A, Base::G),
    ];
    let resolver = OffsetResolver::new(&model);
    assert_eq!(resolver.score(&events, 1).hit_rate, 0.0);
    let chosen = resolver.resolve_with_search(&events, 1).unwrap();
    assert_eq!(chosen.offset, 0);
    assert_eq!(chosen.hit_rate, 1.0);
}

#[test]
fn test_missing_score_column_still_reports_rows() {
    let table = raw(
        &["hgvs", "se"],
        &[vec!["c.4A>G", "0.1"], vec!["c.4Q>G", "0.2"]],
    );
    let model = model();
    let result = DatasetConverter::new(&model, ConvertConfig::default())
        .unwrap()
        .convert(&table)
        .unwrap();

    assert_eq!(result.state, ConversionState::Rejected);
    assert!(result.report.missing_columns.contains(&"score".to_string()));
    assert!(result.report.reasons().iter().any(|r| r.contains("score")));
    assert_eq!(result.outcomes.len(), 2);
    assert!(result.outcomes[0].is_valid());
    assert!(!result.outcomes[1].is_valid());
}

// =============================================================================
// Row isolation
// =============================================================================

#[test]
fn test_unparsable_row_is_isolated() {
    let table = raw(
        &["hgvs", "score"],
        &[
            vec!["c.1A>G", "1"],
            vec!["c.4A>G", "2"],
            vec!["c.7T>G", "3"],
            vec!["c.10T>", "4"],
            vec!["c.13G>A", "5"],
        ],
    );
    let model = model();
    let result = DatasetConverter::new(&model, ConvertConfig::default())
        .unwrap()
        .convert(&table)
        .unwrap();

    assert_eq!(
        result.table.identifiers(HGVS_NT),
        vec!["c.1A>G", "c.4A>G", "c.7T>G", "c.13G>A"]
    );
    assert_eq!(result.invalid.len(), 1);
    assert_eq!(result.invalid.rows()[0][0], "c.10T>");
    let reasons: Vec<_> = result
        .outcomes
        .iter()
        .filter_map(|o| match o {
            ConversionOutcome::Invalid { row_index, reason } => Some((*row_index, reason.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(reasons.len(), 1);
    assert_eq!(reasons[0].0, 3);
    assert!(reasons[0].1.starts_with("[E1001]"));
}

// =============================================================================
// Enrich2 tables
// =============================================================================

#[rstest]
#[case("c.4A>G", Some("c.4A>G"), None)]
#[case("c.4A>T, c.6A>G", Some("c.[4A>T;6A>G]"), None)]
#[case("c.7T>G, c.8T>G, c.9T>G", Some("c.7_9delinsGGG"), None)]
#[case("p.Phe3Leu", None, Some("p.Phe3Leu"))]
#[case("p.Lys2Asn, p.Phe3Leu", None, Some("p.[Lys2Asn;Phe3Leu]"))]
#[case("c.4A>T (p.Lys2Ter)", Some("c.4A>T"), Some("p.Lys2Ter"))]
#[case("c.9T>C (p.=)", Some("c.9T>C"), Some("p.Phe3="))]
#[case("c.4A>T (p.Lys2Ter), c.12G>A (p.Trp4Ter)", Some("c.[4A>T;12G>A]"), Some("p.[Lys2Ter;Trp4Ter]"))]
fn test_enrich2_rows(#[case] hgvs: &str, #[case] nt: Option<&str>, #[case] pro: Option<&str>) {
    let table = raw(&["hgvs", "score"], &[vec![hgvs, "1.0"]]);
    let model = model();
    let result = DatasetConverter::new(&model, ConvertConfig::default())
        .unwrap()
        .convert(&table)
        .unwrap();

    match &result.outcomes[0] {
        ConversionOutcome::Valid {
            hgvs_nt, hgvs_pro, ..
        } => {
            assert_eq!(hgvs_nt.as_deref(), nt);
            assert_eq!(hgvs_pro.as_deref(), pro);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_offset_and_zero_based_positions() {
    // 0-based positions, stated on a sequence with 3 extra leading bases.
    let table = raw(&["hgvs", "score"], &[vec!["c.6A>G", "1"], vec!["c.9T>C", "2"]]);
    let model = model();
    let config = ConvertConfig::new().with_offset(3).with_one_based(false);
    let result = DatasetConverter::new(&model, config)
        .unwrap()
        .convert(&table)
        .unwrap();
    assert_eq!(result.table.identifiers(HGVS_NT), vec!["c.4A>G", "c.7T>C"]);
}

#[test]
fn test_synonymous_element_table() {
    let table = raw(&["hgvs", "score"], &[vec!["_wt", "0.0"]]);
    let model = model();
    let config = ConvertConfig::new().with_element(ElementKind::Synonymous);
    let result = DatasetConverter::new(&model, config)
        .unwrap()
        .convert(&table)
        .unwrap();
    assert!(result.is_accepted());
    assert!(!result.table.has_column(HGVS_NT));
    assert_eq!(result.table.identifiers(HGVS_PRO), vec!["_sy"]);
}

#[test]
fn test_non_coding_target() {
    let model = SequenceModel::non_coding("ACGTACGTAC").unwrap();
    let table = raw(
        &["hgvs", "score"],
        &[vec!["n.2C>T", "1"], vec!["n.3G>A, n.4T>C", "2"], vec!["p.Thr1Ala", "3"]],
    );
    let config = ConvertConfig::new().with_coding(false);
    let result = DatasetConverter::new(&model, config)
        .unwrap()
        .convert(&table)
        .unwrap();
    // n. events are never collapsed into a delins.
    assert_eq!(
        result.table.identifiers(HGVS_NT),
        vec!["n.2C>T", "n.[3G>A;4T>C]"]
    );
    assert_eq!(result.invalid.len(), 1);
}

#[test]
fn test_counts_table_needs_no_score() {
    let table = raw(&["hgvs", "c_0", "c_1"], &[vec!["c.4A>G", "10", "12"]]);
    let model = model();
    let config = ConvertConfig::new().with_table_kind(TableKind::Counts);
    let result = DatasetConverter::new(&model, config)
        .unwrap()
        .convert(&table)
        .unwrap();
    assert!(result.is_accepted());
}

#[test]
fn test_unresolvable_offset_skips_table() {
    let table = raw(&["hgvs", "score"], &[vec!["c.1T>G", "1"], vec!["c.2A>C", "2"]]);
    let model = model();
    let config = ConvertConfig::new().with_auto_offset(true);
    let err = DatasetConverter::new(&model, config)
        .unwrap()
        .convert(&table)
        .unwrap_err();
    assert!(matches!(err, MaveError::UnresolvableOffset { .. }));
}

// =============================================================================
// Files
// =============================================================================

#[test]
fn test_files_round_trip() {
    let dir = TempDir::new().unwrap();
    let scores_path = dir.path().join("scores.tsv");
    let counts_path = dir.path().join("counts.tsv");
    std::fs::write(
        &scores_path,
        "hgvs\tscore\tSE\nc.4A>G\t0.25\t0.01\nc.7T>G, c.8T>G\t-1.5\t0.2\nc.4T>G\t1\t1\n",
    )
    .unwrap();
    std::fs::write(
        &counts_path,
        "hgvs\tc_0\nc.4A>G\t10\nc.7T>G, c.8T>G\t3\nc.4T>G\t1\n",
    )
    .unwrap();

    let model = model();
    let converter = DatasetConverter::new(&model, ConvertConfig::default()).unwrap();
    let scores = io::read_table(&scores_path).unwrap();
    let counts = io::read_table(&counts_path).unwrap();
    let (s, c) = converter.convert_pair(&scores, &counts).unwrap();
    assert!(s.is_accepted(), "{:?}", s.report.reasons());
    assert!(c.is_accepted(), "{:?}", c.report.reasons());

    let out = dir.path().join("out");
    io::write_table_to(&s.table, &out.join("mavedb_scores.csv")).unwrap();
    io::write_raw_to(&s.invalid, &out.join("mavedb_scores_invalid_rows.csv")).unwrap();

    let written = std::fs::read_to_string(out.join("mavedb_scores.csv")).unwrap();
    assert_eq!(
        written,
        "hgvs_nt,score,SE\nc.4A>G,0.25,0.01\nc.7_8delinsGG,-1.5,0.2\n"
    );
    let invalid = io::read_table(&out.join("mavedb_scores_invalid_rows.csv")).unwrap();
    assert_eq!(invalid.len(), 1);
    assert_eq!(
        invalid.columns().last().map(String::as_str),
        Some("error_description")
    );
    assert!(invalid.rows()[0][3].contains("Reference mismatch"));
}
