//! Whole-table conversion.
//!
//! Rows are converted independently. Each lands in either the valid or the
//! invalid partition, and a failing row never stops the others. Once every
//! row is classified, empty and non-numeric columns are dropped and the
//! converted table goes through the compliance checks.

use super::call::{NucleotidePart, ProteinPart, RowShape, VariantCall};
use super::row::{ConvertedRow, RowConverter};
use super::table::{is_identifier, is_null, ColumnType, MaveTable, RawTable, ERROR_DESCRIPTION, HGVS_NT, HGVS_PRO};
use crate::check::{ComplianceReport, ComplianceValidator};
use crate::config::{ConvertConfig, TableKind};
use crate::error::MaveError;
use crate::event::ProteinToken;
use crate::normalize::{protein_shift, OffsetResolver};
use crate::sequence::SequenceModel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

const PROGRESS_INTERVAL: usize = 100;

/// Where a table is in its conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConversionState {
    Pending,
    Parsing,
    /// Every row is in the valid or the invalid partition.
    RowsClassified,
    ComplianceCheck,
    Accepted,
    Rejected,
}

impl fmt::Display for ConversionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConversionState::Pending => "pending",
            ConversionState::Parsing => "parsing",
            ConversionState::RowsClassified => "rows classified",
            ConversionState::ComplianceCheck => "compliance check",
            ConversionState::Accepted => "accepted",
            ConversionState::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// What happened to one input row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversionOutcome {
    Valid {
        row_index: usize,
        hgvs_nt: Option<String>,
        hgvs_pro: Option<String>,
    },
    Invalid {
        row_index: usize,
        reason: String,
    },
}

impl ConversionOutcome {
    fn new(row_index: usize, result: Result<ConvertedRow, MaveError>) -> Self {
        match result {
            Ok(row) => ConversionOutcome::Valid {
                row_index,
                hgvs_nt: row.hgvs_nt,
                hgvs_pro: row.hgvs_pro,
            },
            Err(err) => ConversionOutcome::Invalid {
                row_index,
                reason: err.detailed_message(),
            },
        }
    }

    pub fn row_index(&self) -> usize {
        match self {
            ConversionOutcome::Valid { row_index, .. } | ConversionOutcome::Invalid { row_index, .. } => {
                *row_index
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ConversionOutcome::Valid { .. })
    }
}

/// Progress of a running conversion.
#[derive(Debug, Clone)]
pub struct ConversionProgress {
    pub total: usize,
    pub processed: usize,
    pub valid: usize,
    pub invalid: usize,
    pub elapsed: Duration,
}

impl ConversionProgress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.processed as f64 / self.total as f64) * 100.0
        }
    }
}

/// A converted table with its row outcomes and compliance report.
#[derive(Debug, Clone)]
pub struct DatasetResult {
    pub state: ConversionState,
    /// Accepted rows: identifier columns first, then the retyped data columns.
    pub table: MaveTable,
    /// Rejected rows with their original values and a reason column.
    pub invalid: RawTable,
    /// One outcome per input row, in input order.
    pub outcomes: Vec<ConversionOutcome>,
    pub report: ComplianceReport,
    /// The offset actually applied.
    pub offset: i64,
    pub duration: Duration,
}

impl DatasetResult {
    pub fn is_accepted(&self) -> bool {
        self.state == ConversionState::Accepted
    }

    pub fn valid_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_valid()).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.outcomes.len() - self.valid_count()
    }

    /// The converted table, or the compliance failure.
    pub fn into_table(self) -> Result<MaveTable, MaveError> {
        match self.report.to_error() {
            Some(err) => Err(err),
            None => Ok(self.table),
        }
    }

    fn set_state(&mut self, state: ConversionState) {
        transition(&mut self.state, state);
    }
}

fn transition(current: &mut ConversionState, next: ConversionState) {
    log::debug!("Conversion state {} -> {}", current, next);
    *current = next;
}

/// Converts raw tables against one target sequence.
///
/// # Example
///
/// ```
/// use ferro_mave::config::ConvertConfig;
/// use ferro_mave::convert::{DatasetConverter, RawTable};
/// use ferro_mave::sequence::SequenceModel;
///
/// let model = SequenceModel::coding("ATGAAATTTTGG").unwrap();
/// let raw = RawTable::from_rows(
///     &["hgvs", "score"],
///     &[vec!["c.4A>G", "0.5"], vec!["c.7T>G, c.8T>G", "1.2"]],
/// )
/// .unwrap();
///
/// let converter = DatasetConverter::new(&model, ConvertConfig::default()).unwrap();
/// let result = converter.convert(&raw).unwrap();
/// assert!(result.is_accepted());
/// assert_eq!(result.table.identifiers("hgvs_nt"), vec!["c.4A>G", "c.7_8delinsGG"]);
/// ```
#[derive(Debug, Clone)]
pub struct DatasetConverter<'a> {
    model: &'a SequenceModel,
    config: ConvertConfig,
}

impl<'a> DatasetConverter<'a> {
    pub fn new(model: &'a SequenceModel, config: ConvertConfig) -> Result<Self, MaveError> {
        config.validate()?;
        Ok(Self { model, config })
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Convert every row of `table`.
    ///
    /// Fails only when the table cannot be processed at all: the identifier
    /// column is missing or no offset fits the data. Row failures end up in
    /// the invalid partition.
    pub fn convert(&self, table: &RawTable) -> Result<DatasetResult, MaveError> {
        #[cfg(feature = "parallel")]
        {
            self.run(table, |converter, cells| {
                crate::parallel::convert_rows_parallel(converter, cells)
            })
        }
        #[cfg(not(feature = "parallel"))]
        {
            self.convert_with_progress(table, |_| {})
        }
    }

    /// Convert every row sequentially, reporting progress.
    pub fn convert_with_progress<F>(
        &self,
        table: &RawTable,
        mut progress_fn: F,
    ) -> Result<DatasetResult, MaveError>
    where
        F: FnMut(ConversionProgress),
    {
        self.run(table, |converter, cells| {
            let start = Instant::now();
            let total = cells.len();
            let mut results = Vec::with_capacity(total);
            let (mut valid, mut invalid) = (0, 0);
            for (i, cell) in cells.iter().enumerate() {
                let result = converter.convert(cell);
                if result.is_ok() {
                    valid += 1;
                } else {
                    invalid += 1;
                }
                results.push(result);

                if (i + 1) % PROGRESS_INTERVAL == 0 || i + 1 == total {
                    progress_fn(ConversionProgress {
                        total,
                        processed: i + 1,
                        valid,
                        invalid,
                        elapsed: start.elapsed(),
                    });
                }
            }
            results
        })
    }

    /// Convert a scores table and its counts table, then require both to
    /// define the same variants.
    ///
    /// The counts table reuses the offset chosen for the scores table.
    pub fn convert_pair(
        &self,
        scores: &RawTable,
        counts: &RawTable,
    ) -> Result<(DatasetResult, DatasetResult), MaveError> {
        let mut scores_result = self.convert(scores)?;
        let counts_config = self
            .config
            .clone()
            .with_table_kind(TableKind::Counts)
            .with_offset(scores_result.offset)
            .with_auto_offset(false);
        let mut counts_result = DatasetConverter {
            model: self.model,
            config: counts_config,
        }
        .convert(counts)?;

        let mismatches = ComplianceValidator::cross_check(&scores_result.table, &counts_result.table);
        if !mismatches.is_empty() {
            log::warn!("Scores and counts define different variants");
            for result in [&mut scores_result, &mut counts_result] {
                result.report.variant_set_mismatches = mismatches.clone();
                result.set_state(ConversionState::Rejected);
            }
        }
        Ok((scores_result, counts_result))
    }

    fn run<C>(&self, table: &RawTable, classify: C) -> Result<DatasetResult, MaveError>
    where
        C: FnOnce(&RowConverter<'a>, &[&str]) -> Vec<Result<ConvertedRow, MaveError>>,
    {
        let start = Instant::now();
        let mut state = ConversionState::Pending;

        let hgvs_column = self.config.hgvs_column.as_str();
        let cells = table.column(hgvs_column).ok_or_else(|| MaveError::MissingColumn {
            column: hgvs_column.to_string(),
        })?;

        let mut converter = RowConverter::new(self.model, &self.config)?;
        if self.config.auto_offset {
            let offset = self.search_offset(&converter, &cells)?;
            converter = converter.with_offset(offset);
        }

        transition(&mut state, ConversionState::Parsing);
        let outcomes: Vec<ConversionOutcome> = classify(&converter, cells.as_slice())
            .into_iter()
            .enumerate()
            .map(|(i, result)| ConversionOutcome::new(i, result))
            .collect();
        transition(&mut state, ConversionState::RowsClassified);

        let (valid, invalid) = self.partition(table, &outcomes)?;
        let invalid_rows = invalid.len();
        if invalid_rows > 0 {
            log::warn!("{} of {} rows could not be converted", invalid_rows, table.len());
        }

        let mut converted = MaveTable::from_raw(&valid);
        self.tidy(&mut converted);

        transition(&mut state, ConversionState::ComplianceCheck);
        let report = ComplianceValidator::from_config(&self.config).validate(&converted);

        let mut result = DatasetResult {
            state,
            table: converted,
            invalid,
            outcomes,
            report,
            offset: converter.offset(),
            duration: Duration::ZERO,
        };
        if result.report.is_compliant() {
            result.set_state(ConversionState::Accepted);
        } else {
            result.set_state(ConversionState::Rejected);
        }
        result.duration = start.elapsed();
        Ok(result)
    }

    /// Pick the offset that best fits the table's events.
    ///
    /// Nucleotide events decide when any exist; otherwise protein-only rows
    /// decide in whole codons.
    fn search_offset(&self, converter: &RowConverter<'_>, cells: &[&str]) -> Result<i64, MaveError> {
        let mut nt = Vec::new();
        let mut pro = Vec::new();
        for cell in cells.iter().filter(|c| !is_null(c)) {
            let Ok(call) = VariantCall::parse(cell, converter.element()) else {
                continue;
            };
            match (call.shape, call.nt, call.pro) {
                (RowShape::Nucleotide | RowShape::Mixed, NucleotidePart::Events(events), _) => {
                    nt.extend(
                        events
                            .iter()
                            .filter_map(|e| converter.to_one_based(e).ok())
                            .filter(|e| e.position() >= 1),
                    );
                }
                (RowShape::Protein, _, ProteinPart::Events(tokens)) => {
                    pro.extend(tokens.into_iter().filter_map(|t| match t {
                        ProteinToken::Event(e) => Some(e),
                        _ => None,
                    }));
                }
                _ => {}
            }
        }

        let declared = converter.offset();
        let resolver = OffsetResolver::new(self.model);
        let resolved = if !nt.is_empty() {
            resolver.resolve(&nt, -declared).map(|c| -c.offset)
        } else if !pro.is_empty() {
            resolver
                .resolve(&pro, -protein_shift(declared))
                .map(|c| -c.offset * 3)
        } else {
            Ok(declared)
        };
        let resolved = resolved.map_err(|err| match err {
            MaveError::UnresolvableOffset { best_hit_rate, .. } => MaveError::UnresolvableOffset {
                declared,
                best_hit_rate,
            },
            other => other,
        })?;

        if resolved != declared {
            log::warn!(
                "Declared offset {} does not fit the target; using offset {}",
                declared,
                resolved
            );
        }
        Ok(resolved)
    }

    /// Split rows into the valid table (identifier columns first) and the
    /// invalid table (original columns plus the reason).
    fn partition(
        &self,
        table: &RawTable,
        outcomes: &[ConversionOutcome],
    ) -> Result<(RawTable, RawTable), MaveError> {
        let hgvs_column = self.config.hgvs_column.as_str();
        let data: Vec<usize> = table
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.as_str() != hgvs_column && !is_identifier(c))
            .map(|(i, _)| i)
            .collect();

        let mut valid_columns = vec![HGVS_NT.to_string(), HGVS_PRO.to_string()];
        valid_columns.extend(data.iter().map(|&i| table.columns()[i].clone()));
        let mut invalid_columns = table.columns().to_vec();
        invalid_columns.push(ERROR_DESCRIPTION.to_string());

        let mut valid_rows = Vec::new();
        let mut invalid_rows = Vec::new();
        for (outcome, row) in outcomes.iter().zip(table.rows()) {
            match outcome {
                ConversionOutcome::Valid {
                    hgvs_nt, hgvs_pro, ..
                } => {
                    let mut values = vec![
                        hgvs_nt.clone().unwrap_or_default(),
                        hgvs_pro.clone().unwrap_or_default(),
                    ];
                    values.extend(data.iter().map(|&i| row[i].clone()));
                    valid_rows.push(values);
                }
                ConversionOutcome::Invalid { reason, .. } => {
                    let mut values = row.clone();
                    values.push(reason.clone());
                    invalid_rows.push(values);
                }
            }
        }

        Ok((
            RawTable::new(valid_columns, valid_rows)?,
            RawTable::new(invalid_columns, invalid_rows)?,
        ))
    }

    /// Drop empty columns, non-numeric data columns when configured, and
    /// rows without any data.
    fn tidy(&self, table: &mut MaveTable) {
        let empty: Vec<String> = table
            .columns()
            .iter()
            .zip(table.types())
            .filter(|(_, t)| **t == ColumnType::Empty)
            .map(|(c, _)| c.clone())
            .collect();
        for column in empty {
            log::warn!("Dropping column '{}': every value is null", column);
            table.drop_column(&column);
        }

        if self.config.drop_non_numeric {
            let text: Vec<String> = table
                .data_columns()
                .filter(|(_, t)| !t.is_numeric())
                .map(|(c, _)| c.to_string())
                .collect();
            for column in text {
                log::warn!("Dropping non-numeric column '{}'", column);
                table.drop_column(&column);
            }
        }

        if table.data_columns().next().is_some() {
            let dropped = table.retain_rows(|columns, row| {
                columns
                    .iter()
                    .zip(row)
                    .any(|(c, cell)| !is_identifier(c) && !cell.is_null())
            });
            if dropped > 0 {
                log::warn!("Dropped {} row(s) with no data values", dropped);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ElementKind;
    use crate::convert::table::Cell;

    // Met Lys Phe Trp Gly Ala Ser Tyr Cys His Ile Val
    const SEQ: &str = "ATGAAATTTTGGGGTGCTTCTTATTGTCATATTGTT";

    fn model() -> SequenceModel {
        SequenceModel::coding(SEQ).unwrap()
    }

    fn raw(columns: &[&str], rows: &[Vec<&str>]) -> RawTable {
        RawTable::from_rows(columns, rows).unwrap()
    }

    fn convert(config: ConvertConfig, table: &RawTable) -> Result<DatasetResult, MaveError> {
        let model = model();
        DatasetConverter::new(&model, config)?.convert(table)
    }

    #[test]
    fn test_accepted_table() {
        let table = raw(
            &["hgvs", "score", "se"],
            &[
                vec!["c.4A>G", "0.5", "0.1"],
                vec!["c.7T>G, c.8T>G", "1.5", "0.2"],
                vec!["_wt", "0", "0"],
            ],
        );
        let result = convert(ConvertConfig::default(), &table).unwrap();
        assert_eq!(result.state, ConversionState::Accepted);
        assert_eq!(result.valid_count(), 3);
        assert_eq!(
            result.table.identifiers(HGVS_NT),
            vec!["c.4A>G", "c.7_8delinsGG", "_wt"]
        );
        // Only the special row has a protein identifier.
        assert_eq!(result.table.identifiers(HGVS_PRO), vec!["_wt"]);
        assert_eq!(result.table.column_type("score"), Some(ColumnType::Float));
        assert!(result.invalid.is_empty());
    }

    #[test]
    fn test_row_isolation() {
        let table = raw(
            &["hgvs", "score"],
            &[
                vec!["c.4A>G", "1"],
                vec!["c.5A>G", "2"],
                vec!["c.9X>G", "3"],
                vec!["c.7T>G", "4"],
            ],
        );
        let result = convert(ConvertConfig::default(), &table).unwrap();
        assert_eq!(result.valid_count(), 3);
        assert_eq!(result.invalid.len(), 1);
        assert_eq!(result.invalid.rows()[0][0], "c.9X>G");
        assert_eq!(
            result.invalid.columns().last().map(String::as_str),
            Some(ERROR_DESCRIPTION)
        );
        match &result.outcomes[2] {
            ConversionOutcome::Invalid { row_index, reason } => {
                assert_eq!(*row_index, 2);
                assert!(!reason.is_empty());
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(result.is_accepted());
        assert_eq!(
            result.table.identifiers(HGVS_NT),
            vec!["c.4A>G", "c.5A>G", "c.7T>G"]
        );
    }

    #[test]
    fn test_missing_score_column_rejects_but_keeps_rows() {
        let table = raw(&["hgvs", "count"], &[vec!["c.4A>G", "1"], vec!["c.4T>G", "2"]]);
        let result = convert(ConvertConfig::default(), &table).unwrap();
        assert_eq!(result.state, ConversionState::Rejected);
        assert!(result.report.reasons()[0].contains("'score'"));
        assert_eq!(result.outcomes.len(), 2);
        assert_eq!(result.invalid_count(), 1);
        assert!(result.into_table().is_err());
    }

    #[test]
    fn test_missing_hgvs_column() {
        let table = raw(&["variant", "score"], &[vec!["c.4A>G", "1"]]);
        assert!(matches!(
            convert(ConvertConfig::default(), &table),
            Err(MaveError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_columns_and_rows_tidied() {
        let table = raw(
            &["hgvs", "score", "note", "empty"],
            &[
                vec!["c.4A>G", "1", "high", "NA"],
                vec!["c.5A>G", "NA", "low", ""],
                vec!["c.7T>G", "2", "low", "nan"],
            ],
        );
        let result = convert(ConvertConfig::default(), &table).unwrap();
        assert_eq!(
            result.table.columns(),
            &[HGVS_NT.to_string(), "score".to_string()]
        );
        // The row without a score is gone.
        assert_eq!(result.table.len(), 2);
        assert_eq!(result.table.rows()[1][1], Cell::Int(2));
    }

    #[test]
    fn test_non_numeric_kept_when_configured() {
        let table = raw(&["hgvs", "score", "note"], &[vec!["c.4A>G", "1", "high"]]);
        let config = ConvertConfig::new().with_drop_non_numeric(false);
        let result = convert(config, &table).unwrap();
        assert_eq!(result.state, ConversionState::Rejected);
        assert_eq!(result.report.non_numeric_columns, vec!["note".to_string()]);
    }

    #[test]
    fn test_auto_offset_recovers() {
        let table = raw(
            &["hgvs", "score"],
            &[vec!["c.4A>G", "1"], vec!["c.7T>G", "2"], vec!["c.10T>G", "3"]],
        );
        let config = ConvertConfig::new().with_offset(3).with_auto_offset(true);
        let result = convert(config, &table).unwrap();
        assert_eq!(result.offset, 0);
        assert_eq!(
            result.table.identifiers(HGVS_NT),
            vec!["c.4A>G", "c.7T>G", "c.10T>G"]
        );
    }

    #[test]
    fn test_auto_offset_unresolvable() {
        let table = raw(&["hgvs", "score"], &[vec!["c.1T>G", "1"], vec!["c.2A>G", "2"]]);
        let config = ConvertConfig::new().with_auto_offset(true);
        assert!(matches!(
            convert(config, &table),
            Err(MaveError::UnresolvableOffset { declared: 0, .. })
        ));
    }

    #[test]
    fn test_auto_offset_from_protein_rows() {
        let table = raw(
            &["hgvs", "score"],
            &[vec!["p.Lys2Asn", "1"], vec!["p.Phe3Leu", "2"]],
        );
        let config = ConvertConfig::new().with_offset(3).with_auto_offset(true);
        let result = convert(config, &table).unwrap();
        assert_eq!(result.offset, 0);
        assert_eq!(
            result.table.identifiers(HGVS_PRO),
            vec!["p.Lys2Asn", "p.Phe3Leu"]
        );
    }

    #[test]
    fn test_mixed_rows() {
        let table = raw(
            &["hgvs", "score"],
            &[
                vec!["c.6A>G (p.=)", "0.1"],
                vec!["c.4A>T (p.Lys2Ter)", "-2"],
            ],
        );
        let result = convert(ConvertConfig::default(), &table).unwrap();
        assert!(result.is_accepted(), "{:?}", result.report.reasons());
        assert_eq!(
            result.table.identifiers(HGVS_PRO),
            vec!["p.Lys2=", "p.Lys2Ter"]
        );
    }

    #[test]
    fn test_synonymous_element() {
        let table = raw(&["hgvs", "score"], &[vec!["_wt", "1"], vec!["_sy", "2"]]);
        let config = ConvertConfig::new().with_element(ElementKind::Synonymous);
        let result = convert(config, &table).unwrap();
        assert!(!result.table.has_column(HGVS_NT));
        assert_eq!(result.table.identifiers(HGVS_PRO), vec!["_sy", "_sy"]);
        // Protein duplicates only warn.
        assert!(result.is_accepted());
        assert!(!result.report.warnings.is_empty());
    }

    #[test]
    fn test_progress_reported() {
        let table = raw(&["hgvs", "score"], &[vec!["c.4A>G", "1"], vec!["bad", "2"]]);
        let model = model();
        let converter = DatasetConverter::new(&model, ConvertConfig::default()).unwrap();
        let mut last = None;
        converter
            .convert_with_progress(&table, |p| last = Some(p))
            .unwrap();
        let last = last.unwrap();
        assert_eq!(last.processed, 2);
        assert_eq!((last.valid, last.invalid), (1, 1));
        assert_eq!(last.percent(), 100.0);
    }

    #[test]
    fn test_pair_mismatch_rejects_both() {
        let scores = raw(&["hgvs", "score"], &[vec!["c.4A>G", "1"], vec!["c.5A>G", "2"]]);
        let counts = raw(&["hgvs", "count"], &[vec!["c.4A>G", "10"]]);
        let model = model();
        let converter = DatasetConverter::new(&model, ConvertConfig::default()).unwrap();
        let (s, c) = converter.convert_pair(&scores, &counts).unwrap();
        assert_eq!(s.state, ConversionState::Rejected);
        assert_eq!(c.state, ConversionState::Rejected);
        assert!(s.report.variant_set_mismatches[0].contains("c.5A>G"));

        let (s, c) = converter.convert_pair(&scores, &scores).unwrap();
        assert!(s.is_accepted());
        // A counts table needs no score column, but this one has it anyway.
        assert!(c.is_accepted());
    }

    #[test]
    fn test_invalid_coding_offset() {
        let model = model();
        assert!(matches!(
            DatasetConverter::new(&model, ConvertConfig::new().with_offset(4)),
            Err(MaveError::InvalidOffset { .. })
        ));
    }
}
