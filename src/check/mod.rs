//! Dataset compliance checks for converted tables.
//!
//! A table is accepted when:
//!
//! - at least one identifier column defines variants, and the first such
//!   column (`hgvs_nt`, then `hgvs_pro`) has no null cells;
//! - that primary column has no duplicate values (duplicates in a protein
//!   primary column are only a warning);
//! - every data column is numeric;
//! - a scores table carries its score column;
//! - every identifier passes the MAVE-HGVS grammar.
//!
//! [`ComplianceValidator::cross_check`] compares a scores table with its
//! counts table.

use crate::config::{ConvertConfig, TableKind};
use crate::convert::table::{MaveTable, HGVS_NT, HGVS_PRO};
use crate::error::MaveError;
use crate::event::EventClass;
use crate::mave::{MaveHgvsGrammar, VariantGrammar};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Identifiers listed per problem before the list is cut short.
pub const MAX_ERROR_VARIANTS: usize = 5;

/// Everything the validator found wrong with one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// Required columns that are absent.
    pub missing_columns: Vec<String>,
    /// The identifier column that defines the variants, if any.
    pub primary_column: Option<String>,
    /// Row indices whose primary identifier is null.
    pub null_primary_rows: Vec<usize>,
    /// Fatal duplicates in the primary column.
    pub duplicate_identifiers: Vec<String>,
    /// Duplicates downgraded to a warning.
    pub duplicate_warnings: Vec<String>,
    pub non_numeric_columns: Vec<String>,
    /// Identifiers that fail the grammar.
    pub invalid_identifiers: Vec<String>,
    /// Differences against a paired table.
    pub variant_set_mismatches: Vec<String>,
    pub warnings: Vec<String>,
}

impl ComplianceReport {
    pub fn is_compliant(&self) -> bool {
        self.missing_columns.is_empty()
            && self.primary_column.is_some()
            && self.null_primary_rows.is_empty()
            && self.duplicate_identifiers.is_empty()
            && self.non_numeric_columns.is_empty()
            && self.invalid_identifiers.is_empty()
            && self.variant_set_mismatches.is_empty()
    }

    /// One line per violation.
    pub fn reasons(&self) -> Vec<String> {
        let mut reasons = Vec::new();
        for column in &self.missing_columns {
            reasons.push(format!("missing required column '{}'", column));
        }
        match &self.primary_column {
            None => reasons.push(format!(
                "neither '{}' nor '{}' defines any variants",
                HGVS_NT, HGVS_PRO
            )),
            Some(primary) if !self.null_primary_rows.is_empty() => reasons.push(format!(
                "primary column '{}' has null values in {} row(s): {}",
                primary,
                self.null_primary_rows.len(),
                bounded(self.null_primary_rows.iter().map(|r| r.to_string()))
            )),
            Some(_) => {}
        }
        if !self.duplicate_identifiers.is_empty() {
            reasons.push(format!(
                "found {} duplicate HGVS strings in '{}': {}",
                self.duplicate_identifiers.len(),
                self.primary_column.as_deref().unwrap_or(HGVS_NT),
                bounded(self.duplicate_identifiers.iter().cloned())
            ));
        }
        for column in &self.non_numeric_columns {
            reasons.push(format!("column '{}' is not numeric", column));
        }
        if !self.invalid_identifiers.is_empty() {
            reasons.push(format!(
                "{} identifier(s) are not valid MAVE-HGVS: {}",
                self.invalid_identifiers.len(),
                bounded(self.invalid_identifiers.iter().cloned())
            ));
        }
        reasons.extend(self.variant_set_mismatches.iter().cloned());
        reasons
    }

    /// The violation as an error, or `None` when the table is compliant.
    pub fn to_error(&self) -> Option<MaveError> {
        if self.is_compliant() {
            None
        } else {
            Some(MaveError::ComplianceViolation {
                reasons: self.reasons(),
            })
        }
    }
}

/// Checks converted tables against the dataset rules.
#[derive(Debug, Clone)]
pub struct ComplianceValidator<G: VariantGrammar = MaveHgvsGrammar> {
    table_kind: TableKind,
    score_column: String,
    grammar: G,
}

impl ComplianceValidator {
    pub fn new(table_kind: TableKind) -> Self {
        Self {
            table_kind,
            score_column: "score".to_string(),
            grammar: MaveHgvsGrammar,
        }
    }

    pub fn from_config(config: &ConvertConfig) -> Self {
        Self::new(config.table_kind).with_score_column(&config.score_column)
    }

    /// Differences between the variant sets of two paired tables.
    ///
    /// Both tables must carry the same identifier columns, and each column
    /// must hold the same set of values.
    pub fn cross_check(a: &MaveTable, b: &MaveTable) -> Vec<String> {
        let columns = |t: &MaveTable| -> Vec<&'static str> {
            [HGVS_NT, HGVS_PRO]
                .into_iter()
                .filter(|c| t.has_column(c))
                .collect()
        };
        let (a_columns, b_columns) = (columns(a), columns(b));
        if a_columns != b_columns {
            return vec![format!(
                "tables define different hgvs columns: '{}' and '{}'",
                a_columns.join(", "),
                b_columns.join(", ")
            )];
        }

        let mut mismatches = Vec::new();
        for column in a_columns {
            let left: BTreeSet<&str> = a.identifiers(column).into_iter().collect();
            let right: BTreeSet<&str> = b.identifiers(column).into_iter().collect();
            let only_left: Vec<String> = left.difference(&right).map(|s| s.to_string()).collect();
            let only_right: Vec<String> = right.difference(&left).map(|s| s.to_string()).collect();
            if !only_left.is_empty() {
                mismatches.push(format!(
                    "'{}' values only in the first table: {}",
                    column,
                    bounded(only_left.into_iter())
                ));
            }
            if !only_right.is_empty() {
                mismatches.push(format!(
                    "'{}' values only in the second table: {}",
                    column,
                    bounded(only_right.into_iter())
                ));
            }
        }
        mismatches
    }
}

impl<G: VariantGrammar> ComplianceValidator<G> {
    pub fn with_score_column(mut self, column: &str) -> Self {
        self.score_column = column.to_string();
        self
    }

    pub fn with_grammar<H: VariantGrammar>(self, grammar: H) -> ComplianceValidator<H> {
        ComplianceValidator {
            table_kind: self.table_kind,
            score_column: self.score_column,
            grammar,
        }
    }

    pub fn table_kind(&self) -> TableKind {
        self.table_kind
    }

    /// Run every check on `table`.
    pub fn validate(&self, table: &MaveTable) -> ComplianceReport {
        let mut report = ComplianceReport::default();

        if self.table_kind == TableKind::Scores && !table.has_column(&self.score_column) {
            report.missing_columns.push(self.score_column.clone());
        }

        report.primary_column = [HGVS_NT, HGVS_PRO]
            .into_iter()
            .find(|c| !table.identifiers(c).is_empty())
            .map(String::from);

        if let Some(primary) = report.primary_column.clone() {
            if let Some(cells) = table.column(&primary) {
                report.null_primary_rows = cells
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.is_null())
                    .map(|(i, _)| i)
                    .collect();
            }

            let duplicates = duplicates(&table.identifiers(&primary));
            if !duplicates.is_empty() {
                if primary == HGVS_PRO {
                    let warning = format!(
                        "found {} duplicate HGVS strings in '{}': {}",
                        duplicates.len(),
                        primary,
                        bounded(duplicates.iter().cloned())
                    );
                    log::warn!("{}", warning);
                    report.warnings.push(warning);
                    report.duplicate_warnings = duplicates;
                } else {
                    report.duplicate_identifiers = duplicates;
                }
            }
        }

        report.non_numeric_columns = table
            .data_columns()
            .filter(|(_, t)| !t.is_numeric())
            .map(|(c, _)| c.to_string())
            .collect();

        for (column, class) in [(HGVS_NT, EventClass::Nucleotide), (HGVS_PRO, EventClass::Protein)] {
            report.invalid_identifiers.extend(
                table
                    .identifiers(column)
                    .into_iter()
                    .filter(|v| !self.grammar.is_valid(v, class))
                    .map(String::from),
            );
        }

        report
    }
}

/// Values seen more than once, in order of first appearance.
fn duplicates(values: &[&str]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for v in values {
        *counts.entry(*v).or_default() += 1;
    }
    let mut seen = BTreeSet::new();
    values
        .iter()
        .filter(|v| counts[*v] > 1 && seen.insert(**v))
        .map(|v| v.to_string())
        .collect()
}

fn bounded(items: impl Iterator<Item = String>) -> String {
    let items: Vec<String> = items.collect();
    let mut out = items
        .iter()
        .take(MAX_ERROR_VARIANTS)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    if items.len() > MAX_ERROR_VARIANTS {
        out.push_str(", ...");
    }
    out
}
