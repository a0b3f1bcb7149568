//! In-memory tables.
//!
//! [`RawTable`] is the untyped input handed over by the I/O adapter.
//! [`MaveTable`] is the converted output: the two identifier columns first,
//! then the data columns retyped to numbers.

use crate::error::MaveError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Nucleotide identifier column of a converted table.
pub const HGVS_NT: &str = "hgvs_nt";
/// Protein identifier column of a converted table.
pub const HGVS_PRO: &str = "hgvs_pro";
/// Reason column appended to the invalid-row table.
pub const ERROR_DESCRIPTION: &str = "error_description";

static NULL_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:\s+|nan|na|none|undefined|n/a|null)$").expect("null pattern must compile")
});

/// Whether `column` is one of the two identifier columns.
pub fn is_identifier(column: &str) -> bool {
    column == HGVS_NT || column == HGVS_PRO
}

/// Whether a raw cell counts as missing.
pub fn is_null(value: &str) -> bool {
    value.is_empty() || NULL_VALUE.is_match(value)
}

/// Untyped rows of strings under named columns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build a table; every row must have one value per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, MaveError> {
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns.len()) {
            return Err(MaveError::Csv {
                msg: format!(
                    "row {} has {} values but the header has {} columns",
                    i,
                    row.len(),
                    columns.len()
                ),
            });
        }
        Ok(Self { columns, rows })
    }

    /// Build a table from string literals.
    pub fn from_rows<S: AsRef<str>>(columns: &[S], rows: &[Vec<S>]) -> Result<Self, MaveError> {
        Self::new(
            columns.iter().map(|c| c.as_ref().to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|v| v.as_ref().to_string()).collect())
                .collect(),
        )
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r[index].as_str()).collect())
    }

    /// Add a column holding `values`, one per row.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<String>) -> Result<(), MaveError> {
        if values.len() != self.rows.len() {
            return Err(MaveError::Csv {
                msg: format!("{} values for {} rows", values.len(), self.rows.len()),
            });
        }
        self.columns.push(name.into());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }
}

/// A typed cell of a converted table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Int(v) => write!(f, "{}", v),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

/// Inferred type of a data column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// Every value is null.
    Empty,
    Integer,
    Float,
    Text,
}

impl ColumnType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    /// Infer the narrowest type that holds every non-null value.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut seen = ColumnType::Empty;
        for value in values {
            let value = value.trim();
            if is_null(value) {
                continue;
            }
            let here = if value.parse::<i64>().is_ok() {
                ColumnType::Integer
            } else if value.parse::<f64>().is_ok() {
                ColumnType::Float
            } else {
                return ColumnType::Text;
            };
            seen = match (seen, here) {
                (ColumnType::Empty, t) => t,
                (ColumnType::Integer, ColumnType::Integer) => ColumnType::Integer,
                _ => ColumnType::Float,
            };
        }
        seen
    }

    /// Convert one raw value to a cell of this type.
    pub fn cell(&self, value: &str) -> Cell {
        let value = value.trim();
        if is_null(value) {
            return Cell::Null;
        }
        match self {
            ColumnType::Integer => value.parse().map(Cell::Int).unwrap_or(Cell::Null),
            ColumnType::Float => value.parse().map(Cell::Float).unwrap_or(Cell::Null),
            ColumnType::Empty => Cell::Null,
            ColumnType::Text => Cell::Text(value.to_string()),
        }
    }
}

/// A converted table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MaveTable {
    columns: Vec<String>,
    types: Vec<ColumnType>,
    rows: Vec<Vec<Cell>>,
}

impl MaveTable {
    pub fn new(
        columns: Vec<String>,
        types: Vec<ColumnType>,
        rows: Vec<Vec<Cell>>,
    ) -> Result<Self, MaveError> {
        if types.len() != columns.len() || rows.iter().any(|r| r.len() != columns.len()) {
            return Err(MaveError::Csv {
                msg: "converted rows do not match the column list".to_string(),
            });
        }
        Ok(Self {
            columns,
            types,
            rows,
        })
    }

    /// Type a raw table. Identifier columns stay text; every other column
    /// takes the narrowest type holding all of its values.
    pub fn from_raw(raw: &RawTable) -> Self {
        let types: Vec<ColumnType> = raw
            .columns()
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let values = raw.rows().iter().map(|r| r[i].as_str());
                if is_identifier(name) {
                    if values.clone().all(|v| is_null(v.trim())) {
                        ColumnType::Empty
                    } else {
                        ColumnType::Text
                    }
                } else {
                    ColumnType::infer(values)
                }
            })
            .collect();
        let rows = raw
            .rows()
            .iter()
            .map(|r| r.iter().zip(&types).map(|(v, t)| t.cell(v)).collect())
            .collect();
        Self {
            columns: raw.columns().to_vec(),
            types,
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn types(&self) -> &[ColumnType] {
        &self.types
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        let index = self.columns.iter().position(|c| c == name)?;
        self.types.get(index).copied()
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|r| &r[index]).collect())
    }

    /// Non-null text values of an identifier column.
    pub fn identifiers(&self, name: &str) -> Vec<&str> {
        self.column(name)
            .map(|cells| cells.into_iter().filter_map(Cell::as_str).collect())
            .unwrap_or_default()
    }

    /// Columns that are neither identifier column.
    pub fn data_columns(&self) -> impl Iterator<Item = (&str, ColumnType)> {
        self.columns
            .iter()
            .zip(&self.types)
            .filter(|(c, _)| !is_identifier(c))
            .map(|(c, t)| (c.as_str(), *t))
    }

    /// Values of every column rendered back to text.
    pub fn to_raw(&self) -> RawTable {
        RawTable {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    /// Remove the named column if present.
    pub fn drop_column(&mut self, name: &str) -> bool {
        let Some(index) = self.columns.iter().position(|c| c == name) else {
            return false;
        };
        self.columns.remove(index);
        self.types.remove(index);
        for row in &mut self.rows {
            row.remove(index);
        }
        true
    }

    /// Keep only rows for which `keep` returns true. Returns how many were removed.
    pub fn retain_rows(&mut self, mut keep: impl FnMut(&[String], &[Cell]) -> bool) -> usize {
        let before = self.rows.len();
        let columns = &self.columns;
        self.rows.retain(|row| keep(columns, row));
        before - self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", true)]
    #[case("   ", true)]
    #[case("NaN", true)]
    #[case("na", true)]
    #[case("None", true)]
    #[case("undefined", true)]
    #[case("N/A", true)]
    #[case("NULL", true)]
    #[case("0", false)]
    #[case("nana", false)]
    #[case("c.1A>G", false)]
    fn test_is_null(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(is_null(value), expected);
    }

    #[test]
    fn test_raw_table_shape_checked() {
        assert!(RawTable::from_rows(&["a", "b"], &[vec!["1"]]).is_err());
        let table = RawTable::from_rows(&["a", "b"], &[vec!["1", "2"]]).unwrap();
        assert_eq!(table.column("b"), Some(vec!["2"]));
        assert_eq!(table.column("c"), None);
    }

    #[test]
    fn test_push_column() {
        let mut table = RawTable::from_rows(&["a"], &[vec!["1"], vec!["2"]]).unwrap();
        table
            .push_column("b", vec!["x".to_string(), "y".to_string()])
            .unwrap();
        assert_eq!(table.columns(), &["a".to_string(), "b".to_string()]);
        assert!(table.push_column("c", vec![]).is_err());
    }

    #[rstest]
    #[case(&["1", "2", "NA"], ColumnType::Integer)]
    #[case(&["1", "2.5"], ColumnType::Float)]
    #[case(&["1e-3", "-4"], ColumnType::Float)]
    #[case(&["NA", ""], ColumnType::Empty)]
    #[case(&["1", "high"], ColumnType::Text)]
    fn test_infer_column_type(#[case] values: &[&str], #[case] expected: ColumnType) {
        assert_eq!(ColumnType::infer(values.iter().copied()), expected);
    }

    #[test]
    fn test_cells() {
        assert_eq!(ColumnType::Integer.cell("3"), Cell::Int(3));
        assert_eq!(ColumnType::Float.cell("3"), Cell::Float(3.0));
        assert_eq!(ColumnType::Float.cell("nan"), Cell::Null);
        assert_eq!(Cell::Float(0.5).to_string(), "0.5");
        assert_eq!(Cell::Null.to_string(), "");
    }

    #[test]
    fn test_mave_table_columns() {
        let mut table = MaveTable::new(
            vec![HGVS_NT.to_string(), HGVS_PRO.to_string(), "score".to_string()],
            vec![ColumnType::Text, ColumnType::Empty, ColumnType::Float],
            vec![vec![
                Cell::Text("c.1A>G".to_string()),
                Cell::Null,
                Cell::Float(0.5),
            ]],
        )
        .unwrap();
        assert_eq!(table.identifiers(HGVS_NT), vec!["c.1A>G"]);
        assert!(table.identifiers(HGVS_PRO).is_empty());
        let data: Vec<_> = table.data_columns().collect();
        assert_eq!(data, vec![("score", ColumnType::Float)]);
        assert!(table.drop_column(HGVS_PRO));
        assert!(!table.has_column(HGVS_PRO));
        assert_eq!(table.rows()[0].len(), 2);
    }
}
