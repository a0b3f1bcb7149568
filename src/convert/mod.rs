//! Conversion of variant tables into MAVE-HGVS.
//!
//! A table arrives as a [`RawTable`] with one identifier column holding
//! the source notation (Enrich2 style):
//!
//! - `c.4T>G, c.5T>G` (nucleotide events)
//! - `p.Leu2Gly, p.Trp7Ter` (protein events)
//! - `c.4T>G (p.Phe2Cys), c.6T>C (p.=)` (paired events)
//! - `_wt`, `_sy`
//!
//! [`RowConverter`] turns one cell into canonical `hgvs_nt` / `hgvs_pro`
//! strings. [`DatasetConverter`] runs it over every row, partitions valid
//! and invalid rows, and hands the result to the compliance checks.

pub mod call;
pub mod dataset;
pub mod row;
pub mod table;

pub use call::{NucleotidePart, ProteinPart, RowShape, VariantCall};
pub use dataset::{
    ConversionOutcome, ConversionProgress, ConversionState, DatasetConverter, DatasetResult,
};
pub use row::{ConvertedRow, RowConverter};
pub use table::{
    is_null, Cell, ColumnType, MaveTable, RawTable, ERROR_DESCRIPTION, HGVS_NT, HGVS_PRO,
};
