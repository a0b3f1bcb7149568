//! Parallel row conversion for ferro-mave
//!
//! Rows only share read-only state, so they can be converted on a rayon
//! pool. Enable with the `parallel` feature; [`DatasetConverter::convert`]
//! then uses this path.
//!
//! [`DatasetConverter::convert`]: crate::convert::DatasetConverter::convert
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "parallel")]
//! # fn main() {
//! use ferro_mave::config::ConvertConfig;
//! use ferro_mave::convert::RowConverter;
//! use ferro_mave::parallel::convert_rows_parallel;
//! use ferro_mave::sequence::SequenceModel;
//!
//! let model = SequenceModel::coding("ATGAAATTTTGG").unwrap();
//! let converter = RowConverter::new(&model, &ConvertConfig::default()).unwrap();
//! let results = convert_rows_parallel(&converter, &["c.4A>G", "p.Lys2Asn", "bad"]);
//! assert_eq!(results.len(), 3);
//! # }
//! # #[cfg(not(feature = "parallel"))]
//! # fn main() {}
//! ```

use rayon::prelude::*;

use crate::convert::{ConvertedRow, RowConverter};
use crate::error::MaveError;

/// Convert identifier cells in parallel
///
/// Returns one result per cell. Order is preserved.
pub fn convert_rows_parallel<S: AsRef<str> + Sync>(
    converter: &RowConverter<'_>,
    cells: &[S],
) -> Vec<Result<ConvertedRow, MaveError>> {
    cells
        .par_iter()
        .map(|c| converter.convert(c.as_ref()))
        .collect()
}

/// Convert identifier cells in parallel, filtering errors
///
/// Returns only rows that converted.
pub fn convert_rows_parallel_ok<S: AsRef<str> + Sync>(
    converter: &RowConverter<'_>,
    cells: &[S],
) -> Vec<ConvertedRow> {
    cells
        .par_iter()
        .filter_map(|c| converter.convert(c.as_ref()).ok())
        .collect()
}
