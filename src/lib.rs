// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-mave: MAVE-HGVS variant normalizer
//!
//! Part of the ferro bioinformatics toolkit. Converts assay variant tables
//! into canonical MAVE-HGVS identifiers relative to a target sequence and
//! checks the result against the dataset rules.
//!
//! # Example
//!
//! ```
//! use ferro_mave::{ConvertConfig, DatasetConverter, RawTable, SequenceModel};
//!
//! // Target sequence: Met Lys Phe Trp
//! let model = SequenceModel::coding("ATGAAATTTTGG").unwrap();
//!
//! let table = RawTable::from_rows(
//!     &["hgvs", "score"],
//!     &[
//!         vec!["c.4A>G", "0.5"],
//!         vec!["c.7T>G, c.8T>G", "-1.2"],
//!         vec!["c.6A>G (p.=)", "0.1"],
//!     ],
//! )
//! .unwrap();
//!
//! let converter = DatasetConverter::new(&model, ConvertConfig::default()).unwrap();
//! let result = converter.convert(&table).unwrap();
//! assert!(result.is_accepted());
//! assert_eq!(
//!     result.table.identifiers("hgvs_nt"),
//!     vec!["c.4A>G", "c.7_8delinsGG", "c.6A>G"]
//! );
//! assert_eq!(result.table.identifiers("hgvs_pro"), vec!["p.Lys2="]);
//! ```

pub mod check;
pub mod config;
pub mod convert;
pub mod error;
pub mod event;
pub mod io;
pub mod legacy;
pub mod mave;
pub mod normalize;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod sequence;

// Re-export commonly used types
pub use check::{ComplianceReport, ComplianceValidator};
pub use config::{ConvertConfig, ElementKind, MaveConfig, TableKind};
pub use convert::{
    ConversionOutcome, ConversionState, ConvertedRow, DatasetConverter, DatasetResult, MaveTable,
    RawTable, RowConverter,
};
pub use error::{ErrorCode, MaveError};
pub use event::{NucleotideEvent, ProteinEvent, SpecialVariant};
pub use legacy::{classify_protein_variant, codon_change_to_mave, convert_legacy, LegacyConverter};
pub use mave::{MaveHgvsGrammar, VariantGrammar};
pub use normalize::{OffsetResolver, SilentInference, VariantAssembler};
pub use sequence::SequenceModel;

/// Result type alias for ferro-mave operations
pub type Result<T> = std::result::Result<T, MaveError>;
