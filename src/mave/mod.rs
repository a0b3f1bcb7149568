//! MAVE-HGVS grammar.
//!
//! MAVE-HGVS is the restricted HGVS dialect accepted by MaveDB. Variants are
//! written without a reference accession and are relative to the score set's
//! target sequence:
//!
//! - `c.32A>G`, `c.4_5delinsGG`, `c.[7G>A;9T>A]`
//! - `p.Glu6Val`, `p.Met1=`, `p.[Leu2Gly;Trp7Ter]`
//! - `_wt` and `_sy` for wild-type and unplaced synonymous variants
//!
//! Every string emitted by the assembler is checked against a
//! [`VariantGrammar`] before it leaves the crate.
//!
//! # Example
//!
//! ```
//! use ferro_mave::event::EventClass;
//! use ferro_mave::mave::{MaveHgvsGrammar, VariantGrammar};
//!
//! let grammar = MaveHgvsGrammar;
//! assert!(grammar.is_valid("c.[7G>A;9T>A]", EventClass::Nucleotide));
//! assert!(grammar.is_valid("p.Met1=", EventClass::Protein));
//! assert!(!grammar.is_valid("c.[7G>A;p.Met1=]", EventClass::Nucleotide));
//! ```
//!
//! # References
//!
//! - [MaveDB](https://www.mavedb.org/)
//! - [MAVE-HGVS Specification](https://www.mavedb.org/docs/mavehgvs/)

mod grammar;
mod patterns;

pub use grammar::{Arity, MaveHgvsGrammar, VariantGrammar};
