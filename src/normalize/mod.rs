//! Normalization engine
//!
//! Turns parsed events into canonical MAVE-HGVS strings.
//!
//! # Pipeline
//!
//! 1. [`OffsetResolver`] shifts events onto the target sequence and checks
//!    each stated reference base or residue.
//! 2. [`group_by_codon`] partitions coding events by codon.
//! 3. [`SilentInference`] recovers the residue behind a bare `p.=`.
//! 4. [`VariantAssembler`] collapses adjacent changes within a codon into a
//!    delins and checks the result against the grammar.
//!
//! # Coordinate Systems
//!
//! | Context | Basis | Type/Notes |
//! |---------|-------|------------|
//! | Nucleotide positions | 1-based | `i64`, negative for upstream `c.`/`n.` |
//! | Protein positions | 1-based | `i64`, always >= 1 |
//! | Codon numbers | 1-based | `(position - 1) / 3 + 1` |
//! | Frames | 1-based | 1..=3 within a codon |
//! | Sequence indexing | 0-based | `usize` inside [`crate::sequence`] |

pub mod assemble;
pub mod group;
pub mod offset;
pub mod silent;
pub mod validate;

pub use assemble::VariantAssembler;
pub use group::{collapse, group_by_codon, CodonGroup, Segment};
pub use offset::{protein_shift, OffsetCandidate, OffsetResolver, HIT_RATE_THRESHOLD};
pub use silent::SilentInference;
pub use validate::ReferenceEvent;
