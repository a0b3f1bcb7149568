//! Reference sequence model.
//!
//! A [`SequenceModel`] owns the target nucleotide sequence together with its
//! codon partition and translated protein. All three are computed once on
//! construction; positions used by the lookups are 1-based.

mod amino_acid;
mod codon;

pub use amino_acid::AminoAcid;
pub use codon::{Base, Codon, CodonTable};

use crate::error::MaveError;

/// Immutable snapshot of a target sequence.
#[derive(Debug, Clone)]
pub struct SequenceModel {
    sequence: Vec<Base>,
    codons: Vec<Codon>,
    protein: Vec<AminoAcid>,
    table: CodonTable,
    coding: bool,
}

impl SequenceModel {
    /// Build a coding model: the sequence must be a whole number of codons.
    pub fn coding(sequence: &str) -> Result<Self, MaveError> {
        Self::with_table(sequence, true, CodonTable::standard())
    }

    /// Build a non-coding model; no codons or protein are derived.
    pub fn non_coding(sequence: &str) -> Result<Self, MaveError> {
        Self::with_table(sequence, false, CodonTable::standard())
    }

    /// Build a model with an explicit translation table.
    pub fn with_table(sequence: &str, coding: bool, table: CodonTable) -> Result<Self, MaveError> {
        let bases = parse_sequence(sequence)?;
        let (codons, protein) = if coding {
            if bases.len() % 3 != 0 {
                return Err(MaveError::IncompleteCodon {
                    length: bases.len(),
                });
            }
            let codons: Vec<Codon> = bases
                .chunks_exact(3)
                .map(|c| Codon::new(c[0], c[1], c[2]))
                .collect();
            let protein = codons.iter().map(|c| table.translate(c)).collect();
            (codons, protein)
        } else {
            (Vec::new(), Vec::new())
        };

        Ok(Self {
            sequence: bases,
            codons,
            protein,
            table,
            coding,
        })
    }

    /// Replace the sequence, recomputing codons and protein together.
    pub fn with_sequence(&self, sequence: &str) -> Result<Self, MaveError> {
        Self::with_table(sequence, self.coding, self.table.clone())
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn is_coding(&self) -> bool {
        self.coding
    }

    pub fn codon_table(&self) -> &CodonTable {
        &self.table
    }

    /// Number of codons (zero for non-coding models).
    pub fn codon_count(&self) -> usize {
        self.codons.len()
    }

    /// Base at a 1-based position.
    pub fn base_at(&self, position: i64) -> Option<Base> {
        index(position).and_then(|i| self.sequence.get(i)).copied()
    }

    /// Codon by 1-based codon number.
    pub fn codon(&self, number: i64) -> Option<Codon> {
        index(number).and_then(|i| self.codons.get(i)).copied()
    }

    /// Residue by 1-based protein position.
    pub fn residue_at(&self, position: i64) -> Option<AminoAcid> {
        index(position).and_then(|i| self.protein.get(i)).copied()
    }

    pub fn protein(&self) -> &[AminoAcid] {
        &self.protein
    }

    /// The nucleotide sequence as a string.
    pub fn sequence_string(&self) -> String {
        self.sequence.iter().map(|b| b.to_char()).collect()
    }

    /// The translated protein in one-letter codes.
    pub fn protein_string(&self) -> String {
        self.protein.iter().map(|aa| aa.to_one_letter()).collect()
    }
}

fn index(position: i64) -> Option<usize> {
    if position < 1 {
        return None;
    }
    usize::try_from(position - 1).ok()
}

fn parse_sequence(sequence: &str) -> Result<Vec<Base>, MaveError> {
    let trimmed = sequence.trim();
    if trimmed.is_empty() {
        return Err(MaveError::InvalidSequence {
            msg: "sequence is empty".to_string(),
        });
    }
    trimmed
        .chars()
        .enumerate()
        .map(|(i, c)| match c.to_ascii_uppercase() {
            'A' => Ok(Base::A),
            'C' => Ok(Base::C),
            'G' => Ok(Base::G),
            'T' => Ok(Base::T),
            _ => Err(MaveError::InvalidSequence {
                msg: format!("unexpected character '{}' at position {}", c, i + 1),
            }),
        })
        .collect()
}
