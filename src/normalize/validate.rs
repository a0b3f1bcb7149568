//! Reference validation of events against a [`SequenceModel`].
//!
//! | Event | Checked against | Position basis |
//! |-------|-----------------|----------------|
//! | [`NucleotideEvent`] | nucleotide sequence | 1-based base |
//! | [`ProteinEvent`] | translated protein | 1-based residue |

use crate::error::MaveError;
use crate::event::{NucleotideEvent, ProteinEvent};
use crate::sequence::SequenceModel;

/// An event that can be moved and checked against the reference.
pub trait ReferenceEvent: Sized {
    /// Position in the event's own units (bases or residues).
    fn position(&self) -> i64;

    /// The event moved by `shift` units.
    fn shifted(&self, shift: i64) -> Result<Self, MaveError>;

    /// Check that the position is inside the reference and that any stated
    /// reference base or residue matches it.
    fn check_reference(&self, model: &SequenceModel) -> Result<(), MaveError>;
}

impl ReferenceEvent for NucleotideEvent {
    fn position(&self) -> i64 {
        NucleotideEvent::position(self)
    }

    fn shifted(&self, shift: i64) -> Result<Self, MaveError> {
        Ok(self.with_position(self.position() + shift))
    }

    fn check_reference(&self, model: &SequenceModel) -> Result<(), MaveError> {
        let actual = model
            .base_at(self.position())
            .ok_or_else(|| MaveError::PositionOutOfBounds {
                variant: self.to_string(),
                position: self.position(),
                length: model.len(),
            })?;
        match self.reference() {
            Some(stated) if stated != actual => Err(MaveError::ReferenceMismatch {
                location: format!("{}{}", self.prefix(), self.position()),
                expected: actual.to_string(),
                found: stated.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl ReferenceEvent for ProteinEvent {
    fn position(&self) -> i64 {
        ProteinEvent::position(self)
    }

    fn shifted(&self, shift: i64) -> Result<Self, MaveError> {
        self.with_position(self.position() + shift)
    }

    fn check_reference(&self, model: &SequenceModel) -> Result<(), MaveError> {
        if !model.is_coding() {
            return Err(MaveError::NotCoding {
                variant: self.to_string(),
            });
        }
        let actual = model
            .residue_at(self.position())
            .ok_or_else(|| MaveError::PositionOutOfBounds {
                variant: self.to_string(),
                position: self.position(),
                length: model.codon_count(),
            })?;
        if actual != self.reference() {
            return Err(MaveError::ReferenceMismatch {
                location: format!("p.{}", self.position()),
                expected: actual.to_string(),
                found: self.reference().to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::CoordinatePrefix;
    use crate::sequence::{AminoAcid, Base};

    fn model() -> SequenceModel {
        // Met Lys Phe
        SequenceModel::coding("ATGAAATTT").unwrap()
    }

    #[test]
    fn test_nucleotide_reference_matches() {
        let event = NucleotideEvent::substitution(CoordinatePrefix::Coding, 4, Base::A, Base::G);
        assert!(event.check_reference(&model()).is_ok());
    }

    #[test]
    fn test_nucleotide_reference_mismatch() {
        let event = NucleotideEvent::substitution(CoordinatePrefix::Coding, 4, Base::C, Base::G);
        let err = event.check_reference(&model()).unwrap_err();
        assert_eq!(
            err,
            MaveError::ReferenceMismatch {
                location: "c.4".to_string(),
                expected: "A".to_string(),
                found: "C".to_string(),
            }
        );
    }

    #[test]
    fn test_nucleotide_out_of_bounds() {
        let event = NucleotideEvent::unchanged(CoordinatePrefix::Coding, 10);
        assert!(matches!(
            event.check_reference(&model()),
            Err(MaveError::PositionOutOfBounds { position: 10, .. })
        ));
        let event = NucleotideEvent::unchanged(CoordinatePrefix::Coding, 0);
        assert!(event.check_reference(&model()).is_err());
    }

    #[test]
    fn test_silent_without_bases_only_checks_bounds() {
        let event = NucleotideEvent::unchanged(CoordinatePrefix::Coding, 9);
        assert!(event.check_reference(&model()).is_ok());
    }

    #[test]
    fn test_protein_reference() {
        let event = ProteinEvent::substitution(2, AminoAcid::Lys, AminoAcid::Asn).unwrap();
        assert!(event.check_reference(&model()).is_ok());
        let event = ProteinEvent::substitution(2, AminoAcid::Leu, AminoAcid::Asn).unwrap();
        assert!(matches!(
            event.check_reference(&model()),
            Err(MaveError::ReferenceMismatch { .. })
        ));
        let event = ProteinEvent::synonymous(4, AminoAcid::Leu).unwrap();
        assert!(matches!(
            event.check_reference(&model()),
            Err(MaveError::PositionOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_protein_requires_coding_model() {
        let model = SequenceModel::non_coding("ATGAAATTT").unwrap();
        let event = ProteinEvent::synonymous(1, AminoAcid::Met).unwrap();
        assert!(matches!(
            event.check_reference(&model),
            Err(MaveError::NotCoding { .. })
        ));
    }

    #[test]
    fn test_shifted() {
        let event = ProteinEvent::synonymous(2, AminoAcid::Lys).unwrap();
        assert_eq!(event.shifted(-1).unwrap().position(), 1);
        assert!(event.shifted(-2).is_err());
        let event = NucleotideEvent::unchanged(CoordinatePrefix::Coding, 2);
        assert_eq!(event.shifted(-5).unwrap().position(), -3);
    }
}
