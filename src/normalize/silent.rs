//! Silent-change inference.
//!
//! Upstream callers report synonymous codon changes as a bare `p.=`. The
//! residue and position are recovered here by translating the wild-type and
//! mutant codons of the group.

use super::group::{render_events, CodonGroup};
use crate::error::MaveError;
use crate::event::{NucleotideEvent, ProteinEvent};
use crate::sequence::SequenceModel;

#[derive(Debug, Clone, Copy)]
pub struct SilentInference<'a> {
    model: &'a SequenceModel,
}

impl<'a> SilentInference<'a> {
    pub fn new(model: &'a SequenceModel) -> Self {
        Self { model }
    }

    /// Infer the silent protein event for a codon group.
    pub fn infer(&self, group: &CodonGroup) -> Result<ProteinEvent, MaveError> {
        self.infer_events(group.events())
    }

    /// Infer the silent protein event for events that must share one codon.
    ///
    /// Events flagged silent keep the wild-type base; others must state the
    /// wild-type base as their reference. Fails if the mutant codon encodes a
    /// different residue.
    pub fn infer_events(&self, events: &[NucleotideEvent]) -> Result<ProteinEvent, MaveError> {
        let mut sorted = events.to_vec();
        sorted.sort_by_key(|e| e.position());

        let (first, last) = match (sorted.first(), sorted.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => {
                return Err(MaveError::MultipleCodons {
                    events: "[]".to_string(),
                })
            }
        };
        let codon_number = first.codon_number().ok_or_else(|| MaveError::InvalidPosition {
            position: first.position(),
            msg: "cannot infer a codon from an upstream position".to_string(),
        })?;
        if last.codon_number() != Some(codon_number) {
            return Err(MaveError::MultipleCodons {
                events: render_events(&sorted),
            });
        }

        if !self.model.is_coding() {
            return Err(MaveError::NotCoding {
                variant: render_events(&sorted),
            });
        }
        let wt_codon = self
            .model
            .codon(codon_number)
            .ok_or_else(|| MaveError::PositionOutOfBounds {
                variant: last.to_string(),
                position: last.position(),
                length: self.model.len(),
            })?;

        let mut mut_codon = wt_codon;
        for event in &sorted {
            let frame = event.frame().unwrap_or(0);
            let wt_base = wt_codon.base(frame).ok_or_else(|| MaveError::InvalidPosition {
                position: event.position(),
                msg: "event has no frame within its codon".to_string(),
            })?;
            if let Some(stated) = event.reference() {
                if stated != wt_base {
                    return Err(MaveError::ReferenceMismatch {
                        location: format!("{}{}", event.prefix(), event.position()),
                        expected: wt_base.to_string(),
                        found: stated.to_string(),
                    });
                }
            }
            let new_base = if event.is_silent() {
                wt_base
            } else {
                event.alternate().unwrap_or(wt_base)
            };
            mut_codon = mut_codon
                .with_base(frame, new_base)
                .unwrap_or(mut_codon);
        }

        let table = self.model.codon_table();
        let wt_aa = table.translate(&wt_codon);
        let mut_aa = table.translate(&mut_codon);
        if wt_aa != mut_aa {
            return Err(MaveError::NonSynonymous {
                events: render_events(&sorted),
                wt_codon: wt_codon.to_string(),
                wt_aa: wt_aa.to_string(),
                mut_codon: mut_codon.to_string(),
                mut_aa: mut_aa.to_string(),
            });
        }

        ProteinEvent::synonymous(codon_number, wt_aa)
    }
}
