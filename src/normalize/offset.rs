//! Coordinate offset application and bounded offset search.
//!
//! Offsets here are additive shifts: an event at `p` moves to `p + shift`.
//! Shifts are in the event's own units, so callers convert a nucleotide
//! shift with [`protein_shift`] before moving protein events.

use super::validate::ReferenceEvent;
use crate::error::MaveError;
use crate::sequence::SequenceModel;
use serde::{Deserialize, Serialize};

/// Minimum hit rate a mismatching candidate must exceed to be accepted.
pub const HIT_RATE_THRESHOLD: f64 = 0.9;

/// One scored shift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OffsetCandidate {
    pub offset: i64,
    /// Fraction of events whose reference agrees after the shift.
    pub hit_rate: f64,
    pub mismatch_found: bool,
}

/// Residue shift for a nucleotide shift, truncated toward zero.
pub fn protein_shift(nucleotide_shift: i64) -> i64 {
    nucleotide_shift.signum() * (nucleotide_shift.abs() / 3)
}

/// Applies shifts to events and searches for a better shift when the
/// declared one does not fit the reference.
#[derive(Debug, Clone, Copy)]
pub struct OffsetResolver<'a> {
    model: &'a SequenceModel,
}

impl<'a> OffsetResolver<'a> {
    pub fn new(model: &'a SequenceModel) -> Self {
        Self { model }
    }

    /// Shift one event and validate it against the reference.
    pub fn apply<E: ReferenceEvent>(&self, event: &E, shift: i64) -> Result<E, MaveError> {
        let moved = event.shifted(shift)?;
        moved.check_reference(self.model)?;
        Ok(moved)
    }

    /// Shift and validate every event, failing on the first bad one.
    pub fn apply_group<E: ReferenceEvent>(
        &self,
        events: &[E],
        shift: i64,
    ) -> Result<Vec<E>, MaveError> {
        events.iter().map(|e| self.apply(e, shift)).collect()
    }

    /// Score a shift over all events. Events that leave the reference or
    /// fail to move count as mismatches.
    pub fn score<E: ReferenceEvent>(&self, events: &[E], shift: i64) -> OffsetCandidate {
        let matches = events
            .iter()
            .filter(|e| self.apply(*e, shift).is_ok())
            .count();
        let mismatches = events.len() - matches;
        let hit_rate = if events.is_empty() {
            0.0
        } else {
            matches as f64 / events.len() as f64
        };
        OffsetCandidate {
            offset: shift,
            hit_rate,
            mismatch_found: mismatches > 0,
        }
    }

    /// Candidate shifts in search order, without repeats.
    pub fn candidates(declared: i64) -> Vec<i64> {
        let mut out = Vec::with_capacity(5);
        for c in [declared, 0, declared - 1, declared + 1, -1] {
            if !out.contains(&c) {
                out.push(c);
            }
        }
        out
    }

    /// Pick a shift for `events`.
    ///
    /// Returns the first candidate with no mismatches, or else the candidate
    /// with the best hit rate above [`HIT_RATE_THRESHOLD`] (earliest wins
    /// ties). `None` means no shift is acceptable and the events must not be
    /// used.
    pub fn resolve_with_search<E: ReferenceEvent>(
        &self,
        events: &[E],
        declared: i64,
    ) -> Option<OffsetCandidate> {
        let mut best: Option<OffsetCandidate> = None;
        let mut threshold = HIT_RATE_THRESHOLD;

        for shift in Self::candidates(declared) {
            let candidate = self.score(events, shift);
            if !candidate.mismatch_found {
                return Some(candidate);
            }
            if candidate.hit_rate > threshold {
                threshold = candidate.hit_rate;
                best = Some(candidate);
            }
        }

        best
    }

    /// Like [`resolve_with_search`](Self::resolve_with_search), with the
    /// failure escalated as [`MaveError::UnresolvableOffset`].
    pub fn resolve<E: ReferenceEvent>(
        &self,
        events: &[E],
        declared: i64,
    ) -> Result<OffsetCandidate, MaveError> {
        self.resolve_with_search(events, declared).ok_or_else(|| {
            let best_hit_rate = Self::candidates(declared)
                .into_iter()
                .map(|shift| self.score(events, shift).hit_rate)
                .fold(0.0, f64::max);
            MaveError::UnresolvableOffset {
                declared,
                best_hit_rate,
            }
        })
    }
}
