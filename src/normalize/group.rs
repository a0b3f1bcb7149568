//! Codon grouping and deletion-insertion collapse.

use crate::error::MaveError;
use crate::event::{CoordinatePrefix, NucleotideEvent};
use crate::sequence::Base;

/// Events of one row that fall in the same codon.
///
/// Events are ordered by position within the codon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodonGroup {
    codon_number: i64,
    events: Vec<NucleotideEvent>,
}

impl CodonGroup {
    pub fn codon_number(&self) -> i64 {
        self.codon_number
    }

    pub fn events(&self) -> &[NucleotideEvent] {
        &self.events
    }

    pub fn is_all_silent(&self) -> bool {
        self.events.iter().all(|e| e.is_silent())
    }

    /// Both silent and non-silent events are present.
    pub fn has_mixed_silence(&self) -> bool {
        let silent = self.events.iter().filter(|e| e.is_silent()).count();
        silent > 0 && silent < self.events.len()
    }

    /// Each event sits exactly one base after the previous one.
    pub fn is_contiguous(&self) -> bool {
        self.events
            .windows(2)
            .all(|w| w[1].position() == w[0].position() + 1)
    }

    /// Drop silent events from a group that also holds real changes.
    pub fn without_mixed_silence(self) -> Self {
        if !self.has_mixed_silence() {
            return self;
        }
        log::warn!(
            "Codon {} mixes silent and non-silent events ({}); keeping only the changes",
            self.codon_number,
            render_events(&self.events)
        );
        Self {
            codon_number: self.codon_number,
            events: self.events.into_iter().filter(|e| !e.is_silent()).collect(),
        }
    }
}

/// Partition events by codon.
///
/// Groups come out in order of first appearance. Positions before the first
/// base have no codon and are rejected.
pub fn group_by_codon(events: &[NucleotideEvent]) -> Result<Vec<CodonGroup>, MaveError> {
    let mut groups: Vec<CodonGroup> = Vec::new();
    for event in events {
        let codon_number = event.codon_number().ok_or_else(|| MaveError::InvalidPosition {
            position: event.position(),
            msg: format!("cannot place {} in a codon", event),
        })?;
        match groups.iter_mut().find(|g| g.codon_number == codon_number) {
            Some(group) => group.events.push(*event),
            None => groups.push(CodonGroup {
                codon_number,
                events: vec![*event],
            }),
        }
    }
    for group in &mut groups {
        group.events.sort_by_key(|e| e.position());
    }
    Ok(groups)
}

/// A rendered unit of a nucleotide variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Single(NucleotideEvent),
    /// Adjacent substitutions replaced by one event over `start..=end`.
    Delins {
        prefix: CoordinatePrefix,
        start: i64,
        end: i64,
        bases: Vec<Base>,
    },
}

impl Segment {
    /// Edit without the prefix.
    pub fn edit(&self) -> String {
        match self {
            Segment::Single(event) => event.edit(),
            Segment::Delins {
                start, end, bases, ..
            } => {
                let inserted: String = bases.iter().map(|b| b.to_char()).collect();
                format!("{}_{}delins{}", start, end, inserted)
            }
        }
    }
}

/// Split a group into segments.
///
/// Runs of two or three adjacent substitutions become one delins; silent
/// groups and isolated changes stay as single events.
pub fn collapse(group: &CodonGroup) -> Vec<Segment> {
    if group.is_all_silent() {
        return group.events.iter().copied().map(Segment::Single).collect();
    }

    let mut segments = Vec::new();
    let mut run: Vec<NucleotideEvent> = Vec::new();
    for event in &group.events {
        let extends = run.last().is_some_and(|last| {
            !last.is_silent() && !event.is_silent() && event.position() == last.position() + 1
        });
        if !extends && !run.is_empty() {
            segments.push(close_run(&run));
            run.clear();
        }
        run.push(*event);
    }
    if !run.is_empty() {
        segments.push(close_run(&run));
    }
    segments
}

fn close_run(run: &[NucleotideEvent]) -> Segment {
    let bases: Option<Vec<Base>> = run.iter().map(|e| e.alternate()).collect();
    match (run, bases) {
        ([first, .., last], Some(bases)) => Segment::Delins {
            prefix: first.prefix(),
            start: first.position(),
            end: last.position(),
            bases,
        },
        _ => Segment::Single(run[0]),
    }
}

pub(crate) fn render_events(events: &[NucleotideEvent]) -> String {
    let parts: Vec<String> = events.iter().map(|e| e.to_string()).collect();
    format!("[{}]", parts.join(", "))
}
