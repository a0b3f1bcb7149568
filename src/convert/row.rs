//! Conversion of one identifier cell.

use super::call::{NucleotidePart, ProteinPart, RowShape, VariantCall};
use super::table::is_null;
use crate::config::{ConvertConfig, ElementKind};
use crate::error::MaveError;
use crate::event::{EventClass, NucleotideEvent, ProteinEvent, ProteinToken};
use crate::normalize::{
    group_by_codon, protein_shift, OffsetResolver, ReferenceEvent, SilentInference,
    VariantAssembler,
};
use crate::sequence::SequenceModel;

/// Canonical identifiers for one row. Either side may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConvertedRow {
    pub hgvs_nt: Option<String>,
    pub hgvs_pro: Option<String>,
}

/// Converts identifier cells against one target sequence.
///
/// Holds only shared read-only state, so one converter serves every row of a
/// table, from any thread.
#[derive(Debug, Clone)]
pub struct RowConverter<'a> {
    model: &'a SequenceModel,
    offset: i64,
    one_based: bool,
    element: ElementKind,
    assembler: VariantAssembler,
}

impl<'a> RowConverter<'a> {
    /// Create a converter; the offset in `config` must suit the target.
    pub fn new(model: &'a SequenceModel, config: &ConvertConfig) -> Result<Self, MaveError> {
        config.validate()?;
        if config.coding != model.is_coding() {
            log::debug!(
                "Converter configured coding={} for a {} target",
                config.coding,
                if model.is_coding() { "coding" } else { "non-coding" }
            );
        }
        Ok(Self {
            model,
            offset: config.offset,
            one_based: config.one_based,
            element: config.element,
            assembler: VariantAssembler::new(),
        })
    }

    /// Same converter with another declared offset.
    pub fn with_offset(&self, offset: i64) -> Self {
        Self {
            offset,
            ..self.clone()
        }
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn element(&self) -> ElementKind {
        self.element
    }

    /// Convert one raw identifier cell.
    pub fn convert(&self, raw: &str) -> Result<ConvertedRow, MaveError> {
        if is_null(raw) {
            return Err(MaveError::InvalidToken {
                token: raw.to_string(),
                kind: "variant",
                hint: Some("identifier cell is empty".to_string()),
            });
        }
        let call = VariantCall::parse(raw, self.element)?;
        self.convert_call(call)
    }

    /// Convert an already parsed cell.
    pub fn convert_call(&self, call: VariantCall) -> Result<ConvertedRow, MaveError> {
        match (call.shape, call.nt, call.pro) {
            (RowShape::Mixed, NucleotidePart::Events(nt), ProteinPart::Events(pro)) => {
                self.convert_mixed(&nt, pro)
            }
            (_, nt, pro) => Ok(ConvertedRow {
                hgvs_nt: self.convert_nucleotide_part(nt)?,
                hgvs_pro: self.convert_protein_part(pro)?,
            }),
        }
    }

    /// Nucleotide events as they sit on the target: 1-based, offset applied.
    ///
    /// Upstream positions are kept as written and are not checked.
    pub fn place_nucleotide(&self, events: &[NucleotideEvent]) -> Result<Vec<NucleotideEvent>, MaveError> {
        let resolver = OffsetResolver::new(self.model);
        events
            .iter()
            .map(|event| {
                let event = self.to_one_based(event)?;
                if event.position() < 0 {
                    if self.offset != 0 {
                        return Err(MaveError::InvalidOffset {
                            offset: self.offset,
                            msg: format!("upstream position in {} cannot be offset", event),
                        });
                    }
                    return Ok(event);
                }
                let shifted = event.position() - self.offset;
                if shifted < 1 {
                    return Err(MaveError::InvalidPosition {
                        position: shifted,
                        msg: format!("offset {} moves {} before the target", self.offset, event),
                    });
                }
                resolver.apply(&event, -self.offset)
            })
            .collect()
    }

    /// Protein events as they sit on the target, offset by whole codons.
    pub fn place_protein(&self, events: &[ProteinEvent]) -> Result<Vec<ProteinEvent>, MaveError> {
        let resolver = OffsetResolver::new(self.model);
        let shift = -protein_shift(self.offset);
        events.iter().map(|e| resolver.apply(e, shift)).collect()
    }

    /// Bring a source position onto the 1-based basis.
    pub(crate) fn to_one_based(&self, event: &NucleotideEvent) -> Result<NucleotideEvent, MaveError> {
        if !self.one_based {
            return Ok(event.with_position(event.position() + 1));
        }
        if event.position() == 0 {
            return Err(MaveError::InvalidPosition {
                position: 0,
                msg: "position 0 in a 1-based table".to_string(),
            });
        }
        Ok(*event)
    }

    fn convert_nucleotide_part(&self, part: NucleotidePart) -> Result<Option<String>, MaveError> {
        match part {
            NucleotidePart::Absent => Ok(None),
            NucleotidePart::Special(special) => self
                .assembler
                .assemble_special(special, EventClass::Nucleotide)
                .map(Some),
            NucleotidePart::Events(events) => {
                let placed = self.place_nucleotide(&events)?;
                self.assembler.assemble_nucleotide(&placed).map(Some)
            }
        }
    }

    fn convert_protein_part(&self, part: ProteinPart) -> Result<Option<String>, MaveError> {
        match part {
            ProteinPart::Absent => Ok(None),
            ProteinPart::Special(special) => self
                .assembler
                .assemble_special(special, EventClass::Protein)
                .map(Some),
            ProteinPart::Events(tokens) => {
                if tokens.contains(&ProteinToken::UnresolvedSilent) {
                    if tokens.len() == 1 {
                        return Ok(Some("p.=".to_string()));
                    }
                    return Err(MaveError::SpecialNotAlone {
                        special: "p.=".to_string(),
                    });
                }
                let events: Vec<ProteinEvent> = tokens
                    .into_iter()
                    .filter_map(|t| match t {
                        ProteinToken::Event(e) => Some(e),
                        _ => None,
                    })
                    .collect();
                let placed = self.place_protein(&events)?;
                self.assembler.assemble_protein(&placed).map(Some)
            }
        }
    }

    /// Convert paired `<nt> (<pro>)` sub-tokens.
    ///
    /// Each protein event takes the codon number of its nucleotide pair. Bare
    /// `p.=` entries and silent codons are resolved by translating the codon.
    fn convert_mixed(
        &self,
        nt: &[NucleotideEvent],
        pro: Vec<ProteinToken>,
    ) -> Result<ConvertedRow, MaveError> {
        let nt = self.place_nucleotide(nt)?;
        let mut pairs: Vec<(NucleotideEvent, ProteinToken)> = Vec::with_capacity(nt.len());
        for (event, token) in nt.into_iter().zip(pro) {
            let codon = event.codon_number().ok_or_else(|| MaveError::InvalidPosition {
                position: event.position(),
                msg: format!("{} has no codon to pair with a protein event", event),
            })?;
            let token = match token {
                ProteinToken::Event(p) => {
                    let placed = p.with_position(codon)?;
                    placed.check_reference(self.model)?;
                    ProteinToken::Event(placed)
                }
                other => other,
            };
            pairs.push((event, token));
        }

        let inference = SilentInference::new(self.model);
        let mut dropped = vec![false; pairs.len()];
        let nt_events: Vec<NucleotideEvent> = pairs.iter().map(|(e, _)| *e).collect();

        for group in group_by_codon(&nt_events)? {
            let members: Vec<usize> = (0..pairs.len())
                .filter(|&i| pairs[i].0.codon_number() == Some(group.codon_number()))
                .collect();

            if group.is_all_silent() {
                let inferred = inference.infer(&group)?;
                for &i in &members {
                    pairs[i].1 = ProteinToken::Event(inferred);
                }
                continue;
            }
            if group.has_mixed_silence() {
                log::warn!(
                    "Codon {} mixes silent and non-silent events; dropping the silent entries",
                    group.codon_number()
                );
                for &i in &members {
                    if pairs[i].0.is_silent() {
                        dropped[i] = true;
                    }
                }
            }

            let changed: Vec<usize> = members.into_iter().filter(|&i| !dropped[i]).collect();
            let unresolved: Vec<usize> = changed
                .iter()
                .copied()
                .filter(|&i| pairs[i].1 == ProteinToken::UnresolvedSilent)
                .collect();
            if unresolved.is_empty() {
                continue;
            }
            if unresolved.len() < changed.len() {
                log::warn!(
                    "Codon {} is only partially synonymous; inferring over {} of {} events",
                    group.codon_number(),
                    unresolved.len(),
                    changed.len()
                );
            }
            let events: Vec<NucleotideEvent> = unresolved.iter().map(|&i| pairs[i].0).collect();
            let inferred = inference.infer_events(&events)?;
            for i in unresolved {
                pairs[i].1 = ProteinToken::Event(inferred);
            }
        }

        let kept: Vec<&(NucleotideEvent, ProteinToken)> = pairs
            .iter()
            .zip(&dropped)
            .filter(|(_, d)| !**d)
            .map(|(p, _)| p)
            .collect();
        let nt_events: Vec<NucleotideEvent> = kept.iter().map(|(e, _)| *e).collect();
        let pro_events: Vec<ProteinEvent> = kept
            .iter()
            .filter_map(|(_, t)| match t {
                ProteinToken::Event(e) => Some(*e),
                _ => None,
            })
            .collect();

        Ok(ConvertedRow {
            hgvs_nt: Some(self.assembler.assemble_nucleotide(&nt_events)?),
            hgvs_pro: Some(self.assembler.assemble_protein(&pro_events)?),
        })
    }
}
