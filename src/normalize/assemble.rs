//! Canonical variant string assembly.

use super::group::{collapse, group_by_codon, render_events};
use crate::error::MaveError;
use crate::event::{CoordinatePrefix, EventClass, NucleotideEvent, ProteinEvent, SpecialVariant};
use crate::mave::{Arity, MaveHgvsGrammar, VariantGrammar};

/// Renders events as MAVE-HGVS strings and checks every result against a
/// grammar before returning it.
#[derive(Debug, Clone, Default)]
pub struct VariantAssembler<G: VariantGrammar = MaveHgvsGrammar> {
    grammar: G,
}

impl VariantAssembler<MaveHgvsGrammar> {
    pub fn new() -> Self {
        Self {
            grammar: MaveHgvsGrammar,
        }
    }
}

impl<G: VariantGrammar> VariantAssembler<G> {
    pub fn with_grammar(grammar: G) -> Self {
        Self { grammar }
    }

    pub fn grammar(&self) -> &G {
        &self.grammar
    }

    /// Assemble nucleotide events into one variant string.
    ///
    /// Coding events are grouped by codon: silent entries are dropped from
    /// codons that also hold changes, and adjacent changes in one codon
    /// become a delins. Groups keep the order in which they first appear.
    pub fn assemble_nucleotide(&self, events: &[NucleotideEvent]) -> Result<String, MaveError> {
        let events = dedup(events);
        let prefix = match events.first() {
            Some(first) => first.prefix(),
            None => return Err(self.invariant("", &events)),
        };
        if events.iter().any(|e| e.prefix() != prefix) {
            return Err(MaveError::MixedPrefix {
                events: render_events(&events),
            });
        }

        let codon_local = prefix == CoordinatePrefix::Coding && events.iter().all(|e| e.position() >= 1);
        let edits: Vec<String> = if codon_local {
            group_by_codon(&events)?
                .into_iter()
                .map(|g| g.without_mixed_silence())
                .flat_map(|g| collapse(&g))
                .map(|s| s.edit())
                .collect()
        } else {
            events.iter().map(|e| e.edit()).collect()
        };

        let variant = join(&prefix.to_string(), edits);
        self.check(variant, EventClass::Nucleotide, || render_events(&events))
    }

    /// Assemble protein events in the order given.
    pub fn assemble_protein(&self, events: &[ProteinEvent]) -> Result<String, MaveError> {
        let events = dedup(events);
        if events.is_empty() {
            return Err(MaveError::AssemblyInvariant {
                variant: String::new(),
                events: "[]".to_string(),
            });
        }
        let edits = events.iter().map(|e| e.edit()).collect();
        let variant = join("p.", edits);
        self.check(variant, EventClass::Protein, || {
            let parts: Vec<String> = events.iter().map(|e| e.to_string()).collect();
            format!("[{}]", parts.join(", "))
        })
    }

    /// A special marker is its own canonical form.
    pub fn assemble_special(&self, special: SpecialVariant, class: EventClass) -> Result<String, MaveError> {
        self.check(special.as_str().to_string(), class, || special.to_string())
    }

    fn check(
        &self,
        variant: String,
        class: EventClass,
        events: impl FnOnce() -> String,
    ) -> Result<String, MaveError> {
        let arity = if variant.contains('[') {
            Arity::Multi
        } else {
            Arity::Single
        };
        if self.grammar.matches(&variant, class, arity) {
            Ok(variant)
        } else {
            Err(MaveError::AssemblyInvariant {
                variant,
                events: events(),
            })
        }
    }

    fn invariant(&self, variant: &str, events: &[NucleotideEvent]) -> MaveError {
        MaveError::AssemblyInvariant {
            variant: variant.to_string(),
            events: render_events(events),
        }
    }
}

/// Drop repeated events, keeping the first occurrence.
fn dedup<T: PartialEq + Copy>(events: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(events.len());
    for event in events {
        if !out.contains(event) {
            out.push(*event);
        }
    }
    out
}

/// Join edits under one prefix, bracketing when more than one remains.
fn join(prefix: &str, edits: Vec<String>) -> String {
    let mut unique: Vec<String> = Vec::with_capacity(edits.len());
    for edit in edits {
        if !unique.contains(&edit) {
            unique.push(edit);
        }
    }
    match unique.as_slice() {
        [single] => format!("{}{}", prefix, single),
        _ => format!("{}[{}]", prefix, unique.join(";")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{parse_nucleotide_token, parse_protein_token, NucleotideToken, ProteinToken};
    use crate::sequence::AminoAcid;

    fn nt(tokens: &[&str]) -> Vec<NucleotideEvent> {
        tokens
            .iter()
            .map(|t| match parse_nucleotide_token(t).unwrap() {
                NucleotideToken::Event(e) => e,
                other => panic!("unexpected {:?}", other),
            })
            .collect()
    }

    fn pro(tokens: &[&str]) -> Vec<ProteinEvent> {
        tokens
            .iter()
            .map(|t| match parse_protein_token(t).unwrap() {
                ProteinToken::Event(e) => e,
                other => panic!("unexpected {:?}", other),
            })
            .collect()
    }

    fn assemble(tokens: &[&str]) -> Result<String, MaveError> {
        VariantAssembler::new().assemble_nucleotide(&nt(tokens))
    }

    #[test]
    fn test_single_event() {
        assert_eq!(assemble(&["c.4T>G"]).unwrap(), "c.4T>G");
        assert_eq!(assemble(&["c.4="]).unwrap(), "c.4=");
    }

    #[test]
    fn test_adjacent_same_codon_is_delins() {
        assert_eq!(assemble(&["c.4T>G", "c.5T>G"]).unwrap(), "c.4_5delinsGG");
    }

    #[test]
    fn test_gap_is_multi() {
        assert_eq!(assemble(&["c.7G>A", "c.9T>A"]).unwrap(), "c.[7G>A;9T>A]");
    }

    #[test]
    fn test_order_of_groups_preserved() {
        assert_eq!(
            assemble(&["c.10T>G", "c.1C>A"]).unwrap(),
            "c.[10T>G;1C>A]"
        );
    }

    #[test]
    fn test_dedup() {
        assert_eq!(
            assemble(&["c.4T>G", "c.4T>G"]).unwrap(),
            assemble(&["c.4T>G"]).unwrap()
        );
        assert_eq!(
            assemble(&["c.4T>G", "c.5T>G", "c.4T>G"]).unwrap(),
            "c.4_5delinsGG"
        );
    }

    #[test]
    fn test_mixed_silence_drops_silent() {
        assert_eq!(assemble(&["c.7=", "c.8G>A", "c.9T>A"]).unwrap(), "c.8_9delinsAA");
    }

    #[test]
    fn test_non_coding_is_not_grouped() {
        assert_eq!(
            assemble(&["n.4T>G", "n.5T>G"]).unwrap(),
            "n.[4T>G;5T>G]"
        );
    }

    #[test]
    fn test_upstream_positions_not_grouped() {
        assert_eq!(
            assemble(&["c.-455T>A", "c.1A>G"]).unwrap(),
            "c.[-455T>A;1A>G]"
        );
    }

    #[test]
    fn test_mixed_prefix_rejected() {
        assert!(matches!(
            assemble(&["c.1A>G", "n.2A>G"]),
            Err(MaveError::MixedPrefix { .. })
        ));
    }

    #[test]
    fn test_zero_position_fails_grammar() {
        assert!(matches!(
            assemble(&["g.0A>G"]),
            Err(MaveError::AssemblyInvariant { .. })
        ));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(VariantAssembler::new().assemble_nucleotide(&[]).is_err());
        assert!(VariantAssembler::new().assemble_protein(&[]).is_err());
    }

    #[test]
    fn test_protein_single_and_multi() {
        let assembler = VariantAssembler::new();
        assert_eq!(
            assembler.assemble_protein(&pro(&["p.L2G"])).unwrap(),
            "p.Leu2Gly"
        );
        assert_eq!(
            assembler
                .assemble_protein(&pro(&["p.Leu2Gly", "p.Trp7Ter", "p.Leu2Gly"]))
                .unwrap(),
            "p.[Leu2Gly;Trp7Ter]"
        );
    }

    #[test]
    fn test_protein_silent() {
        let event = ProteinEvent::synonymous(1, AminoAcid::Met).unwrap();
        assert_eq!(
            VariantAssembler::new().assemble_protein(&[event]).unwrap(),
            "p.Met1="
        );
    }

    #[test]
    fn test_special() {
        let assembler = VariantAssembler::new();
        assert_eq!(
            assembler
                .assemble_special(SpecialVariant::WildType, EventClass::Nucleotide)
                .unwrap(),
            "_wt"
        );
    }

    struct RejectAll;

    impl VariantGrammar for RejectAll {
        fn matches(&self, _: &str, _: EventClass, _: Arity) -> bool {
            false
        }
    }

    #[test]
    fn test_grammar_failure_surfaces_events() {
        let assembler = VariantAssembler::with_grammar(RejectAll);
        let err = assembler.assemble_nucleotide(&nt(&["c.4T>G"])).unwrap_err();
        match err {
            MaveError::AssemblyInvariant { variant, events } => {
                assert_eq!(variant, "c.4T>G");
                assert_eq!(events, "[c.4T>G]");
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
