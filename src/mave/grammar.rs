use super::patterns::{DNA_MULTI, DNA_SINGLE, PRO_MULTI, PRO_SINGLE};
use crate::event::{EventClass, SpecialVariant};

/// Whether a variant string holds one event or a bracketed list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    Single,
    Multi,
}

/// Pass/fail check of a variant string against a notation grammar.
pub trait VariantGrammar: Send + Sync {
    /// Check a string of the given class and arity.
    fn matches(&self, variant: &str, class: EventClass, arity: Arity) -> bool;

    /// Check a string of either arity.
    fn is_valid(&self, variant: &str, class: EventClass) -> bool {
        self.matches(variant, class, Arity::Single) || self.matches(variant, class, Arity::Multi)
    }
}

/// The MAVE-HGVS grammar.
///
/// Special markers are valid single variants of both classes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaveHgvsGrammar;

impl VariantGrammar for MaveHgvsGrammar {
    fn matches(&self, variant: &str, class: EventClass, arity: Arity) -> bool {
        if SpecialVariant::parse(variant).is_some() {
            return arity == Arity::Single && variant.trim() == variant;
        }
        let pattern = match (class, arity) {
            (EventClass::Nucleotide, Arity::Single) => &DNA_SINGLE,
            (EventClass::Nucleotide, Arity::Multi) => &DNA_MULTI,
            (EventClass::Protein, Arity::Single) => &PRO_SINGLE,
            (EventClass::Protein, Arity::Multi) => &PRO_MULTI,
        };
        pattern.is_match(variant)
    }
}
