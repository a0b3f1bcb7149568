//! Protein variant classification.
//!
//! Coarse effect classes read off the notation alone, used for summaries.

use crate::event::{SYNONYMOUS, WILD_TYPE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Effect class of a protein variant string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProteinVariantClass {
    Synonymous,
    Unknown,
    Nonsense,
    Multi,
    Frameshift,
    Indel,
    Deletion,
    Insertion,
    Missense,
}

impl ProteinVariantClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Synonymous => "synonymous",
            Self::Unknown => "unknown",
            Self::Nonsense => "nonsense",
            Self::Multi => "multi",
            Self::Frameshift => "frameshift",
            Self::Indel => "indel",
            Self::Deletion => "deletion",
            Self::Insertion => "insertion",
            Self::Missense => "missense",
        }
    }
}

impl fmt::Display for ProteinVariantClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a protein variant string.
///
/// Checks run from the most to the least specific notation, so a frameshift
/// ending in `Ter` is a frameshift rather than a nonsense change.
pub fn classify_protein_variant(hgvs_pro: &str) -> ProteinVariantClass {
    let variant = hgvs_pro.trim();
    if variant == SYNONYMOUS || variant.ends_with('=') {
        return ProteinVariantClass::Synonymous;
    }
    if variant == WILD_TYPE || variant.contains('?') {
        return ProteinVariantClass::Unknown;
    }
    if variant.contains('[') || variant.contains(';') {
        return ProteinVariantClass::Multi;
    }
    if variant.contains("fs") {
        return ProteinVariantClass::Frameshift;
    }
    if variant.contains("delins") {
        return ProteinVariantClass::Indel;
    }
    if variant.contains("del") {
        return ProteinVariantClass::Deletion;
    }
    if variant.contains("ins") || variant.contains("dup") {
        return ProteinVariantClass::Insertion;
    }
    if variant.ends_with("Ter") || variant.ends_with('*') {
        return ProteinVariantClass::Nonsense;
    }
    ProteinVariantClass::Missense
}
