//! Row shapes and the parsed form of one identifier cell.
//!
//! A cell holds either a special marker or comma-separated sub-tokens that
//! all share one shape:
//!
//! | Shape | Example |
//! |-------|---------|
//! | Nucleotide | `c.4T>G, c.5T>G` |
//! | Protein | `p.Leu2Gly, p.Trp7Ter` |
//! | Mixed | `c.4T>G (p.Phe2Cys), c.6T>C (p.=)` |

use crate::config::ElementKind;
use crate::error::MaveError;
use crate::event::{
    parse_nucleotide_token, parse_protein_token, NucleotideEvent, NucleotideToken, ProteinToken,
    SpecialVariant,
};

/// Shape shared by every sub-token of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowShape {
    Special,
    Nucleotide,
    Protein,
    Mixed,
}

impl RowShape {
    fn of(token: &str) -> Self {
        if token.split_whitespace().nth(1).is_some() {
            RowShape::Mixed
        } else if token.starts_with("p.") {
            RowShape::Protein
        } else {
            RowShape::Nucleotide
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RowShape::Special => "special",
            RowShape::Nucleotide => "nucleotide",
            RowShape::Protein => "protein",
            RowShape::Mixed => "mixed",
        }
    }
}

/// Nucleotide side of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NucleotidePart {
    Absent,
    Special(SpecialVariant),
    Events(Vec<NucleotideEvent>),
}

/// Protein side of a row. Events may still hold unresolved `p.=` tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProteinPart {
    Absent,
    Special(SpecialVariant),
    Events(Vec<ProteinToken>),
}

/// One row's identifier cell, parsed but not yet placed on the target.
///
/// In mixed rows both parts hold events paired by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantCall {
    pub shape: RowShape,
    pub nt: NucleotidePart,
    pub pro: ProteinPart,
}

impl VariantCall {
    /// Parse a raw identifier cell.
    pub fn parse(raw: &str, element: ElementKind) -> Result<Self, MaveError> {
        let raw = raw.trim();

        if let Some(special) = SpecialVariant::parse(raw) {
            let (nt, pro) = match element {
                ElementKind::Synonymous => (
                    NucleotidePart::Absent,
                    ProteinPart::Special(SpecialVariant::Synonymous),
                ),
                ElementKind::Variants => {
                    (NucleotidePart::Special(special), ProteinPart::Special(special))
                }
            };
            return Ok(Self {
                shape: RowShape::Special,
                nt,
                pro,
            });
        }

        let tokens: Vec<&str> = raw.split(',').map(str::trim).collect();
        if let Some(special) = tokens.iter().find_map(|t| SpecialVariant::parse(t)) {
            return Err(MaveError::SpecialNotAlone {
                special: special.to_string(),
            });
        }

        let shape = RowShape::of(tokens[0]);
        if let Some(other) = tokens.iter().map(|t| RowShape::of(t)).find(|s| *s != shape) {
            return Err(MaveError::InconsistentRowShape {
                row: raw.to_string(),
                msg: format!("{} and {} sub-tokens in one row", shape.name(), other.name()),
            });
        }

        match shape {
            RowShape::Protein => Ok(Self {
                shape,
                nt: NucleotidePart::Absent,
                pro: ProteinPart::Events(
                    tokens.iter().map(|t| protein_token(t)).collect::<Result<_, _>>()?,
                ),
            }),
            RowShape::Mixed => {
                let mut nts = Vec::with_capacity(tokens.len());
                let mut pros = Vec::with_capacity(tokens.len());
                for token in &tokens {
                    let mut parts = token.split_whitespace();
                    match (parts.next(), parts.next(), parts.next()) {
                        (Some(nt), Some(pro), None) => {
                            nts.push(nucleotide_event(nt)?);
                            pros.push(protein_token(pro)?);
                        }
                        _ => {
                            return Err(MaveError::InconsistentRowShape {
                                row: raw.to_string(),
                                msg: format!("'{}' is not a '<nt> (<pro>)' pair", token),
                            })
                        }
                    }
                }
                Ok(Self {
                    shape,
                    nt: NucleotidePart::Events(nts),
                    pro: ProteinPart::Events(pros),
                })
            }
            _ => Ok(Self {
                shape,
                nt: NucleotidePart::Events(
                    tokens.iter().map(|t| nucleotide_event(t)).collect::<Result<_, _>>()?,
                ),
                pro: ProteinPart::Absent,
            }),
        }
    }
}

fn nucleotide_event(token: &str) -> Result<NucleotideEvent, MaveError> {
    match parse_nucleotide_token(token)? {
        NucleotideToken::Event(event) => Ok(event),
        NucleotideToken::Special(special) => Err(MaveError::SpecialNotAlone {
            special: special.to_string(),
        }),
    }
}

fn protein_token(token: &str) -> Result<ProteinToken, MaveError> {
    match parse_protein_token(token)? {
        ProteinToken::Special(special) => Err(MaveError::SpecialNotAlone {
            special: special.to_string(),
        }),
        other => Ok(other),
    }
}
