//! Single substitution events and raw token classification.
//!
//! A row's raw identifier cell is broken into tokens, and each token parses
//! into either a special marker or one structured substitution event:
//!
//! - [`NucleotideEvent`]: `c.4T>G`, `c.5=`, `n.-12A>C`
//! - [`ProteinEvent`]: `p.Leu2Gly`, `p.Met1=`

mod parser;

pub use parser::{parse_nucleotide_token, parse_protein_token, parse_token};

use crate::error::MaveError;
use crate::sequence::{AminoAcid, Base};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wild-type marker.
pub const WILD_TYPE: &str = "_wt";
/// Synonymous marker for changes with unspecified position.
pub const SYNONYMOUS: &str = "_sy";

/// A "no information" token that passes through unparsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialVariant {
    WildType,
    Synonymous,
}

impl SpecialVariant {
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            WILD_TYPE => Some(Self::WildType),
            SYNONYMOUS => Some(Self::Synonymous),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WildType => WILD_TYPE,
            Self::Synonymous => SYNONYMOUS,
        }
    }
}

impl fmt::Display for SpecialVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a token describes DNA or protein.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventClass {
    Nucleotide,
    Protein,
}

impl EventClass {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nucleotide => "nucleotide",
            Self::Protein => "protein",
        }
    }
}

/// Nucleotide coordinate system of an event (`c.`, `n.`, `g.`, `m.`, `o.`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordinatePrefix {
    Coding,
    NonCoding,
    Genomic,
    Mitochondrial,
    Circular,
}

impl CoordinatePrefix {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'c' => Some(Self::Coding),
            'n' => Some(Self::NonCoding),
            'g' => Some(Self::Genomic),
            'm' => Some(Self::Mitochondrial),
            'o' => Some(Self::Circular),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Self::Coding => 'c',
            Self::NonCoding => 'n',
            Self::Genomic => 'g',
            Self::Mitochondrial => 'm',
            Self::Circular => 'o',
        }
    }

    pub fn is_coding(&self) -> bool {
        matches!(self, Self::Coding)
    }
}

impl fmt::Display for CoordinatePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.", self.as_char())
    }
}

/// One nucleotide substitution, or a silent position (`N=`).
///
/// Silent events either carry no bases or carry equal reference and
/// alternate bases; a non-silent event always has differing bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NucleotideEvent {
    prefix: CoordinatePrefix,
    position: i64,
    reference: Option<Base>,
    alternate: Option<Base>,
    silent: bool,
}

impl NucleotideEvent {
    /// A substitution; equal bases produce a silent event.
    pub fn substitution(
        prefix: CoordinatePrefix,
        position: i64,
        reference: Base,
        alternate: Base,
    ) -> Self {
        Self {
            prefix,
            position,
            reference: Some(reference),
            alternate: Some(alternate),
            silent: reference == alternate,
        }
    }

    /// The `N=` form.
    pub fn unchanged(prefix: CoordinatePrefix, position: i64) -> Self {
        Self {
            prefix,
            position,
            reference: None,
            alternate: None,
            silent: true,
        }
    }

    pub fn prefix(&self) -> CoordinatePrefix {
        self.prefix
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn reference(&self) -> Option<Base> {
        self.reference
    }

    pub fn alternate(&self) -> Option<Base> {
        self.alternate
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }

    /// Same event at another position.
    pub fn with_position(&self, position: i64) -> Self {
        Self { position, ..*self }
    }

    /// 1-based codon number, or `None` for positions before the first base.
    pub fn codon_number(&self) -> Option<i64> {
        (self.position >= 1).then(|| (self.position - 1) / 3 + 1)
    }

    /// Position within the codon (1..=3).
    pub fn frame(&self) -> Option<usize> {
        self.codon_number()
            .and_then(|codon| usize::try_from(self.position - 3 * (codon - 1)).ok())
    }

    /// Edit without the prefix (`4T>G`, `5=`).
    pub fn edit(&self) -> String {
        match (self.silent, self.reference, self.alternate) {
            (false, Some(r), Some(a)) => format!("{}{}>{}", self.position, r, a),
            _ => format!("{}=", self.position),
        }
    }
}

impl fmt::Display for NucleotideEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.edit())
    }
}

/// One protein substitution, or a silent residue (`Met1=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProteinEvent {
    position: i64,
    reference: AminoAcid,
    alternate: AminoAcid,
    silent: bool,
}

impl ProteinEvent {
    /// A substitution; equal residues produce a silent event.
    pub fn substitution(
        position: i64,
        reference: AminoAcid,
        alternate: AminoAcid,
    ) -> Result<Self, MaveError> {
        check_protein_position(position)?;
        Ok(Self {
            position,
            reference,
            alternate,
            silent: reference == alternate,
        })
    }

    /// A silent residue at `position`.
    pub fn synonymous(position: i64, reference: AminoAcid) -> Result<Self, MaveError> {
        Self::substitution(position, reference, reference)
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn reference(&self) -> AminoAcid {
        self.reference
    }

    pub fn alternate(&self) -> AminoAcid {
        self.alternate
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }

    /// Move the event; positions below 1 are rejected and leave it unchanged.
    pub fn set_position(&mut self, position: i64) -> Result<(), MaveError> {
        check_protein_position(position)?;
        self.position = position;
        Ok(())
    }

    pub fn with_position(&self, position: i64) -> Result<Self, MaveError> {
        let mut moved = *self;
        moved.set_position(position)?;
        Ok(moved)
    }

    /// Edit without the prefix (`Leu5Gly`, `Met1=`).
    pub fn edit(&self) -> String {
        if self.silent {
            format!("{}{}=", self.reference, self.position)
        } else {
            format!("{}{}{}", self.reference, self.position, self.alternate)
        }
    }
}

impl fmt::Display for ProteinEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p.{}", self.edit())
    }
}

fn check_protein_position(position: i64) -> Result<(), MaveError> {
    if position < 1 {
        return Err(MaveError::InvalidPosition {
            position,
            msg: "protein positions start at 1".to_string(),
        });
    }
    Ok(())
}

/// A parsed nucleotide-column token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NucleotideToken {
    Special(SpecialVariant),
    Event(NucleotideEvent),
}

/// A parsed protein-column token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProteinToken {
    Special(SpecialVariant),
    /// `p.=`: silent, but without the residue or position.
    UnresolvedSilent,
    Event(ProteinEvent),
}

/// A parsed token of either class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Nucleotide(NucleotideToken),
    Protein(ProteinToken),
}
