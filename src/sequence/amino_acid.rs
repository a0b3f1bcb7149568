//! Amino acid residue codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A protein residue.
///
/// Stop is `Ter` and any unknown residue collapses to the `Xaa` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AminoAcid {
    Ala, // A
    Arg, // R
    Asn, // N
    Asp, // D
    Cys, // C
    Gln, // Q
    Glu, // E
    Gly, // G
    His, // H
    Ile, // I
    Leu, // L
    Lys, // K
    Met, // M
    Phe, // F
    Pro, // P
    Pyl, // O
    Sec, // U
    Ser, // S
    Thr, // T
    Trp, // W
    Tyr, // Y
    Val, // V
    Ter, // *
    Xaa, // X
}

impl AminoAcid {
    /// Every residue in the order of its three-letter code table.
    pub const ALL: [AminoAcid; 24] = [
        Self::Ala,
        Self::Arg,
        Self::Asn,
        Self::Asp,
        Self::Cys,
        Self::Gln,
        Self::Glu,
        Self::Gly,
        Self::His,
        Self::Ile,
        Self::Leu,
        Self::Lys,
        Self::Met,
        Self::Phe,
        Self::Pro,
        Self::Pyl,
        Self::Sec,
        Self::Ser,
        Self::Thr,
        Self::Trp,
        Self::Tyr,
        Self::Val,
        Self::Ter,
        Self::Xaa,
    ];

    /// Parse a three-letter code (`Ala`, `Ter`, `Xaa`).
    pub fn from_three_letter(s: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|aa| aa.to_three_letter() == s)
    }

    /// Three-letter code.
    pub fn to_three_letter(&self) -> &'static str {
        match self {
            Self::Ala => "Ala",
            Self::Arg => "Arg",
            Self::Asn => "Asn",
            Self::Asp => "Asp",
            Self::Cys => "Cys",
            Self::Gln => "Gln",
            Self::Glu => "Glu",
            Self::Gly => "Gly",
            Self::His => "His",
            Self::Ile => "Ile",
            Self::Leu => "Leu",
            Self::Lys => "Lys",
            Self::Met => "Met",
            Self::Phe => "Phe",
            Self::Pro => "Pro",
            Self::Pyl => "Pyl",
            Self::Sec => "Sec",
            Self::Ser => "Ser",
            Self::Thr => "Thr",
            Self::Trp => "Trp",
            Self::Tyr => "Tyr",
            Self::Val => "Val",
            Self::Ter => "Ter",
            Self::Xaa => "Xaa",
        }
    }

    /// One-letter code.
    pub fn to_one_letter(&self) -> char {
        match self {
            Self::Ala => 'A',
            Self::Arg => 'R',
            Self::Asn => 'N',
            Self::Asp => 'D',
            Self::Cys => 'C',
            Self::Gln => 'Q',
            Self::Glu => 'E',
            Self::Gly => 'G',
            Self::His => 'H',
            Self::Ile => 'I',
            Self::Leu => 'L',
            Self::Lys => 'K',
            Self::Met => 'M',
            Self::Phe => 'F',
            Self::Pro => 'P',
            Self::Pyl => 'O',
            Self::Sec => 'U',
            Self::Ser => 'S',
            Self::Thr => 'T',
            Self::Trp => 'W',
            Self::Tyr => 'Y',
            Self::Val => 'V',
            Self::Ter => '*',
            Self::Xaa => 'X',
        }
    }

    /// Parse a one-letter code (uppercase only; `*` is stop, `X` unknown).
    pub fn from_one_letter(c: char) -> Option<Self> {
        Self::ALL.iter().copied().find(|aa| aa.to_one_letter() == c)
    }

    /// Parse either form, normalizing to the residue.
    ///
    /// ```
    /// use ferro_mave::sequence::AminoAcid;
    ///
    /// assert_eq!(AminoAcid::from_code("L"), Some(AminoAcid::Leu));
    /// assert_eq!(AminoAcid::from_code("Leu"), Some(AminoAcid::Leu));
    /// assert_eq!(AminoAcid::from_code("*"), Some(AminoAcid::Ter));
    /// assert_eq!(AminoAcid::from_code("Foo"), None);
    /// ```
    pub fn from_code(code: &str) -> Option<Self> {
        let mut chars = code.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_one_letter(c),
            _ => Self::from_three_letter(code),
        }
    }

    pub fn is_stop(&self) -> bool {
        matches!(self, Self::Ter)
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_three_letter())
    }
}
