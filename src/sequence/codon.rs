//! Nucleotide bases, codons, and the codon-translation table.

use super::AminoAcid;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single DNA base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Base {
    A,
    C,
    G,
    T,
}

impl Base {
    /// Parse a base; `U` is read as `T` and lowercase is accepted.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Base::A),
            'C' => Some(Base::C),
            'G' => Some(Base::G),
            'T' | 'U' => Some(Base::T),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Base::A => 'A',
            Base::C => 'C',
            Base::G => 'G',
            Base::T => 'T',
        }
    }
}

impl std::fmt::Display for Base {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Three bases read as one residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Codon([Base; 3]);

impl Codon {
    pub fn new(b1: Base, b2: Base, b3: Base) -> Self {
        Self([b1, b2, b3])
    }

    /// Parse a codon from exactly three base characters.
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let b1 = Base::from_char(chars.next()?)?;
        let b2 = Base::from_char(chars.next()?)?;
        let b3 = Base::from_char(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Self([b1, b2, b3]))
    }

    pub fn bases(&self) -> &[Base; 3] {
        &self.0
    }

    /// Base at a 1-based frame position (1..=3).
    pub fn base(&self, frame: usize) -> Option<Base> {
        frame.checked_sub(1).and_then(|i| self.0.get(i)).copied()
    }

    /// Copy of this codon with the base at `frame` (1..=3) replaced.
    pub fn with_base(mut self, frame: usize, base: Base) -> Option<Self> {
        let slot = self.0.get_mut(frame.checked_sub(1)?)?;
        *slot = base;
        Some(self)
    }
}

impl std::fmt::Display for Codon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.0[0], self.0[1], self.0[2])
    }
}

/// Standard genetic code.
///
/// Stop codons translate to [`AminoAcid::Ter`], so translation is total over
/// the 64 codons.
#[derive(Debug, Clone)]
pub struct CodonTable {
    codon_to_aa: HashMap<Codon, AminoAcid>,
}

impl CodonTable {
    pub fn standard() -> Self {
        const BASES: [Base; 4] = [Base::T, Base::C, Base::A, Base::G];
        // NCBI translation table 1, first base major, in TCAG order.
        const RESIDUES: &[u8; 64] =
            b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

        let mut codon_to_aa = HashMap::with_capacity(64);
        let mut i = 0;
        for b1 in BASES {
            for b2 in BASES {
                for b3 in BASES {
                    let aa = AminoAcid::from_one_letter(RESIDUES[i] as char)
                        .unwrap_or(AminoAcid::Xaa);
                    codon_to_aa.insert(Codon::new(b1, b2, b3), aa);
                    i += 1;
                }
            }
        }

        Self { codon_to_aa }
    }

    /// Residue encoded by a codon.
    pub fn translate(&self, codon: &Codon) -> AminoAcid {
        self.codon_to_aa
            .get(codon)
            .copied()
            .unwrap_or(AminoAcid::Xaa)
    }

    /// Residue encoded by a codon string; `None` if the string is not a codon.
    pub fn translate_str(&self, codon: &str) -> Option<AminoAcid> {
        Codon::parse(codon).map(|c| self.translate(&c))
    }

    pub fn is_stop(&self, codon: &Codon) -> bool {
        self.translate(codon).is_stop()
    }

    /// All codons encoding `aa`, in table order.
    pub fn codons_for(&self, aa: AminoAcid) -> Vec<Codon> {
        let mut codons: Vec<Codon> = self
            .codon_to_aa
            .iter()
            .filter(|(_, v)| **v == aa)
            .map(|(c, _)| *c)
            .collect();
        codons.sort_by_key(|c| c.to_string());
        codons
    }
}

impl Default for CodonTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_base_from_char() {
        assert_eq!(Base::from_char('A'), Some(Base::A));
        assert_eq!(Base::from_char('u'), Some(Base::T));
        assert_eq!(Base::from_char('N'), None);
    }

    #[test]
    fn test_codon_parse() {
        let codon = Codon::parse("ATG").unwrap();
        assert_eq!(codon.bases(), &[Base::A, Base::T, Base::G]);
        assert_eq!(codon.to_string(), "ATG");
        assert!(Codon::parse("AT").is_none());
        assert!(Codon::parse("ATGC").is_none());
        assert!(Codon::parse("ANG").is_none());
    }

    #[test]
    fn test_codon_with_base() {
        let codon = Codon::parse("ATG").unwrap();
        assert_eq!(codon.with_base(3, Base::A).unwrap().to_string(), "ATA");
        assert!(codon.with_base(0, Base::A).is_none());
        assert!(codon.with_base(4, Base::A).is_none());
        assert_eq!(codon.base(2), Some(Base::T));
    }

    #[rstest]
    #[case("ATG", AminoAcid::Met)]
    #[case("TTT", AminoAcid::Phe)]
    #[case("TGG", AminoAcid::Trp)]
    #[case("TAA", AminoAcid::Ter)]
    #[case("TAG", AminoAcid::Ter)]
    #[case("TGA", AminoAcid::Ter)]
    #[case("GGT", AminoAcid::Gly)]
    #[case("AGA", AminoAcid::Arg)]
    #[case("CAA", AminoAcid::Gln)]
    fn test_translate(#[case] codon: &str, #[case] expected: AminoAcid) {
        let table = CodonTable::standard();
        assert_eq!(table.translate_str(codon), Some(expected));
    }

    #[test]
    fn test_table_is_complete() {
        let table = CodonTable::standard();
        assert_eq!(table.codon_to_aa.len(), 64);
        assert_eq!(table.codons_for(AminoAcid::Ter).len(), 3);
        assert_eq!(table.codons_for(AminoAcid::Leu).len(), 6);
        assert_eq!(table.codons_for(AminoAcid::Met).len(), 1);
    }

    #[test]
    fn test_is_stop() {
        let table = CodonTable::standard();
        assert!(table.is_stop(&Codon::parse("TAA").unwrap()));
        assert!(!table.is_stop(&Codon::parse("TAC").unwrap()));
    }
}
