//! Token parsers
//!
//! Parses one raw substitution token into a [`Token`]. Special markers are
//! recognized before any structural parsing and returned untouched.

use super::{
    CoordinatePrefix, EventClass, NucleotideEvent, NucleotideToken, ProteinEvent, ProteinToken,
    SpecialVariant, Token,
};
use crate::error::{suggest_amino_acid, MaveError};
use crate::sequence::{AminoAcid, Base};
use nom::{
    branch::alt,
    bytes::complete::{tag, take},
    character::complete::{char, digit1, one_of},
    combinator::{all_consuming, map, map_opt, opt, value},
    error::{Error, ErrorKind},
    sequence::terminated,
    IResult, Parser,
};

/// Parse a token of the declared class.
pub fn parse_token(input: &str, class: EventClass) -> Result<Token, MaveError> {
    match class {
        EventClass::Nucleotide => parse_nucleotide_token(input).map(Token::Nucleotide),
        EventClass::Protein => parse_protein_token(input).map(Token::Protein),
    }
}

/// Parse a nucleotide token: `_wt`, `_sy`, `c.4T>G`, `c.4=`, `n.-12A>C`.
pub fn parse_nucleotide_token(input: &str) -> Result<NucleotideToken, MaveError> {
    let token = input.trim();
    if let Some(special) = SpecialVariant::parse(token) {
        return Ok(NucleotideToken::Special(special));
    }

    all_consuming(nucleotide_event)
        .parse(token)
        .map(|(_, event)| NucleotideToken::Event(event))
        .map_err(|_| MaveError::invalid_token(token, EventClass::Nucleotide.name()))
}

/// Parse a protein token: `_wt`, `_sy`, `p.=`, `p.Leu5Gly`, `p.L5G`, `(p.Leu5=)`.
///
/// One-letter residues are normalized to three-letter codes.
pub fn parse_protein_token(input: &str) -> Result<ProteinToken, MaveError> {
    let token = strip_parentheses(input.trim());
    if let Some(special) = SpecialVariant::parse(token) {
        return Ok(ProteinToken::Special(special));
    }
    if token == "p.=" {
        return Ok(ProteinToken::UnresolvedSilent);
    }

    match all_consuming(protein_event).parse(token) {
        Ok((_, Some(event))) => Ok(ProteinToken::Event(event)),
        _ => Err(MaveError::InvalidToken {
            token: token.to_string(),
            kind: EventClass::Protein.name(),
            hint: residue_hint(token),
        }),
    }
}

fn strip_parentheses(token: &str) -> &str {
    token
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .map(str::trim)
        .unwrap_or(token)
}

fn residue_hint(token: &str) -> Option<String> {
    let rest = token.strip_prefix("p.")?;
    let letters: String = rest.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    if AminoAcid::from_code(&letters).is_some() {
        return None;
    }
    suggest_amino_acid(&letters).map(|s| format!("did you mean {}?", s))
}

fn coordinate_prefix(input: &str) -> IResult<&str, CoordinatePrefix> {
    terminated(
        map_opt(one_of("cngmo"), CoordinatePrefix::from_char),
        char('.'),
    )
    .parse(input)
}

fn number(input: &str) -> IResult<&str, i64> {
    let (rest, digits) = digit1.parse(input)?;
    let value: i64 = digits
        .parse()
        .map_err(|_| nom::Err::Error(Error::new(input, ErrorKind::Digit)))?;
    Ok((rest, value))
}

/// Position with an optional leading `-` for upstream (5' UTR) positions.
///
/// An unsigned `0` is accepted so that zero-based tables can be read; the
/// converter decides whether it is legal.
fn signed_position(input: &str) -> IResult<&str, i64> {
    let (rest, (sign, value)) = (opt(char('-')), number).parse(input)?;
    match (sign, value) {
        (Some(_), 0) => Err(nom::Err::Error(Error::new(input, ErrorKind::Verify))),
        (Some(_), v) => Ok((rest, -v)),
        (None, v) => Ok((rest, v)),
    }
}

fn base(input: &str) -> IResult<&str, Base> {
    map_opt(one_of("ACGT"), Base::from_char).parse(input)
}

fn nucleotide_event(input: &str) -> IResult<&str, NucleotideEvent> {
    let (rest, (prefix, position)) = (coordinate_prefix, signed_position).parse(input)?;
    let (rest, change) = alt((
        value(None, char('=')),
        map((base, char('>'), base), |(r, _, a)| Some((r, a))),
    ))
    .parse(rest)?;

    let event = match change {
        Some((reference, alternate)) => {
            NucleotideEvent::substitution(prefix, position, reference, alternate)
        }
        None => NucleotideEvent::unchanged(prefix, position),
    };
    Ok((rest, event))
}

fn residue(input: &str) -> IResult<&str, AminoAcid> {
    alt((
        map_opt(take(3usize), AminoAcid::from_three_letter),
        map_opt(take(1usize), AminoAcid::from_code),
    ))
    .parse(input)
}

fn protein_event(input: &str) -> IResult<&str, Option<ProteinEvent>> {
    let (rest, (_, reference, position)) = (tag("p."), residue, number).parse(input)?;
    let (rest, alternate) = alt((value(None, char('=')), map(residue, Some))).parse(rest)?;
    let alternate = alternate.unwrap_or(reference);
    Ok((
        rest,
        ProteinEvent::substitution(position, reference, alternate).ok(),
    ))
}
