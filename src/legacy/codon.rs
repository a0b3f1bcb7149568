//! Codon change rendering.
//!
//! Saturation mutagenesis tools often report variants as a pair of codons at
//! a residue position. This renders the change as a coding variant.

use crate::error::MaveError;
use crate::event::WILD_TYPE;
use crate::sequence::Codon;

/// Render the change from `target_codon` to `variant_codon` at residue
/// `aa_position` as a MAVE-HGVS coding variant.
///
/// Adjacent two-base changes become a delins when `prefer_delins` is set;
/// changes at the first and third base are always listed separately.
///
/// ```
/// use ferro_mave::legacy::codon_change_to_mave;
///
/// assert_eq!(codon_change_to_mave("ATG", "ATC", 1, true).unwrap(), "c.3G>C");
/// assert_eq!(codon_change_to_mave("ATG", "CCG", 2, true).unwrap(), "c.4_5delinsCC");
/// assert_eq!(codon_change_to_mave("ATG", "CTC", 2, true).unwrap(), "c.[4A>C;6G>C]");
/// ```
pub fn codon_change_to_mave(
    target_codon: &str,
    variant_codon: &str,
    aa_position: i64,
    prefer_delins: bool,
) -> Result<String, MaveError> {
    let target = parse_codon(target_codon, "target")?;
    let variant = parse_codon(variant_codon, "variant")?;
    if aa_position < 1 {
        return Err(MaveError::InvalidPosition {
            position: aa_position,
            msg: "amino acid positions start at 1".to_string(),
        });
    }
    if target == variant {
        return Ok(WILD_TYPE.to_string());
    }

    let start = 3 * (aa_position - 1) + 1;
    let t = target.bases();
    let v = variant.bases();
    let changed = [t[0] != v[0], t[1] != v[1], t[2] != v[2]];
    let sub = |i: usize| format!("{}{}>{}", start + i as i64, t[i], v[i]);
    let delins = |from: usize, to: usize| {
        let bases: String = v[from..=to].iter().map(|b| b.to_char()).collect();
        format!("{}_{}delins{}", start + from as i64, start + to as i64, bases)
    };

    let edit = match changed {
        [true, false, false] => sub(0),
        [false, true, false] => sub(1),
        [false, false, true] => sub(2),
        [true, false, true] => format!("[{};{}]", sub(0), sub(2)),
        [true, true, false] if prefer_delins => delins(0, 1),
        [true, true, false] => format!("[{};{}]", sub(0), sub(1)),
        [false, true, true] if prefer_delins => delins(1, 2),
        [false, true, true] => format!("[{};{}]", sub(1), sub(2)),
        _ => delins(0, 2),
    };
    Ok(format!("c.{}", edit))
}

fn parse_codon(codon: &str, role: &str) -> Result<Codon, MaveError> {
    Codon::parse(codon).ok_or_else(|| MaveError::InvalidSequence {
        msg: format!("invalid {} codon '{}'", role, codon),
    })
}
