//! Delins expansion.
//!
//! Handles the reverse of codon collapse for equal-length delins events:
//! - `c.4_6delinsGCT` on `...TTT...` → `c.[4T>G;5T>C]`

use crate::error::MaveError;
use crate::sequence::Base;

/// Expand an equal-length delins into per-base substitutions.
///
/// `offset` is the index of the delins' position 1 within `target`, so a
/// full-length sequence can stand in for a domain target. Unchanged bases
/// are omitted.
pub fn delins_to_substitutions(
    target: &str,
    delins: &str,
    offset: usize,
) -> Result<String, MaveError> {
    let (prefix, start, end, inserted) = split_delins(delins)
        .ok_or_else(|| MaveError::invalid_token(delins, "delins"))?;

    let span = end - start + 1;
    if inserted.len() != span {
        return Err(MaveError::InvalidToken {
            token: delins.to_string(),
            kind: "delins",
            hint: Some(format!(
                "range covers {} bases but {} are inserted",
                span,
                inserted.len()
            )),
        });
    }

    let from = start - 1 + offset;
    let to = end + offset;
    let reference = target
        .get(from..to)
        .ok_or_else(|| MaveError::PositionOutOfBounds {
            variant: delins.to_string(),
            position: end as i64,
            length: target.len().saturating_sub(offset),
        })?;
    if reference.eq_ignore_ascii_case(inserted) {
        return Err(MaveError::InvalidToken {
            token: delins.to_string(),
            kind: "delins",
            hint: Some("inserted bases match the target".to_string()),
        });
    }

    let mut edits = Vec::new();
    for (i, (r, a)) in reference.chars().zip(inserted.chars()).enumerate() {
        let r = Base::from_char(r).ok_or_else(|| MaveError::InvalidSequence {
            msg: format!("invalid base '{}' in target", r),
        })?;
        let a = Base::from_char(a).ok_or_else(|| MaveError::invalid_token(delins, "delins"))?;
        if r != a {
            edits.push(format!("{}{}>{}", start + i, r, a));
        }
    }

    Ok(match edits.as_slice() {
        [single] => format!("{}.{}", prefix, single),
        _ => format!("{}.[{}]", prefix, edits.join(";")),
    })
}

/// Split `c.4_6delinsGCT` into its prefix, range, and inserted bases.
fn split_delins(input: &str) -> Option<(char, usize, usize, &str)> {
    let input = input.trim();
    let prefix = input.chars().next()?;
    if !matches!(prefix, 'c' | 'n' | 'g' | 'm' | 'o') {
        return None;
    }
    let body = input.get(1..)?.strip_prefix('.')?;
    let (range, inserted) = body.split_once("delins")?;
    let (start, end) = range.split_once('_')?;
    let start: usize = start.parse().ok()?;
    let end: usize = end.parse().ok()?;
    if start == 0 || end < start || inserted.is_empty() {
        return None;
    }
    Some((prefix, start, end, inserted))
}
