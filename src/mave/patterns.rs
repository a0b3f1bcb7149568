//! Regular expressions for the MAVE-HGVS grammar.

use once_cell::sync::Lazy;
use regex::Regex;

const DNA_BASE: &str = "[ACGTN]";

const AMINO_ACID: &str =
    "(?:Ala|Arg|Asn|Asp|Cys|Gln|Glu|Gly|His|Ile|Leu|Lys|Met|Phe|Pro|Pyl|Sec|Ser|Thr|Trp|Tyr|Val|Ter|Xaa)";

/// Plain 1-based position.
const POSITION: &str = "[1-9][0-9]*";

/// Coding position: optional UTR marker and optional intronic offset.
const CODING_POSITION: &str = r"(?:[-*]?[1-9][0-9]*(?:[+-][1-9][0-9]*)?)";

/// Non-coding transcript position: upstream marker and intronic offset.
const NON_CODING_POSITION: &str = r"(?:-?[1-9][0-9]*(?:[+-][1-9][0-9]*)?)";

/// All nucleotide edits over a position pattern.
fn dna_edit(pos: &str) -> String {
    let base = DNA_BASE;
    let range = format!("{pos}(?:_{pos})?");
    [
        format!("{pos}{base}>{base}"),
        format!("(?:{range})?="),
        format!("{range}delins{base}+"),
        format!("{range}del"),
        format!("{range}dup"),
        format!("{pos}_{pos}ins{base}+"),
    ]
    .map(|e| format!("(?:{e})"))
    .join("|")
}

fn protein_edit() -> String {
    let aa = AMINO_ACID;
    let aa_pos = format!("{aa}{POSITION}");
    let range = format!("{aa_pos}(?:_{aa_pos})?");
    [
        format!("{aa_pos}(?:{aa}|=)"),
        "=".to_string(),
        format!("{range}delins{aa}+"),
        format!("{range}del"),
        format!("{range}dup"),
        format!("{aa_pos}_{aa_pos}ins{aa}+"),
        format!("{aa_pos}(?:{aa})?fs(?:Ter{POSITION})?"),
    ]
    .map(|e| format!("(?:{e})"))
    .join("|")
}

/// Nucleotide edits keyed by the prefixes that share a position grammar.
fn dna_prefixed_edits() -> Vec<(&'static str, String)> {
    vec![
        ("c", dna_edit(CODING_POSITION)),
        ("n", dna_edit(NON_CODING_POSITION)),
        ("[gmo]", dna_edit(POSITION)),
    ]
}

fn single(prefixed: &[(&str, String)]) -> String {
    let alternatives: Vec<String> = prefixed
        .iter()
        .map(|(prefix, edit)| format!(r"(?:{prefix}\.(?:{edit}))"))
        .collect();
    format!("^(?:{})$", alternatives.join("|"))
}

fn multi(prefixed: &[(&str, String)]) -> String {
    let alternatives: Vec<String> = prefixed
        .iter()
        .map(|(prefix, edit)| format!(r"(?:{prefix}\.\[(?:{edit})(?:;(?:{edit}))+\])"))
        .collect();
    format!("^(?:{})$", alternatives.join("|"))
}

fn compile(pattern: String) -> Regex {
    Regex::new(&pattern).expect("MAVE-HGVS pattern must compile")
}

pub(super) static DNA_SINGLE: Lazy<Regex> = Lazy::new(|| compile(single(&dna_prefixed_edits())));

pub(super) static DNA_MULTI: Lazy<Regex> = Lazy::new(|| compile(multi(&dna_prefixed_edits())));

pub(super) static PRO_SINGLE: Lazy<Regex> =
    Lazy::new(|| compile(single(&[("p", protein_edit())])));

pub(super) static PRO_MULTI: Lazy<Regex> = Lazy::new(|| compile(multi(&[("p", protein_edit())])));
