//! Legacy notation support.
//!
//! Older score sets list every base of a codon, changed or not:
//!
//! - **Per-base lists**: `c.[4T>G;5T>G;6=]` → `c.4_5delinsGG`
//! - **Wild-type lists**: `c.[1=;2=;3=]` → `_wt`
//! - **Codon changes**: `ATG` → `ATC` at residue 1 → `c.3G>C`
//! - **Delins expansion**: `c.4_6delinsGCT` → `c.[4T>G;6T>T]` minus unchanged bases
//!
//! # Example
//!
//! ```
//! use ferro_mave::legacy::{LegacyConfig, LegacyConverter};
//!
//! let converter = LegacyConverter::new(LegacyConfig::default());
//! let result = converter.convert("c.[7G>C;8G>T;9T>C]").unwrap();
//! assert!(result.is_legacy());
//! assert_eq!(result.converted, "c.7_9delinsCTC");
//!
//! // Modern variants pass through.
//! let result = converter.convert("c.4T>G").unwrap();
//! assert!(!result.is_legacy());
//! ```

mod codon;
mod protein;
mod substitution;

pub use codon::codon_change_to_mave;
pub use protein::{classify_protein_variant, ProteinVariantClass};
pub use substitution::delins_to_substitutions;

use crate::error::MaveError;
use crate::event::{parse_nucleotide_token, NucleotideEvent, NucleotideToken, WILD_TYPE};
use crate::normalize::{ReferenceEvent, VariantAssembler};
use crate::sequence::SequenceModel;

/// Legacy format detected during conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyFormat {
    /// Bracketed list with one entry per base (`c.[1C>A;2=;3=]`).
    PerBaseList,
    /// Every listed base is unchanged.
    WildTypeList,
    /// A single unbracketed `N=` token.
    WildTypeToken,
}

impl LegacyFormat {
    /// Get the deprecation warning message for this format.
    pub fn deprecation_message(&self) -> &'static str {
        match self {
            LegacyFormat::PerBaseList => {
                "Per-base lists are deprecated; use delins for adjacent changes and drop '=' entries"
            }
            LegacyFormat::WildTypeList | LegacyFormat::WildTypeToken => {
                "Unchanged positions are deprecated; use _wt for wild-type rows"
            }
        }
    }
}

/// Result of converting one variant string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyConversion {
    /// Original input string.
    pub original: String,
    /// MAVE-HGVS notation.
    pub converted: String,
    /// Legacy format detected, if any.
    pub format: Option<LegacyFormat>,
    /// Deprecation warnings.
    pub warnings: Vec<String>,
}

impl LegacyConversion {
    fn modern(original: &str) -> Self {
        Self {
            original: original.to_string(),
            converted: original.to_string(),
            format: None,
            warnings: vec![],
        }
    }

    fn legacy(original: &str, converted: String, format: LegacyFormat, warn: bool) -> Self {
        let warnings = if warn {
            vec![format.deprecation_message().to_string()]
        } else {
            vec![]
        };
        Self {
            original: original.to_string(),
            converted,
            format: Some(format),
            warnings,
        }
    }

    /// Check if a legacy format was detected.
    pub fn is_legacy(&self) -> bool {
        self.format.is_some()
    }
}

/// Configuration for legacy conversion.
#[derive(Debug, Clone)]
pub struct LegacyConfig {
    /// Emit deprecation warnings.
    pub warn_deprecated: bool,
    /// Check changed bases against the target sequence when one is given.
    pub validate_reference: bool,
}

impl Default for LegacyConfig {
    fn default() -> Self {
        Self {
            warn_deprecated: true,
            validate_reference: true,
        }
    }
}

impl LegacyConfig {
    /// Convert without warnings.
    pub fn quiet() -> Self {
        Self {
            warn_deprecated: false,
            ..Self::default()
        }
    }
}

/// Converter from per-base legacy lists to MAVE-HGVS.
#[derive(Debug, Clone)]
pub struct LegacyConverter {
    config: LegacyConfig,
    target: Option<SequenceModel>,
    assembler: VariantAssembler,
}

impl LegacyConverter {
    pub fn new(config: LegacyConfig) -> Self {
        Self {
            config,
            target: None,
            assembler: VariantAssembler::new(),
        }
    }

    /// Create a converter that checks changed bases against `target`.
    pub fn with_target(config: LegacyConfig, target: SequenceModel) -> Self {
        Self {
            config,
            target: Some(target),
            assembler: VariantAssembler::new(),
        }
    }

    /// Convert one variant string.
    pub fn convert(&self, input: &str) -> Result<LegacyConversion, MaveError> {
        let input = input.trim();

        let Some(body) = bracketed(input) else {
            if input.contains('=') {
                return Ok(LegacyConversion::legacy(
                    input,
                    WILD_TYPE.to_string(),
                    LegacyFormat::WildTypeToken,
                    self.config.warn_deprecated,
                ));
            }
            return Ok(LegacyConversion::modern(input));
        };
        if input.contains("delins") {
            return Ok(LegacyConversion::modern(input));
        }

        let (prefix, items) = body;
        let events = items
            .split(';')
            .map(|item| match parse_nucleotide_token(&format!("{}.{}", prefix, item.trim()))? {
                NucleotideToken::Event(event) => Ok(event),
                NucleotideToken::Special(_) => Err(MaveError::invalid_token(input, "nucleotide")),
            })
            .collect::<Result<Vec<NucleotideEvent>, MaveError>>()?;

        let changed: Vec<NucleotideEvent> = events.into_iter().filter(|e| !e.is_silent()).collect();
        if changed.is_empty() {
            return Ok(LegacyConversion::legacy(
                input,
                WILD_TYPE.to_string(),
                LegacyFormat::WildTypeList,
                self.config.warn_deprecated,
            ));
        }

        if let (true, Some(target)) = (self.config.validate_reference, &self.target) {
            for event in &changed {
                event.check_reference(target)?;
            }
        }

        let converted = self.assembler.assemble_nucleotide(&changed)?;
        Ok(LegacyConversion::legacy(
            input,
            converted,
            LegacyFormat::PerBaseList,
            self.config.warn_deprecated,
        ))
    }
}

impl Default for LegacyConverter {
    fn default() -> Self {
        Self::new(LegacyConfig::default())
    }
}

/// Split `c.[a;b]` into `('c', "a;b")`.
fn bracketed(input: &str) -> Option<(char, &str)> {
    let mut chars = input.chars();
    let prefix = chars.next()?;
    let rest = input.get(prefix.len_utf8()..)?;
    let body = rest.strip_prefix(".[")?.strip_suffix(']')?;
    Some((prefix, body))
}

/// Convert one variant string with the default configuration.
pub fn convert_legacy(input: &str) -> Result<String, MaveError> {
    LegacyConverter::default().convert(input).map(|r| r.converted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TARGET: &str = "CAATTTGGTTGGTCTGCTAATATGGAA";

    fn converter() -> LegacyConverter {
        LegacyConverter::with_target(
            LegacyConfig::default(),
            SequenceModel::coding(TARGET).unwrap(),
        )
    }

    #[rstest]
    #[case("c.[4T>G;5T>G;6=]", "c.4_5delinsGG")]
    #[case("c.[7G>A;8=;9T>A]", "c.[7G>A;9T>A]")]
    #[case("c.[7=;8G>A;9T>A]", "c.8_9delinsAA")]
    #[case("c.[7G>C;8G>T;9T>C]", "c.7_9delinsCTC")]
    #[case("c.[1C>A;2A>C;3A>T;4T>C]", "c.[1_3delinsACT;4T>C]")]
    #[case("c.[1C>A;7G>C;8G>T;9T>C;10T>G]", "c.[1C>A;7_9delinsCTC;10T>G]")]
    #[case("c.[1=;2=;3A>G]", "c.3A>G")]
    fn test_per_base_lists(#[case] input: &str, #[case] expected: &str) {
        let result = converter().convert(input).unwrap();
        assert_eq!(result.converted, expected);
        assert_eq!(result.format, Some(LegacyFormat::PerBaseList));
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_all_unchanged_is_wild_type() {
        let result = converter().convert("c.[1=;2=;3=]").unwrap();
        assert_eq!(result.converted, "_wt");
        assert_eq!(result.format, Some(LegacyFormat::WildTypeList));
    }

    #[test]
    fn test_unbracketed_tokens() {
        assert_eq!(convert_legacy("c.4=").unwrap(), "_wt");
        let result = converter().convert("c.4T>G").unwrap();
        assert!(!result.is_legacy());
        assert_eq!(result.converted, "c.4T>G");
    }

    #[test]
    fn test_delins_passes_through() {
        let result = converter().convert("c.[1_2delinsAA;4T>C]").unwrap();
        assert!(!result.is_legacy());
        assert_eq!(result.converted, "c.[1_2delinsAA;4T>C]");
    }

    #[test]
    fn test_reference_mismatch() {
        assert!(matches!(
            converter().convert("c.[4G>A;5=;6=]"),
            Err(MaveError::ReferenceMismatch { .. })
        ));
        // Without a target nothing is checked.
        assert_eq!(convert_legacy("c.[4G>A;5=;6=]").unwrap(), "c.4G>A");
    }

    #[test]
    fn test_malformed_entry() {
        assert!(matches!(
            convert_legacy("c.[4T>G;x]"),
            Err(MaveError::InvalidToken { .. })
        ));
    }

    #[test]
    fn test_quiet_config() {
        let converter = LegacyConverter::new(LegacyConfig::quiet());
        let result = converter.convert("c.[4T>G;5=;6=]").unwrap();
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_outputs_pass_grammar() {
        use crate::event::EventClass;
        use crate::mave::{MaveHgvsGrammar, VariantGrammar};
        for input in [
            "c.[4T>G;5T>G;6=]",
            "c.[7G>A;8=;9T>A]",
            "c.[1C>A;7G>C;8G>T;9T>C;10T>G]",
            "c.[1=;2=;3=]",
        ] {
            let out = converter().convert(input).unwrap().converted;
            assert!(MaveHgvsGrammar.is_valid(&out, EventClass::Nucleotide), "{}", out);
        }
    }
}
