//! Error types for ferro-mave
//!
//! Every failure carries an [`ErrorCode`] so that row-level diagnostics in
//! the invalid-row output can be grouped and filtered by category.

use std::fmt;
use thiserror::Error;

/// Error codes for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // Token parse errors (E1xxx)
    /// Token does not match the substitution grammar
    InvalidToken = 1001,
    /// Row mixes nucleotide, protein, and paired sub-tokens
    InconsistentRowShape = 1002,
    /// Invalid amino acid code
    InvalidAminoAcid = 1003,

    // Sequence model errors (E2xxx)
    /// Sequence contains characters outside ACGT
    InvalidSequence = 2001,
    /// Coding sequence length is not a multiple of three
    IncompleteCodon = 2002,
    /// Protein operation requested on a non-coding model
    NotCoding = 2003,

    // Validation errors (E3xxx)
    /// Position out of bounds
    PositionOutOfBounds = 3001,
    /// Reference base or residue mismatch
    ReferenceMismatch = 3002,
    /// Position below 1 where only positive positions are allowed
    InvalidPosition = 3003,

    // Normalization and assembly errors (E4xxx)
    /// Codon group spans more than one codon
    MultipleCodons = 4001,
    /// Change marked silent alters the residue
    NonSynonymous = 4002,
    /// Events with different coordinate prefixes combined
    MixedPrefix = 4003,
    /// Special marker combined with other events
    SpecialNotAlone = 4004,
    /// Assembled string fails the grammar
    AssemblyInvariant = 4005,

    // Offset errors (E5xxx)
    /// Offset is not usable for this dataset
    InvalidOffset = 5001,
    /// No candidate offset reached the hit-rate threshold
    UnresolvableOffset = 5002,

    // Dataset errors (E6xxx)
    /// Required column missing from the input table
    MissingColumn = 6001,
    /// Dataset failed compliance checks
    ComplianceViolation = 6002,

    // IO errors (E9xxx)
    /// File IO error
    IoError = 9001,
    /// Delimited-text parsing error
    CsvError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the error code as a string (e.g., "E1001")
    pub fn as_str(&self) -> String {
        format!("E{:04}", *self as u16)
    }

    /// Get a brief description of this error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::InvalidToken => "not a valid substitution token",
            ErrorCode::InconsistentRowShape => "inconsistent variant row shape",
            ErrorCode::InvalidAminoAcid => "invalid amino acid",
            ErrorCode::InvalidSequence => "invalid nucleotide sequence",
            ErrorCode::IncompleteCodon => "sequence length is not a multiple of three",
            ErrorCode::NotCoding => "sequence is not coding",
            ErrorCode::PositionOutOfBounds => "position out of bounds",
            ErrorCode::ReferenceMismatch => "reference mismatch",
            ErrorCode::InvalidPosition => "invalid position",
            ErrorCode::MultipleCodons => "events span more than one codon",
            ErrorCode::NonSynonymous => "change is not synonymous",
            ErrorCode::MixedPrefix => "mixed coordinate prefixes",
            ErrorCode::SpecialNotAlone => "special variant combined with other events",
            ErrorCode::AssemblyInvariant => "assembled variant fails grammar",
            ErrorCode::InvalidOffset => "invalid offset",
            ErrorCode::UnresolvableOffset => "no acceptable offset",
            ErrorCode::MissingColumn => "missing column",
            ErrorCode::ComplianceViolation => "dataset compliance violation",
            ErrorCode::IoError => "file I/O error",
            ErrorCode::CsvError => "delimited text error",
            ErrorCode::ConfigError => "configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for ferro-mave operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaveError {
    /// A raw token could not be parsed
    #[error("'{token}' is not a valid {kind} substitution token{}", hint.as_ref().map(|h| format!(" ({})", h)).unwrap_or_default())]
    InvalidToken {
        token: String,
        kind: &'static str,
        hint: Option<String>,
    },

    /// A row's sub-tokens do not share one shape
    #[error("Inconsistent variant row '{row}': {msg}")]
    InconsistentRowShape { row: String, msg: String },

    #[error("Invalid sequence: {msg}")]
    InvalidSequence { msg: String },

    #[error("Sequence of length {length} is not a multiple of three")]
    IncompleteCodon { length: usize },

    #[error("Protein variant '{variant}' requires a coding sequence")]
    NotCoding { variant: String },

    #[error("Position {position} of '{variant}' is outside the reference (length {length})")]
    PositionOutOfBounds {
        variant: String,
        position: i64,
        length: usize,
    },

    /// Reference sequence mismatch
    #[error("Reference mismatch at {location}: expected {expected}, found {found}")]
    ReferenceMismatch {
        location: String,
        expected: String,
        found: String,
    },

    #[error("Invalid position {position}: {msg}")]
    InvalidPosition { position: i64, msg: String },

    #[error("Events {events} span more than one codon")]
    MultipleCodons { events: String },

    #[error("Codon change {wt_codon} ({wt_aa}) to {mut_codon} ({mut_aa}) from {events} is not synonymous")]
    NonSynonymous {
        events: String,
        wt_codon: String,
        wt_aa: String,
        mut_codon: String,
        mut_aa: String,
    },

    #[error("Cannot combine events with different prefixes: {events}")]
    MixedPrefix { events: String },

    #[error("Special variant '{special}' cannot be combined with other events")]
    SpecialNotAlone { special: String },

    /// An assembled string failed the grammar check
    #[error("Assembled variant '{variant}' from {events} is not valid MAVE-HGVS")]
    AssemblyInvariant { variant: String, events: String },

    #[error("Invalid offset {offset}: {msg}")]
    InvalidOffset { offset: i64, msg: String },

    /// No candidate offset was acceptable
    #[error("No acceptable offset near declared offset {declared} (best hit rate {best_hit_rate:.3})")]
    UnresolvableOffset { declared: i64, best_hit_rate: f64 },

    #[error("Missing column '{column}'")]
    MissingColumn { column: String },

    #[error("Dataset is not compliant: {}", reasons.join("; "))]
    ComplianceViolation { reasons: Vec<String> },

    /// IO error (for file operations)
    #[error("IO error: {msg}")]
    Io { msg: String },

    #[error("CSV error: {msg}")]
    Csv { msg: String },

    #[error("Config error: {msg}")]
    Config { msg: String },
}

impl MaveError {
    /// Create a token parse error without a hint
    pub fn invalid_token(token: impl Into<String>, kind: &'static str) -> Self {
        MaveError::InvalidToken {
            token: token.into(),
            kind,
            hint: None,
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            MaveError::InvalidToken {
                kind: "protein",
                hint: Some(_),
                ..
            } => ErrorCode::InvalidAminoAcid,
            MaveError::InvalidToken { .. } => ErrorCode::InvalidToken,
            MaveError::InconsistentRowShape { .. } => ErrorCode::InconsistentRowShape,
            MaveError::InvalidSequence { .. } => ErrorCode::InvalidSequence,
            MaveError::IncompleteCodon { .. } => ErrorCode::IncompleteCodon,
            MaveError::NotCoding { .. } => ErrorCode::NotCoding,
            MaveError::PositionOutOfBounds { .. } => ErrorCode::PositionOutOfBounds,
            MaveError::ReferenceMismatch { .. } => ErrorCode::ReferenceMismatch,
            MaveError::InvalidPosition { .. } => ErrorCode::InvalidPosition,
            MaveError::MultipleCodons { .. } => ErrorCode::MultipleCodons,
            MaveError::NonSynonymous { .. } => ErrorCode::NonSynonymous,
            MaveError::MixedPrefix { .. } => ErrorCode::MixedPrefix,
            MaveError::SpecialNotAlone { .. } => ErrorCode::SpecialNotAlone,
            MaveError::AssemblyInvariant { .. } => ErrorCode::AssemblyInvariant,
            MaveError::InvalidOffset { .. } => ErrorCode::InvalidOffset,
            MaveError::UnresolvableOffset { .. } => ErrorCode::UnresolvableOffset,
            MaveError::MissingColumn { .. } => ErrorCode::MissingColumn,
            MaveError::ComplianceViolation { .. } => ErrorCode::ComplianceViolation,
            MaveError::Io { .. } => ErrorCode::IoError,
            MaveError::Csv { .. } => ErrorCode::CsvError,
            MaveError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// Message prefixed with the error code, as written to the invalid-row output
    pub fn detailed_message(&self) -> String {
        format!("[{}] {}", self.code(), self)
    }
}

/// Helper to suggest similar amino acids
pub fn suggest_amino_acid(found: &str) -> Option<&'static str> {
    let suggestions = [
        ("ala", "Ala"),
        ("arg", "Arg"),
        ("asn", "Asn"),
        ("asp", "Asp"),
        ("cys", "Cys"),
        ("gln", "Gln"),
        ("glu", "Glu"),
        ("gly", "Gly"),
        ("his", "His"),
        ("ile", "Ile"),
        ("leu", "Leu"),
        ("lys", "Lys"),
        ("met", "Met"),
        ("phe", "Phe"),
        ("pro", "Pro"),
        ("ser", "Ser"),
        ("thr", "Thr"),
        ("trp", "Trp"),
        ("tyr", "Tyr"),
        ("val", "Val"),
        ("ter", "Ter"),
        ("stop", "Ter"),
        ("xaa", "Xaa"),
        ("unk", "Xaa"),
    ];

    let found_lower = found.to_lowercase();
    if found_lower.is_empty() {
        return None;
    }
    suggestions
        .iter()
        .find(|(pattern, _)| found_lower.starts_with(pattern))
        .map(|(_, suggestion)| *suggestion)
}

impl From<std::io::Error> for MaveError {
    fn from(err: std::io::Error) -> Self {
        MaveError::Io {
            msg: err.to_string(),
        }
    }
}

impl From<csv::Error> for MaveError {
    fn from(err: csv::Error) -> Self {
        MaveError::Csv {
            msg: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::InvalidToken.as_str(), "E1001");
        assert_eq!(ErrorCode::InvalidSequence.as_str(), "E2001");
        assert_eq!(ErrorCode::PositionOutOfBounds.as_str(), "E3001");
        assert_eq!(ErrorCode::MultipleCodons.as_str(), "E4001");
        assert_eq!(ErrorCode::UnresolvableOffset.as_str(), "E5002");
        assert_eq!(ErrorCode::MissingColumn.as_str(), "E6001");
        assert_eq!(ErrorCode::IoError.as_str(), "E9001");
    }

    #[test]
    fn test_invalid_token_display() {
        let err = MaveError::invalid_token("c.1A>", "nucleotide");
        assert_eq!(
            err.to_string(),
            "'c.1A>' is not a valid nucleotide substitution token"
        );
        assert_eq!(err.code(), ErrorCode::InvalidToken);
    }

    #[test]
    fn test_invalid_token_with_hint() {
        let err = MaveError::InvalidToken {
            token: "p.Lue5Gly".to_string(),
            kind: "protein",
            hint: Some("did you mean Leu?".to_string()),
        };
        assert!(err.to_string().ends_with("(did you mean Leu?)"));
        assert_eq!(err.code(), ErrorCode::InvalidAminoAcid);
    }

    #[test]
    fn test_detailed_message_has_code() {
        let err = MaveError::ReferenceMismatch {
            location: "c.4".to_string(),
            expected: "T".to_string(),
            found: "A".to_string(),
        };
        assert_eq!(
            err.detailed_message(),
            "[E3002] Reference mismatch at c.4: expected T, found A"
        );
    }

    #[test]
    fn test_compliance_reasons_joined() {
        let err = MaveError::ComplianceViolation {
            reasons: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "Dataset is not compliant: a; b");
    }

    #[test]
    fn test_suggest_amino_acid() {
        assert_eq!(suggest_amino_acid("LEUCINE"), Some("Leu"));
        assert_eq!(suggest_amino_acid("stop"), Some("Ter"));
        assert_eq!(suggest_amino_acid("Lue"), None);
        assert_eq!(suggest_amino_acid(""), None);
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: MaveError = io.into();
        assert_eq!(err.code(), ErrorCode::IoError);
    }
}
