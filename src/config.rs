//! Configuration for table conversion.
//!
//! [`ConvertConfig`] is the value threaded through conversion. It can be
//! built in code or loaded from a `.ferro-mave.toml` file:
//!
//! # Example Configuration
//!
//! ```toml
//! [convert]
//! offset = 3
//! one-based = true
//! coding = true
//! hgvs-column = "hgvs"
//! score-column = "score"
//! table = "scores"
//! element = "variants"
//! auto-offset = false
//! drop-non-numeric = true
//! ```
//!
//! # Config File Locations
//!
//! Configuration is searched in this order (first found wins):
//! 1. `.ferro-mave.toml` in current directory
//! 2. `~/.config/ferro/mave.toml`
//!
//! CLI flags take precedence over config file settings.

use crate::error::MaveError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Which table of a score set is being converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    #[default]
    Scores,
    Counts,
}

impl TableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Scores => "scores",
            TableKind::Counts => "counts",
        }
    }
}

impl FromStr for TableKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scores" | "score" => Ok(TableKind::Scores),
            "counts" | "count" => Ok(TableKind::Counts),
            other => Err(ConfigError::Parse(format!("unknown table kind '{}'", other))),
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element table the rows come from.
///
/// Synonymous element tables hold only codon-synonymous variants, so a
/// special marker there means "some synonymous change" rather than a
/// wild-type or synonymous row at both levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    #[default]
    Variants,
    Synonymous,
}

impl FromStr for ElementKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "variants" | "variant" => Ok(ElementKind::Variants),
            "synonymous" | "syn" => Ok(ElementKind::Synonymous),
            other => Err(ConfigError::Parse(format!("unknown element kind '{}'", other))),
        }
    }
}

/// Settings for converting one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Subtracted from every nucleotide position.
    pub offset: i64,
    /// Positions in the source are 1-based.
    pub one_based: bool,
    /// The target sequence is protein coding.
    pub coding: bool,
    /// Column holding the raw variant identifier.
    pub hgvs_column: String,
    /// Column required in scores tables.
    pub score_column: String,
    pub table_kind: TableKind,
    pub element: ElementKind,
    /// Search near `offset` when it does not fit the target.
    pub auto_offset: bool,
    /// Drop non-numeric data columns instead of rejecting the table.
    pub drop_non_numeric: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            offset: 0,
            one_based: true,
            coding: true,
            hgvs_column: "hgvs".to_string(),
            score_column: "score".to_string(),
            table_kind: TableKind::Scores,
            element: ElementKind::Variants,
            auto_offset: false,
            drop_non_numeric: true,
        }
    }
}

impl ConvertConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_one_based(mut self, one_based: bool) -> Self {
        self.one_based = one_based;
        self
    }

    pub fn with_coding(mut self, coding: bool) -> Self {
        self.coding = coding;
        self
    }

    pub fn with_hgvs_column(mut self, column: impl Into<String>) -> Self {
        self.hgvs_column = column.into();
        self
    }

    pub fn with_score_column(mut self, column: impl Into<String>) -> Self {
        self.score_column = column.into();
        self
    }

    pub fn with_table_kind(mut self, kind: TableKind) -> Self {
        self.table_kind = kind;
        self
    }

    pub fn with_element(mut self, element: ElementKind) -> Self {
        self.element = element;
        self
    }

    pub fn with_auto_offset(mut self, auto_offset: bool) -> Self {
        self.auto_offset = auto_offset;
        self
    }

    pub fn with_drop_non_numeric(mut self, drop: bool) -> Self {
        self.drop_non_numeric = drop;
        self
    }

    /// Offsets on coding targets must keep codon boundaries.
    pub fn validate(&self) -> Result<(), MaveError> {
        if self.coding && self.offset % 3 != 0 {
            return Err(MaveError::InvalidOffset {
                offset: self.offset,
                msg: "offset on a coding target must be a multiple of 3".to_string(),
            });
        }
        Ok(())
    }
}

/// Parsed configuration from a .ferro-mave.toml file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaveConfig {
    /// Convert section of the config file.
    pub convert: ConvertSection,
}

/// Convert section of the config file. Unset keys keep the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertSection {
    pub offset: Option<i64>,
    pub one_based: Option<bool>,
    pub coding: Option<bool>,
    pub hgvs_column: Option<String>,
    pub score_column: Option<String>,
    pub table_kind: Option<TableKind>,
    pub element: Option<ElementKind>,
    pub auto_offset: Option<bool>,
    pub drop_non_numeric: Option<bool>,
}

impl MaveConfig {
    /// Load configuration from the default locations.
    ///
    /// Searches for config in:
    /// 1. `.ferro-mave.toml` in current directory
    /// 2. `~/.config/ferro/mave.toml`
    pub fn load() -> Option<Self> {
        let cwd_config = PathBuf::from(".ferro-mave.toml");
        if cwd_config.exists() {
            match Self::load_from_path(&cwd_config) {
                Ok(config) => return Some(config),
                Err(e) => log::warn!("Ignoring {}: {}", cwd_config.display(), e),
            }
        }

        if let Some(home) = dirs_home() {
            let home_config = home.join(".config").join("ferro").join("mave.toml");
            if home_config.exists() {
                match Self::load_from_path(&home_config) {
                    Ok(config) => return Some(config),
                    Err(e) => log::warn!("Ignoring {}: {}", home_config.display(), e),
                }
            }
        }

        None
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML content.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config = MaveConfig::default();
        let mut in_convert = false;

        for (number, line) in content.lines().enumerate() {
            let line = strip_comment(line).trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                in_convert = &line[1..line.len() - 1] == "convert";
                continue;
            }

            if !in_convert {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::Parse(format!(
                    "line {}: expected 'key = value'",
                    number + 1
                )));
            };
            let key = key.trim();
            let value = unquote(value.trim());
            let section = &mut config.convert;

            match key {
                "offset" => section.offset = Some(parse_value(key, value)?),
                "one-based" => section.one_based = Some(parse_value(key, value)?),
                "coding" => section.coding = Some(parse_value(key, value)?),
                "hgvs-column" => section.hgvs_column = Some(value.to_string()),
                "score-column" => section.score_column = Some(value.to_string()),
                "table" => section.table_kind = Some(value.parse()?),
                "element" => section.element = Some(value.parse()?),
                "auto-offset" => section.auto_offset = Some(parse_value(key, value)?),
                "drop-non-numeric" => section.drop_non_numeric = Some(parse_value(key, value)?),
                _ => log::debug!("Unknown config key '{}'", key),
            }
        }

        Ok(config)
    }

    /// Apply the file settings over `base`.
    pub fn apply_to(&self, base: ConvertConfig) -> ConvertConfig {
        let s = &self.convert;
        ConvertConfig {
            offset: s.offset.unwrap_or(base.offset),
            one_based: s.one_based.unwrap_or(base.one_based),
            coding: s.coding.unwrap_or(base.coding),
            hgvs_column: s.hgvs_column.clone().unwrap_or(base.hgvs_column),
            score_column: s.score_column.clone().unwrap_or(base.score_column),
            table_kind: s.table_kind.unwrap_or(base.table_kind),
            element: s.element.unwrap_or(base.element),
            auto_offset: s.auto_offset.unwrap_or(base.auto_offset),
            drop_non_numeric: s.drop_non_numeric.unwrap_or(base.drop_non_numeric),
        }
    }

    /// The file settings over the defaults.
    pub fn to_convert_config(&self) -> ConvertConfig {
        self.apply_to(ConvertConfig::default())
    }
}

/// Configuration loading error.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(String),
    /// Parse error in config file.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "Config IO error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Config parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for MaveError {
    fn from(err: ConfigError) -> Self {
        MaveError::Config {
            msg: err.to_string(),
        }
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Parse(format!("invalid value '{}' for '{}'", value, key)))
}

fn unquote(value: &str) -> &str {
    value.trim_matches('"').trim_matches('\'')
}

/// Drop a trailing `# comment` outside of quotes.
fn strip_comment(line: &str) -> &str {
    let mut in_quotes = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' | '\'' => in_quotes = !in_quotes,
            '#' if !in_quotes => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Get the user's home directory.
fn dirs_home() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
