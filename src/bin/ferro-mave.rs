// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-mave CLI
//!
//! Command-line interface for converting variant tables into MAVE-HGVS.

use clap::{Parser, Subcommand};
use ferro_mave::check::ComplianceReport;
use ferro_mave::convert::{DatasetResult, MaveTable, HGVS_PRO};
use ferro_mave::legacy::{LegacyConfig, LegacyConverter};
use ferro_mave::{
    classify_protein_variant, codon_change_to_mave, io, ComplianceValidator, ConvertConfig,
    DatasetConverter, ElementKind, MaveConfig, MaveError, SequenceModel, TableKind,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "ferro-mave")]
#[command(author, version, about = "MAVE-HGVS converter for assay variant tables")]
#[command(
    long_about = "Convert assay variant tables into MAVE-HGVS and check them for MaveDB compliance.

Examples:
  ferro-mave convert -s scores.tsv -t ATGAAATTT... -o out/
  ferro-mave convert -s scores.tsv -c counts.tsv --target-file target.fa --offset 3 -o out/
  ferro-mave legacy 'c.[1C>A;2=;3=]'
  ferro-mave validate out/mavedb_scores.csv
  ferro-mave codon ATG CTG 1"
)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a scores table (and optionally its counts table)
    Convert {
        /// Scores table (CSV or TSV, optionally gzipped)
        #[arg(short, long)]
        scores: PathBuf,

        /// Counts table defining the same variants
        #[arg(short, long)]
        counts: Option<PathBuf>,

        /// Target nucleotide sequence
        #[arg(short, long, conflicts_with = "target_file")]
        target: Option<String>,

        /// File holding the target sequence (plain or FASTA)
        #[arg(long)]
        target_file: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Offset subtracted from every source position
        #[arg(long, allow_hyphen_values = true)]
        offset: Option<i64>,

        /// Search nearby offsets when the declared one does not fit
        #[arg(long)]
        auto_offset: bool,

        /// Source positions are 0-based
        #[arg(long)]
        zero_based: bool,

        /// Target is not a coding sequence
        #[arg(long)]
        non_coding: bool,

        /// Column holding the source variants
        #[arg(long)]
        hgvs_column: Option<String>,

        /// Required score column of the scores table
        #[arg(long)]
        score_column: Option<String>,

        /// Table comes from a synonymous element
        #[arg(long)]
        synonymous: bool,

        /// Keep non-numeric data columns (the table is then rejected)
        #[arg(long)]
        keep_non_numeric: bool,
    },

    /// Convert legacy per-base notation to MAVE-HGVS
    Legacy {
        /// Variant strings such as 'c.[1C>A;2=;3=]'
        #[arg(required = true)]
        variants: Vec<String>,

        /// Check changed bases against this target sequence
        #[arg(short, long)]
        target: Option<String>,

        /// Suppress deprecation warnings
        #[arg(short, long)]
        quiet: bool,
    },

    /// Check an already converted table for compliance
    Validate {
        /// Converted table
        input: PathBuf,

        /// Matching table that must define the same variants
        #[arg(long)]
        paired: Option<PathBuf>,

        /// Table kind: scores or counts
        #[arg(long, default_value = "scores")]
        table: TableKind,

        #[arg(long, default_value = "score")]
        score_column: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a codon change as MAVE-HGVS
    Codon {
        /// Reference codon
        target_codon: String,

        /// Variant codon
        variant_codon: String,

        /// 1-based residue position of the codon
        aa_position: i64,

        /// Render adjacent changed bases as one delins
        #[arg(long)]
        prefer_delins: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&cli.log_level) {
        eprintln!("Error: {}", e);
        return ExitCode::from(2);
    }

    let outcome = match cli.command {
        Commands::Convert {
            scores,
            counts,
            target,
            target_file,
            output,
            offset,
            auto_offset,
            zero_based,
            non_coding,
            hgvs_column,
            score_column,
            synonymous,
            keep_non_numeric,
        } => {
            let mut config = MaveConfig::load()
                .map(|c| c.to_convert_config())
                .unwrap_or_default();
            if let Some(offset) = offset {
                config.offset = offset;
            }
            if let Some(column) = hgvs_column {
                config.hgvs_column = column;
            }
            if let Some(column) = score_column {
                config.score_column = column;
            }
            config.auto_offset |= auto_offset;
            config.one_based &= !zero_based;
            config.coding &= !non_coding;
            config.drop_non_numeric &= !keep_non_numeric;
            if synonymous {
                config.element = ElementKind::Synonymous;
            }
            run_convert(
                &scores,
                counts.as_deref(),
                target.as_deref(),
                target_file.as_deref(),
                &output,
                config,
            )
        }
        Commands::Legacy {
            variants,
            target,
            quiet,
        } => run_legacy(&variants, target.as_deref(), quiet),
        Commands::Validate {
            input,
            paired,
            table,
            score_column,
            json,
        } => run_validate(&input, paired.as_deref(), table, &score_column, json),
        Commands::Codon {
            target_codon,
            variant_codon,
            aa_position,
            prefer_delins,
        } => codon_change_to_mave(&target_codon, &variant_codon, aa_position, prefer_delins).map(
            |variant| {
                println!("{}", variant);
                true
            },
        ),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{}", e.detailed_message());
            eprintln!("Error: {}", e.detailed_message());
            ExitCode::from(2)
        }
    }
}

fn init_tracing(level: &str) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| format!("Invalid log level '{}': {}", level, e))?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    info!("Tracing initialized with level: {}", level);
    Ok(())
}

fn load_target(
    target: Option<&str>,
    target_file: Option<&Path>,
    coding: bool,
) -> Result<SequenceModel, MaveError> {
    let sequence = match (target, target_file) {
        (Some(sequence), _) => sequence.to_string(),
        (None, Some(path)) => {
            let content = std::fs::read_to_string(path).map_err(|e| MaveError::Io {
                msg: format!("Failed to read {}: {}", path.display(), e),
            })?;
            content
                .lines()
                .filter(|l| !l.starts_with('>'))
                .map(str::trim)
                .collect()
        }
        (None, None) => {
            return Err(MaveError::Config {
                msg: "one of --target or --target-file is required".to_string(),
            })
        }
    };
    if coding {
        SequenceModel::coding(&sequence)
    } else {
        SequenceModel::non_coding(&sequence)
    }
}

/// File name without directories and table extensions.
fn table_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string())
}

fn run_convert(
    scores: &Path,
    counts: Option<&Path>,
    target: Option<&str>,
    target_file: Option<&Path>,
    output: &Path,
    config: ConvertConfig,
) -> Result<bool, MaveError> {
    let model = load_target(target, target_file, config.coding)?;
    let converter = DatasetConverter::new(&model, config)?;

    let scores_table = io::read_table(scores)?;
    let results = match counts {
        Some(counts_path) => {
            let counts_table = io::read_table(counts_path)?;
            let (s, c) = converter.convert_pair(&scores_table, &counts_table)?;
            vec![(scores, s), (counts_path, c)]
        }
        None => vec![(scores, converter.convert(&scores_table)?)],
    };

    let mut accepted = true;
    for (path, result) in &results {
        let stem = table_stem(path);
        let valid_path = output.join(format!("mavedb_{}.csv", stem));
        let invalid_path = output.join(format!("mavedb_{}_invalid_rows.csv", stem));
        io::write_table_to(&result.table, &valid_path)?;
        io::write_raw_to(&result.invalid, &invalid_path)?;
        info!(
            "Wrote {} and {}",
            valid_path.display(),
            invalid_path.display()
        );
        print_summary(path, result);
        accepted &= result.is_accepted();
    }
    Ok(accepted)
}

fn print_summary(path: &Path, result: &DatasetResult) {
    println!("{}", path.display());
    println!("  state:        {}", result.state);
    println!("  offset:       {}", result.offset);
    println!(
        "  rows:         {} valid, {} invalid ({:.2}s)",
        result.valid_count(),
        result.invalid_count(),
        result.duration.as_secs_f64()
    );
    let classes = protein_classes(&result.table);
    if !classes.is_empty() {
        let counts: Vec<String> = classes
            .iter()
            .map(|(class, n)| format!("{} {}", n, class))
            .collect();
        println!("  protein:      {}", counts.join(", "));
    }
    print_report(&result.report);
}

fn protein_classes(table: &MaveTable) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for variant in table.identifiers(HGVS_PRO) {
        *counts
            .entry(classify_protein_variant(variant).as_str())
            .or_insert(0) += 1;
    }
    counts
}

fn print_report(report: &ComplianceReport) {
    for warning in &report.warnings {
        println!("  warning:      {}", warning);
    }
    for reason in report.reasons() {
        println!("  violation:    {}", reason);
    }
}

fn run_legacy(variants: &[String], target: Option<&str>, quiet: bool) -> Result<bool, MaveError> {
    let config = if quiet {
        LegacyConfig::quiet()
    } else {
        LegacyConfig::default()
    };
    let converter = match target {
        Some(sequence) => LegacyConverter::with_target(config, SequenceModel::non_coding(sequence)?),
        None => LegacyConverter::new(config),
    };

    let mut all_ok = true;
    for variant in variants {
        match converter.convert(variant) {
            Ok(conversion) => {
                for warning in &conversion.warnings {
                    eprintln!("warning: {}: {}", variant, warning);
                }
                println!("{}\t{}", variant, conversion.converted);
            }
            Err(e) => {
                eprintln!("{}\t{}", variant, e.detailed_message());
                all_ok = false;
            }
        }
    }
    Ok(all_ok)
}

fn run_validate(
    input: &Path,
    paired: Option<&Path>,
    table_kind: TableKind,
    score_column: &str,
    json: bool,
) -> Result<bool, MaveError> {
    let table = MaveTable::from_raw(&io::read_table(input)?);
    let mut report = ComplianceValidator::new(table_kind)
        .with_score_column(score_column)
        .validate(&table);
    if let Some(paired) = paired {
        let other = MaveTable::from_raw(&io::read_table(paired)?);
        report.variant_set_mismatches = ComplianceValidator::cross_check(&table, &other);
    }

    if json {
        let rendered = serde_json::to_string_pretty(&report).map_err(|e| MaveError::Io {
            msg: format!("Failed to render report: {}", e),
        })?;
        println!("{}", rendered);
        return Ok(report.is_compliant());
    }

    println!("{}", input.display());
    println!(
        "  state:        {}",
        if report.is_compliant() { "accepted" } else { "rejected" }
    );
    print_report(&report);
    Ok(report.is_compliant())
}
