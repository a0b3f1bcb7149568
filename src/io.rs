//! Reading and writing delimited tables.
//!
//! Input files are tab-separated when the name ends in `.tsv` or `.txt`
//! (before an optional `.gz`), otherwise comma-separated. Output is always
//! comma-separated.

use crate::convert::{MaveTable, RawTable};
use crate::error::MaveError;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

/// Field delimiter for `path`, judged from its extension.
pub fn delimiter_for(path: &Path) -> u8 {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    if name.ends_with(".tsv") || name.ends_with(".txt") {
        b'\t'
    } else {
        b','
    }
}

/// Read a delimited file, decompressing `.gz` input.
pub fn read_table(path: &Path) -> Result<RawTable, MaveError> {
    let file = File::open(path).map_err(|e| MaveError::Io {
        msg: format!("Failed to open {}: {}", path.display(), e),
    })?;
    let reader: Box<dyn Read> = if path.extension().is_some_and(|e| e == "gz") {
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    read_delimited(reader, delimiter_for(path))
}

/// Read delimited text with a header row.
pub fn read_delimited<R: Read>(reader: R, delimiter: u8) -> Result<RawTable, MaveError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .comment(Some(b'#'))
        .from_reader(reader);

    let columns: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(String::from).collect());
    }
    log::debug!("Read {} rows with columns {:?}", rows.len(), columns);
    RawTable::new(columns, rows)
}

/// Write a raw table as CSV.
pub fn write_raw<W: Write>(table: &RawTable, writer: W) -> Result<(), MaveError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(table.columns())?;
    for row in table.rows() {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a converted table as CSV. Null cells are written empty.
pub fn write_table<W: Write>(table: &MaveTable, writer: W) -> Result<(), MaveError> {
    write_raw(&table.to_raw(), writer)
}

/// Write a raw table to `path`, creating parent directories.
pub fn write_raw_to(table: &RawTable, path: &Path) -> Result<(), MaveError> {
    write_raw(table, create(path)?)
}

/// Write a converted table to `path`, creating parent directories.
pub fn write_table_to(table: &MaveTable, path: &Path) -> Result<(), MaveError> {
    write_table(table, create(path)?)
}

fn create(path: &Path) -> Result<File, MaveError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| MaveError::Io {
            msg: format!("Failed to create directory {}: {}", parent.display(), e),
        })?;
    }
    File::create(path).map_err(|e| MaveError::Io {
        msg: format!("Failed to create {}: {}", path.display(), e),
    })
}
