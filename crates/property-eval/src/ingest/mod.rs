//! Listing sheet and neighborhood benchmark import from CSV exports.

mod normalizer;
mod parser;

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::evaluation::domain::{RawListingRecord, ReferencePriceTable};
use crate::evaluation::text::parse_number;

#[derive(Debug, thiserror::Error)]
pub enum ListingImportError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid reference price document: {0}")]
    Json(#[from] serde_json::Error),
}

fn open(path: &Path) -> Result<std::fs::File, ListingImportError> {
    std::fs::File::open(path).map_err(|source| ListingImportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub struct ListingImporter;

impl ListingImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<RawListingRecord>, ListingImportError> {
        let path = path.as_ref();
        let records = Self::from_reader(open(path)?)?;
        tracing::info!(path = %path.display(), rows = records.len(), "listing sheet imported");
        Ok(records)
    }

    /// Reads a header row plus one listing per row. Fully empty rows are skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<RawListingRecord>, ListingImportError> {
        Ok(parser::parse_listing_rows(reader)?)
    }
}

pub struct ReferencePriceImporter;

impl ReferencePriceImporter {
    /// Loads `barrio,precio_m2` rows, or a JSON map when the file ends in `.json`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ReferencePriceTable, ListingImportError> {
        let path = path.as_ref();
        let file = open(path)?;
        let is_json = path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));

        let table = if is_json {
            serde_json::from_reader(std::io::BufReader::new(file))?
        } else {
            Self::from_reader(file)?
        };
        tracing::info!(path = %path.display(), neighborhoods = table.len(), "reference prices loaded");
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<ReferencePriceTable, ListingImportError> {
        let mut table = ReferencePriceTable::new();

        for row in parser::parse_reference_rows(reader)? {
            match row
                .precio_m2
                .as_deref()
                .and_then(parse_number)
                .filter(|price| *price > 0.0)
            {
                Some(price) => table.insert(row.barrio, price),
                None => tracing::warn!(
                    neighborhood = %row.barrio,
                    value = row.precio_m2.as_deref().unwrap_or(""),
                    "skipping reference price that is not a positive number"
                ),
            }
        }

        Ok(table)
    }
}
