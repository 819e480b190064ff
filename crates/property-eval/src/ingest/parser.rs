use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::normalizer::header_key;
use crate::evaluation::domain::RawListingRecord;

pub(crate) fn parse_listing_rows<R: Read>(reader: R) -> Result<Vec<RawListingRecord>, csv::Error> {
    let mut csv_reader = csv_reader(reader);
    let headers: Vec<String> = csv_reader.headers()?.iter().map(header_key).collect();
    let mut records = Vec::new();

    for row in csv_reader.records() {
        let row = row?;
        let mut record = RawListingRecord::new();

        for (key, value) in headers.iter().zip(row.iter()) {
            // Duplicate columns keep the first non-empty cell.
            if key.is_empty() || !record.get(key).is_empty() {
                continue;
            }
            record.insert(key.as_str(), value);
        }

        if !record.is_blank() {
            records.push(record);
        }
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReferenceRow {
    pub(crate) barrio: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) precio_m2: Option<String>,
}

pub(crate) fn parse_reference_rows<R: Read>(reader: R) -> Result<Vec<ReferenceRow>, csv::Error> {
    let mut csv_reader = csv_reader(reader);
    let headers: csv::StringRecord = csv_reader.headers()?.iter().map(header_key).collect();
    csv_reader.set_headers(headers);

    let mut rows = Vec::new();
    for row in csv_reader.deserialize::<ReferenceRow>() {
        let row = row?;
        if !row.barrio.is_empty() {
            rows.push(row);
        }
    }

    Ok(rows)
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
