//! Issuer keyword tables stored as CSV.
//!
//! Expected header: `keyword,issuer,category`. The French headers
//! `mot_cle,emetteur,type_emetteur` of older tables are accepted too.
//! Row order is match order.

use std::io::{Read, Write};
use std::path::Path;

use opcvm_compliance::{ComplianceError, IssuerRule, IssuerTable};
use opcvm_core::IssuerCategory;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{FileError, FileResult};

#[derive(Debug, Deserialize, Serialize)]
struct IssuerRecord {
    #[serde(alias = "mot_cle")]
    keyword: String,
    #[serde(alias = "emetteur", alias = "issuer_id")]
    issuer: String,
    #[serde(alias = "type_emetteur")]
    category: String,
}

/// Parses an issuer table from CSV content.
pub fn read_issuer_table<R: Read>(reader: R) -> FileResult<IssuerTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rules = Vec::new();
    for (idx, result) in reader.deserialize::<IssuerRecord>().enumerate() {
        let line = idx as u64 + 2;
        let record = result.map_err(|e| FileError::issuer_csv(line, e.to_string()))?;
        let category: IssuerCategory = record
            .category
            .parse()
            .map_err(|e| FileError::Compliance(ComplianceError::from(e)))?;
        rules.push(IssuerRule::new(record.keyword, record.issuer, category));
    }

    Ok(IssuerTable::new(rules)?)
}

/// Loads an issuer table from a CSV file.
pub fn load_issuer_table(path: impl AsRef<Path>) -> FileResult<IssuerTable> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| FileError::io(path, e))?;
    let table = read_issuer_table(file)?;
    info!(path = %path.display(), rules = table.len(), "Loaded issuer table");
    Ok(table)
}

/// Writes an issuer table as CSV, in match order.
pub fn write_issuer_table<W: Write>(table: &IssuerTable, writer: W) -> FileResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for rule in table.rules() {
        writer.serialize(IssuerRecord {
            keyword: rule.keyword.clone(),
            issuer: rule.issuer_id.clone(),
            category: rule.category.label().to_string(),
        })?;
    }
    writer.flush().map_err(|e| FileError::Csv(e.into()))?;
    Ok(())
}
