//! CSV roster reader.
//!
//! The header row is checked when the file is loaded; data rows are kept as
//! raw records and only deserialized when the batch processor asks for them.

use std::io;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::domain::entities::{RosterRow, EMAIL_COLUMN};
use crate::shared::error::AppError;

/// A loaded roster.
#[derive(Debug, Clone)]
pub struct Roster {
    headers: StringRecord,
    records: Vec<StringRecord>,
}

impl Roster {
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, AppError> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        if !headers.iter().any(|h| h == EMAIL_COLUMN) {
            return Err(AppError::ConfigMalformed(format!(
                "roster header is missing the '{}' column",
                EMAIL_COLUMN
            )));
        }

        let records = reader.records().collect::<Result<Vec<_>, _>>()?;
        Ok(Self { headers, records })
    }

    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let file = std::fs::File::open(path)?;
        let roster = Self::from_reader(file)?;
        tracing::debug!(path = %path.display(), rows = roster.len(), "Roster loaded");
        Ok(roster)
    }

    /// Number of data rows (header excluded).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Deserialize the 1-indexed data row `number`.
    pub fn row(&self, number: usize) -> Option<Result<RosterRow, AppError>> {
        let record = self.records.get(number.checked_sub(1)?)?;
        Some(record.deserialize(Some(&self.headers)).map_err(AppError::from))
    }
}
