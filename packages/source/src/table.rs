//! Header lookup and typed field access over `csv` records.

use std::collections::BTreeMap;
use std::str::FromStr;

use crime_analysis_source_models::DatasetKind;
use csv::StringRecord;

use crate::SourceError;

/// Column-name to index lookup built from a CSV header row.
pub(crate) struct Header {
    dataset: DatasetKind,
    index: BTreeMap<String, usize>,
}

impl Header {
    pub(crate) fn new(dataset: DatasetKind, headers: &StringRecord) -> Self {
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim().trim_start_matches('\u{feff}').to_string(), i))
            .collect();
        Self { dataset, index }
    }

    /// Index of a column the dataset cannot be loaded without.
    pub(crate) fn require(&self, column: &str) -> Result<Column, SourceError> {
        self.optional(column)
            .ok_or_else(|| SourceError::MissingColumn {
                dataset: self.dataset,
                column: column.to_string(),
            })
    }

    /// Index of a column that may be absent.
    pub(crate) fn optional(&self, column: &str) -> Option<Column> {
        self.index.get(column).map(|&index| Column {
            name: column.to_string(),
            index,
        })
    }

    /// Resolves an optional schema entry; a configured but absent column is
    /// an error.
    pub(crate) fn configured(&self, column: Option<&String>) -> Result<Option<Column>, SourceError> {
        column.map(|c| self.require(c)).transpose()
    }
}

/// A resolved column.
#[derive(Clone)]
pub(crate) struct Column {
    pub(crate) name: String,
    index: usize,
}

/// One data row plus enough context to report coercion failures.
pub(crate) struct Row<'a> {
    pub(crate) dataset: DatasetKind,
    pub(crate) line: u64,
    record: &'a StringRecord,
}

impl<'a> Row<'a> {
    pub(crate) fn new(dataset: DatasetKind, record: &'a StringRecord) -> Self {
        let line = record.position().map_or(0, csv::Position::line);
        Self {
            dataset,
            line,
            record,
        }
    }

    /// Trimmed value, `None` when empty.
    pub(crate) fn text(&self, column: &Column) -> Option<&'a str> {
        self.record
            .get(column.index)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Trimmed value that must be present.
    pub(crate) fn required_text(&self, column: &Column) -> Result<&'a str, SourceError> {
        self.text(column)
            .ok_or_else(|| self.invalid(column, "", "value is required"))
    }

    /// Parses an optional value, stripping thousands separators and a
    /// leading `$`.
    pub(crate) fn number<T: FromStr>(&self, column: &Column) -> Result<Option<T>, SourceError> {
        let Some(raw) = self.text(column) else {
            return Ok(None);
        };
        let cleaned: String = raw
            .trim_start_matches('$')
            .chars()
            .filter(|c| *c != ',')
            .collect();
        cleaned
            .parse::<T>()
            .map(Some)
            .map_err(|_| self.invalid(column, raw, "expected a number"))
    }

    pub(crate) fn invalid(&self, column: &Column, value: &str, reason: &str) -> SourceError {
        SourceError::InvalidField {
            dataset: self.dataset,
            line: self.line,
            column: column.name.clone(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}
