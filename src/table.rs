//! Tabular survey data and header handling
//!
//! This module loads spreadsheet-derived survey exports into an in-memory
//! [`SurveyTable`] and repairs the two-level column headers such exports
//! carry. Rows are respondents, columns are survey variables.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading or querying survey tables
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to read input file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("Survey export must contain two header rows")]
    MissingHeaderRows,

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Column '{0}' contains no numeric values")]
    EmptyColumn(String),
}

type Result<T> = core::result::Result<T, TableError>;

/// A two-level column header as produced by spreadsheet exports
///
/// The top level carries the question or section label; the second level
/// carries the sub-question, and is empty for single-level columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Top-level label (question or section name)
    pub label: String,
    /// Second-level label, empty when the column has no sub-question
    pub sub: String,
}

impl Header {
    /// Display name of the column: `label` alone, or `label / sub`
    pub fn name(&self) -> String {
        if self.sub.is_empty() {
            self.label.clone()
        } else {
            format!("{} / {}", self.label, self.sub)
        }
    }
}

/// A single parsed survey response cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    /// A numeric response (Likert rating, age, ...)
    Number(f64),
    /// A free-text or categorical response
    Text(String),
    /// Missing response
    Empty,
}

impl Cell {
    fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(value) => Cell::Number(value),
            Err(_) => Cell::Text(trimmed.to_string()),
        }
    }

    /// Numeric value of the cell, if it holds one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Textual form of the cell: numbers are rendered, `Empty` is `None`
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Number(value) => Some(format!("{}", value)),
            Cell::Text(text) => Some(text.clone()),
            Cell::Empty => None,
        }
    }
}

/// Numeric responses of one respondent group for one variable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupScores {
    /// Group label (e.g. "EE" or "CG")
    pub group: String,
    /// Numeric responses of the group's respondents
    pub values: Vec<f64>,
}

/// In-memory survey table: rows are respondents, columns are variables
#[derive(Debug, Clone)]
pub struct SurveyTable {
    headers: Vec<Header>,
    rows: Vec<Vec<Cell>>,
}

impl SurveyTable {
    /// Builds a table directly from headers and rows
    ///
    /// Intended for tests and programmatic table construction; CSV loads
    /// go through [`SurveyTable::from_csv_path`].
    pub fn new(headers: Vec<Header>, rows: Vec<Vec<Cell>>) -> Self {
        Self { headers, rows }
    }

    /// Loads a survey table from a CSV export on disk
    ///
    /// # Arguments
    /// * `path` - Path to the CSV file with two header rows
    ///
    /// # Returns
    /// * `Ok(SurveyTable)` - Successfully parsed table
    /// * `Err(TableError)` - If reading or parsing failed
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Loads a survey table from any reader producing CSV data
    ///
    /// The export format has two header rows: the first carries top-level
    /// labels (left blank under merged cells and forward-filled here), the
    /// second carries sub-labels taken verbatim, including the
    /// `Unnamed: ...` placeholders spreadsheet tooling writes for columns
    /// without a sub-question. Use [`SurveyTable::repair_headers`] to
    /// clear those placeholders.
    ///
    /// Ragged data rows are rejected by the CSV parser.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(reader);

        let mut records = csv_reader.records();

        let top_row = match records.next() {
            Some(record) => record?,
            None => return Err(TableError::MissingHeaderRows),
        };
        let sub_row = match records.next() {
            Some(record) => record?,
            None => return Err(TableError::MissingHeaderRows),
        };

        // Forward-fill top-level labels across merged-cell gaps
        let mut headers = Vec::with_capacity(top_row.len());
        let mut last_label = String::new();
        for (index, top) in top_row.iter().enumerate() {
            let top = top.trim();
            if !top.is_empty() {
                last_label = top.to_string();
            }
            let sub = sub_row.get(index).unwrap_or("").trim().to_string();
            headers.push(Header {
                label: last_label.clone(),
                sub,
            });
        }

        let mut rows = Vec::new();
        for record in records {
            let record = record?;
            rows.push(record.iter().map(Cell::parse).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Column headers in table order
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Number of respondent rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Repairs spreadsheet-derived headers in place
    ///
    /// Second-level labels containing `"Unnamed"` are placeholders the
    /// export writes for columns without a sub-question; they are replaced
    /// with the empty string. Applying this twice yields the same result
    /// as applying it once.
    pub fn repair_headers(&mut self) {
        for header in &mut self.headers {
            if header.sub.contains("Unnamed") {
                header.sub = String::new();
            }
        }
    }

    /// Index of the first column whose top-level label matches `name`
    fn find_column(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|header| header.label == name)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))
    }

    /// Numeric values of a column, skipping empty and textual cells
    ///
    /// # Arguments
    /// * `name` - Top-level label of the column
    ///
    /// # Returns
    /// * `Ok(Vec<f64>)` - Values in respondent order
    /// * `Err(TableError)` - If the column is missing or holds no numbers
    pub fn column_values(&self, name: &str) -> Result<Vec<f64>> {
        let index = self.find_column(name)?;
        let values: Vec<f64> = self
            .rows
            .iter()
            .filter_map(|row| row.get(index).and_then(Cell::as_number))
            .collect();

        if values.is_empty() {
            return Err(TableError::EmptyColumn(name.to_string()));
        }
        Ok(values)
    }

    /// Textual values of a column, skipping empty cells
    pub fn column_text(&self, name: &str) -> Result<Vec<String>> {
        let index = self.find_column(name)?;
        Ok(self
            .rows
            .iter()
            .filter_map(|row| row.get(index).and_then(Cell::as_text))
            .collect())
    }

    /// Splits a numeric column into per-group score lists
    ///
    /// Respondents missing either the group label or the numeric value are
    /// skipped. Groups appear in first-seen (respondent) order.
    ///
    /// # Arguments
    /// * `group_column` - Column holding the group label per respondent
    /// * `value_column` - Numeric column to partition
    pub fn split_by_group(&self, group_column: &str, value_column: &str) -> Result<Vec<GroupScores>> {
        let group_index = self.find_column(group_column)?;
        let value_index = self.find_column(value_column)?;

        let mut groups: Vec<GroupScores> = Vec::new();
        for row in &self.rows {
            let label = match row.get(group_index).and_then(Cell::as_text) {
                Some(label) => label,
                None => continue,
            };
            let value = match row.get(value_index).and_then(Cell::as_number) {
                Some(value) => value,
                None => continue,
            };

            match groups.iter_mut().find(|scores| scores.group == label) {
                Some(scores) => scores.values.push(value),
                None => groups.push(GroupScores {
                    group: label,
                    values: vec![value],
                }),
            }
        }

        if groups.is_empty() {
            return Err(TableError::EmptyColumn(value_column.to_string()));
        }
        Ok(groups)
    }

    /// Distinct values of a categorical column with their counts
    ///
    /// Categories appear in first-seen order; used to feed pie charts.
    pub fn category_counts(&self, name: &str) -> Result<Vec<(String, u64)>> {
        let index = self.find_column(name)?;
        let mut counts: Vec<(String, u64)> = Vec::new();
        for row in &self.rows {
            let label = match row.get(index).and_then(Cell::as_text) {
                Some(label) => label,
                None => continue,
            };
            match counts.iter_mut().find(|(existing, _)| *existing == label) {
                Some((_, count)) => *count += 1,
                None => counts.push((label, 1)),
            }
        }

        if counts.is_empty() {
            return Err(TableError::EmptyColumn(name.to_string()));
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
Group,Age,Attitude,
Unnamed: 0_level_1,Unnamed: 1_level_1,Q1,Q2
EE,21,5,6
CG,23,3,2
EE,22,7,5
CG,25,4,3
";

    fn sample_table() -> SurveyTable {
        SurveyTable::from_reader(SAMPLE_CSV.as_bytes()).unwrap()
    }

    #[test]
    fn test_from_reader_forward_fills_top_labels() {
        let table = sample_table();
        assert_eq!(table.column_count(), 4);
        assert_eq!(table.headers()[2].label, "Attitude");
        // Blank top-level cell inherits the label to its left
        assert_eq!(table.headers()[3].label, "Attitude");
        assert_eq!(table.headers()[3].sub, "Q2");
        assert_eq!(table.row_count(), 4);
    }

    #[test]
    fn test_repair_headers_clears_unnamed_placeholders() {
        let mut table = sample_table();
        assert_eq!(table.headers()[0].sub, "Unnamed: 0_level_1");

        table.repair_headers();
        assert_eq!(table.headers()[0].sub, "");
        assert_eq!(table.headers()[1].sub, "");
        // Real sub-labels are untouched
        assert_eq!(table.headers()[2].sub, "Q1");
    }

    #[test]
    fn test_repair_headers_is_idempotent() {
        let mut once = sample_table();
        once.repair_headers();
        let mut twice = once.clone();
        twice.repair_headers();
        assert_eq!(once.headers(), twice.headers());
    }

    #[test]
    fn test_column_values_skips_non_numeric_cells() {
        let csv = "\
Group,Score
,
EE,5
CG,n/a
EE,3
";
        let table = SurveyTable::from_reader(csv.as_bytes()).unwrap();
        let values = table.column_values("Score").unwrap();
        assert_eq!(values, vec![5.0, 3.0]);
    }

    #[test]
    fn test_column_not_found() {
        let table = sample_table();
        let result = table.column_values("Missing");
        assert!(matches!(result, Err(TableError::ColumnNotFound(_))));
    }

    #[test]
    fn test_split_by_group_preserves_first_seen_order() {
        let table = sample_table();
        let groups = table.split_by_group("Group", "Age").unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].group, "EE");
        assert_eq!(groups[0].values, vec![21.0, 22.0]);
        assert_eq!(groups[1].group, "CG");
        assert_eq!(groups[1].values, vec![23.0, 25.0]);
    }

    #[test]
    fn test_category_counts() {
        let table = sample_table();
        let counts = table.category_counts("Group").unwrap();
        assert_eq!(counts, vec![("EE".to_string(), 2), ("CG".to_string(), 2)]);
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let csv = "\
Group,Score
,
EE,5,extra
";
        let result = SurveyTable::from_reader(csv.as_bytes());
        assert!(matches!(result, Err(TableError::CsvParse(_))));
    }

    #[test]
    fn test_missing_header_rows() {
        let result = SurveyTable::from_reader("only-one-row\n".as_bytes());
        assert!(matches!(result, Err(TableError::MissingHeaderRows)));
    }

    #[test]
    fn test_header_name() {
        let plain = Header {
            label: "Age".to_string(),
            sub: String::new(),
        };
        let nested = Header {
            label: "Attitude".to_string(),
            sub: "Q1".to_string(),
        };
        assert_eq!(plain.name(), "Age");
        assert_eq!(nested.name(), "Attitude / Q1");
    }
}
