//! In-memory employee records
//!
//! Records are appended by successful submissions and never edited or
//! removed. They live as long as the process does.

pub mod view;

pub use view::{
    cell_text, derive_fields, display_value, export_csv, field_label, humanize, search,
    write_export, EXPORT_FILE_NAME,
};

use crate::form::Submission;
use chrono::{Local, Utc};
use tracing::info;

/// Format of the human-readable registration time
const TIMESTAMP_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

/// One completed submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Creation time in milliseconds since the epoch; unique within a book
    pub id: i64,
    /// Local time of registration, for display
    pub timestamp: String,
    /// Field id -> raw submitted value, in schema order at submission time
    pub values: Vec<(String, String)>,
}

impl Record {
    pub fn new(id: i64, timestamp: impl Into<String>, values: Vec<(String, String)>) -> Self {
        Record {
            id,
            timestamp: timestamp.into(),
            values,
        }
    }

    pub fn get(&self, field_id: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(id, _)| id == field_id)
            .map(|(_, value)| value.as_str())
    }
}

/// Append-only list of records
#[derive(Debug, Clone, Default)]
pub struct RecordBook {
    records: Vec<Record>,
}

impl RecordBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp a submission and store it
    pub fn push(&mut self, values: Submission) -> &Record {
        let mut id = Utc::now().timestamp_millis();
        if let Some(last) = self.records.last() {
            // two submissions in the same millisecond still need distinct ids
            id = id.max(last.id + 1);
        }
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();

        self.records.push(Record::new(id, timestamp, values));
        info!(record = id, total = self.records.len(), "registered employee");
        &self.records[self.records.len() - 1]
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_strictly_increase() {
        let mut book = RecordBook::new();
        for _ in 0..5 {
            book.push(vec![("nombres".into(), "Ana".into())]);
        }
        let ids: Vec<i64> = book.records().iter().map(|r| r.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_record_get() {
        let record = Record::new(1, "t", vec![("nombres".into(), "Ana".into())]);
        assert_eq!(record.get("nombres"), Some("Ana"));
        assert_eq!(record.get("apellidos"), None);
    }
}
