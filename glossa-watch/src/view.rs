//! Results table model
//!
//! Turns a snapshot into columns and display rows without knowing the
//! record schema up front. Columns come from the first record's keys, in
//! order, minus the reserved metadata keys.

use glossa_core::domain::result::{ResultRecord, is_metadata_key};
use serde_json::Value;

use crate::scheduler::PollStatus;

#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    count: u32,
    target_count: u32,
    loading: bool,
}

impl ResultTable {
    pub fn from_records(records: &[ResultRecord], count: u32, target_count: u32, loading: bool) -> Self {
        let columns = columns_for(records);
        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| display_value(record.get(column)))
                    .collect()
            })
            .collect();

        Self {
            columns,
            rows,
            count,
            target_count,
            loading,
        }
    }

    /// Table for the engine's current status
    ///
    /// Returns `None` when there is nothing to show: no items and no fetch
    /// in progress.
    pub fn from_status(status: &PollStatus) -> Option<Self> {
        let target_count = status.key.as_ref().map_or(0, |key| key.target_count);
        let (records, count) = match &status.snapshot {
            Some(snapshot) => (snapshot.items.as_slice(), snapshot.count),
            None => (&[][..], 0),
        };

        if records.is_empty() && !status.loading {
            return None;
        }
        Some(Self::from_records(records, count, target_count, status.loading))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// More results are on their way
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Progress badge, e.g. `4/10`
    pub fn progress_label(&self) -> String {
        format!("{}/{}", self.count, self.target_count)
    }

    /// One row as tab-separated text
    pub fn row_tsv(&self, index: usize) -> Option<String> {
        self.rows.get(index).map(|row| row.join("\t"))
    }

    /// Header plus every row as tab-separated text
    pub fn to_tsv(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        lines.push(self.columns.join("\t"));
        lines.extend(self.rows.iter().map(|row| row.join("\t")));
        lines.join("\n")
    }
}

/// Column names: first record's keys in order, metadata excluded
pub fn columns_for(records: &[ResultRecord]) -> Vec<String> {
    records
        .first()
        .map(|first| {
            first
                .keys()
                .filter(|key| !is_metadata_key(key))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// Render one cell; strings verbatim, missing and null as empty
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
