//! Row-mapping table handed over by the external I/O layer.
//!
//! The core never reads files; spreadsheet readers produce a [`RowTable`]
//! (header row plus string cells) and receive one back from the merger.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RowTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding or truncating to the header width.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Index of a header, matched trimmed and case-insensitively.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        let wanted = header.trim();
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted))
    }

    /// Trimmed cell content; `None` when the cell is blank or out of bounds.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        let value = self.rows.get(row)?.get(column)?.trim();
        if value.is_empty() { None } else { Some(value) }
    }

    pub fn cell_by_header(&self, row: usize, header: &str) -> Option<&str> {
        self.cell(row, self.column_index(header)?)
    }
}
