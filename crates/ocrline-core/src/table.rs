//! Table grid reconstruction from analyzed tables.

use serde::Serialize;
use tracing::warn;

use crate::models::analyze::RawTable;

/// A table rebuilt as a row-major grid of cell texts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableGrid {
    /// Number of rows.
    pub num_rows: usize,
    /// Number of columns.
    pub num_cols: usize,
    /// Cell texts, `rows[row][col]`; missing cells are empty.
    pub rows: Vec<Vec<String>>,
}

impl TableGrid {
    /// Build a grid from a decoded table.
    ///
    /// Cells outside the declared row/column counts are dropped with a
    /// warning. A later cell at the same position replaces an earlier one.
    pub fn from_raw(table: &RawTable) -> Self {
        let mut rows = vec![vec![String::new(); table.column_count]; table.row_count];

        for cell in &table.cells {
            match rows
                .get_mut(cell.row_index)
                .and_then(|row| row.get_mut(cell.column_index))
            {
                Some(slot) => *slot = cell.content.clone(),
                None => warn!(
                    "Table cell ({}, {}) outside {}x{} grid",
                    cell.row_index, cell.column_index, table.row_count, table.column_count
                ),
            }
        }

        Self {
            num_rows: table.row_count,
            num_cols: table.column_count,
            rows,
        }
    }

    /// Rows as tab-separated lines.
    pub fn to_lines(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.join("\t")).collect()
    }
}

/// Render tables as text blocks, each headed by `===== Table N =====`.
pub fn render_tables(tables: &[TableGrid]) -> String {
    let mut output = String::new();

    for (i, table) in tables.iter().enumerate() {
        output.push_str(&format!("===== Table {} =====\n", i + 1));
        for line in table.to_lines() {
            output.push_str(&line);
            output.push('\n');
        }
    }

    output
}
