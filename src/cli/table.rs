//! Tabular output for lists of JSON objects
//!
//! Servers return lists of objects whose keys vary from one object to the
//! next. [`list_to_table`] turns such a list into a fixed, sorted column set
//! and one row per object; [`render_table`] draws the result for a terminal.

use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Columns and lazily produced rows for a list of objects.
///
/// The columns are the sorted union of every object's keys, so the layout is
/// the same whatever the input order. Each row holds one value per column,
/// with an empty string where the object lacks that key.
pub fn list_to_table<'a>(
    objects: &'a [Map<String, Value>],
) -> (Vec<String>, impl Iterator<Item = Vec<Value>> + 'a) {
    let columns: Vec<String> = objects
        .iter()
        .flat_map(|obj| obj.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let row_columns = columns.clone();
    let rows = objects.iter().map(move |obj| {
        row_columns
            .iter()
            .map(|col| obj.get(col).cloned().unwrap_or_else(|| Value::String(String::new())))
            .collect()
    });

    (columns, rows)
}

/// Text shown in a table cell: strings unquoted, null empty, everything else as JSON.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Draw a bordered, left-aligned table.
pub fn render_table<I>(columns: &[String], rows: I) -> String
where
    I: IntoIterator<Item = Vec<Value>>,
{
    let cells: Vec<Vec<String>> = rows
        .into_iter()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line
    };
    let mut out = Vec::with_capacity(cells.len() + 4);
    out.push(border.clone());
    out.push(format_row(&widths, columns));
    out.push(border.clone());
    for row in &cells {
        out.push(format_row(&widths, row));
    }
    if !cells.is_empty() {
        out.push(border);
    }
    out.join("\n")
}

fn format_row(widths: &[usize], row: &[String]) -> String {
    let mut line = String::from("|");
    for (width, cell) in widths.iter().zip(row) {
        let pad = width - cell.chars().count();
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(pad + 1));
        line.push('|');
    }
    line
}
