//! Bounded text rendering of tables.
//!
//! A table produces a [`TableDisplay`]: a header plus at most
//! `max_lines` rows, with the middle of a long table replaced by a single
//! skipped-rows marker. Turning that into text is the job of a
//! [`TableFormatter`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::table::{IEdgeTable, Table, TableRow};

/// Rendering configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintOptions {
    /// Maximum number of rows shown per table.
    pub max_lines: usize,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self { max_lines: 40 }
    }
}

/// One rendered line of a table body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayRow {
    /// Cell text for one row, id first.
    Row(Vec<String>),
    /// Marker standing in for this many elided rows.
    Skipped(usize),
}

/// Header and bounded body of a table, ready for layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDisplay {
    /// Column names, `id` first.
    pub headers: Vec<String>,
    /// Body rows.
    pub rows: Vec<DisplayRow>,
}

/// Indexes of the rows to show, with `None` marking the skipped block.
///
/// Within the limit every row is shown; otherwise the first `limit / 2`
/// and the last `limit - limit / 2` rows are kept.
pub fn truncate_rows(num_rows: usize, limit: Option<usize>) -> Vec<Option<usize>> {
    match limit {
        Some(limit) if num_rows > limit => {
            let head = limit / 2;
            let tail = limit - head;
            (0..head)
                .map(Some)
                .chain(std::iter::once(None))
                .chain((num_rows - tail..num_rows).map(Some))
                .collect()
        }
        _ => (0..num_rows).map(Some).collect(),
    }
}

impl<R: TableRow> Table<R> {
    /// Header and rows for display, eliding the middle beyond `limit` rows.
    pub fn text_header_and_rows(&self, limit: Option<usize>) -> TableDisplay {
        let headers = std::iter::once("id")
            .chain(R::FIELDS.iter().map(|spec| spec.name))
            .map(str::to_string)
            .collect();
        let rows = truncate_rows(self.len(), limit)
            .into_iter()
            .filter_map(|index| match index {
                None => Some(DisplayRow::Skipped(self.len() - limit.unwrap_or(0))),
                Some(index) => self.get(index).map(|row| {
                    let fields = row.to_fields();
                    let cells = R::FIELDS
                        .iter()
                        .map(|spec| fields.get(spec.name).map(ToString::to_string).unwrap_or_default());
                    DisplayRow::Row(std::iter::once(index.to_string()).chain(cells).collect())
                }),
            })
            .collect();
        TableDisplay { headers, rows }
    }

    /// Render with the given options and the plain-text formatter.
    pub fn render(&self, options: &PrintOptions) -> String {
        PlainTextFormatter.format(&self.text_header_and_rows(Some(options.max_lines)))
    }
}

impl<R: TableRow> fmt::Display for Table<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&PrintOptions::default()))
    }
}

impl fmt::Display for IEdgeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&**self, f)
    }
}

/// Lays out a [`TableDisplay`] as text.
pub trait TableFormatter {
    /// Produce the final text.
    fn format(&self, display: &TableDisplay) -> String;
}

/// Left-aligned columns separated by two spaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextFormatter;

impl TableFormatter for PlainTextFormatter {
    fn format(&self, display: &TableDisplay) -> String {
        let mut widths: Vec<usize> = display.headers.iter().map(String::len).collect();
        for row in &display.rows {
            if let DisplayRow::Row(cells) = row {
                for (width, cell) in widths.iter_mut().zip(cells) {
                    *width = (*width).max(cell.len());
                }
            }
        }

        let line = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut lines = vec![line(&display.headers)];
        for row in &display.rows {
            match row {
                DisplayRow::Row(cells) => lines.push(line(cells)),
                DisplayRow::Skipped(count) => lines.push(format!("... {count} rows skipped ...")),
            }
        }
        lines.join("\n")
    }
}
