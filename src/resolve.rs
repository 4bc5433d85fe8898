use crate::data::{Column, Table};
use crate::error::{LineplotError, Result};
use crate::parser::selector::{parse_column_ref, parse_selector, ColumnRef, Selector};
use indexmap::IndexMap;
use log::debug;

/// Columns selected by an x and y selector pair
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumns {
    pub x: Column,
    /// y columns keyed by title, in selection order
    pub y: IndexMap<String, Column>,
}

impl ResolvedColumns {
    pub fn x_title(&self) -> &str {
        &self.x.title
    }

    pub fn y_titles(&self) -> Vec<&str> {
        self.y.keys().map(String::as_str).collect()
    }
}

/// Resolve a single column reference against a table
pub fn resolve_column(column: &ColumnRef, table: &Table) -> Result<Column> {
    match column {
        ColumnRef::Index => Ok(table.index()),
        ColumnRef::Position(v) => v
            .checked_sub(1)
            .and_then(|idx| table.column_at(idx))
            .ok_or(LineplotError::ColumnOutOfRange {
                position: *v,
                width: table.width(),
            }),
        ColumnRef::Name(name) => table
            .position(name)
            .and_then(|idx| table.column_at(idx))
            .ok_or_else(|| LineplotError::UnknownColumn(name.clone())),
    }
}

/// `title`, or `title.1`, `title.2`, ... when already taken
fn unique_title(columns: &IndexMap<String, Column>, title: &str) -> String {
    if !columns.contains_key(title) {
        return title.to_string();
    }
    (1..)
        .map(|n| format!("{}.{}", title, n))
        .find(|candidate| !columns.contains_key(candidate))
        .unwrap_or_else(|| title.to_string())
}

/// Resolve a y selector into an ordered title → column mapping.
///
/// Ranges are 1-based and half-open: `2:4` selects the 2nd and 3rd columns, an open
/// start begins at the first column and an open end runs through the last. A range keeps
/// every column, suffixing repeated titles (`v`, `v.1`). In a list, a repeated title
/// keeps its first position and takes the last column given for it.
pub fn resolve_selector(selector: &Selector, table: &Table) -> Result<IndexMap<String, Column>> {
    let mut columns = IndexMap::new();
    match selector {
        Selector::Range { start, end } => {
            let width = table.width();
            let lo = start.map(|s| s - 1).unwrap_or(0).min(width);
            let hi = end.map(|e| e - 1).unwrap_or(width).min(width);
            for idx in lo..hi {
                if let Some(mut col) = table.column_at(idx) {
                    col.title = unique_title(&columns, &col.title);
                    columns.insert(col.title.clone(), col);
                }
            }
        }
        Selector::List(refs) => {
            for column in refs {
                let col = resolve_column(column, table)?;
                columns.insert(col.title.clone(), col);
            }
        }
    }
    Ok(columns)
}

/// Resolve the x and y selector strings against a table
pub fn resolve(x: &str, y: &str, table: &Table) -> Result<ResolvedColumns> {
    let x_col = resolve_column(&parse_column_ref(x)?, table)?;
    let y_cols = resolve_selector(&parse_selector(y)?, table)?;
    debug!(
        "resolved x '{}' -> {}, y '{}' -> {:?}",
        x,
        x_col.title,
        y,
        y_cols.keys().collect::<Vec<_>>()
    );
    Ok(ResolvedColumns { x: x_col, y: y_cols })
}
