use anyhow::{Context, Result};

/// Title given to the implicit row index
pub const INDEX_TITLE: &str = "index";

/// A parsed delimited file: column titles plus rows of raw cells
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// One column pulled out of a table
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub title: String,
    pub cells: Vec<String>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 0-based position of the column with this exact title
    pub fn position(&self, title: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == title)
    }

    /// Column at a 0-based position. Short rows yield empty cells.
    pub fn column_at(&self, idx: usize) -> Option<Column> {
        let title = self.headers.get(idx)?;
        let cells = self
            .rows
            .iter()
            .map(|row| row.get(idx).cloned().unwrap_or_default())
            .collect();
        Some(Column {
            title: title.clone(),
            cells,
        })
    }

    /// The implicit row index `0..len`
    pub fn index(&self) -> Column {
        Column {
            title: INDEX_TITLE.to_string(),
            cells: (0..self.len()).map(|i| i.to_string()).collect(),
        }
    }
}

impl Column {
    /// Parse every cell as a number. Empty cells become NaN.
    pub fn numeric(&self) -> Result<Vec<f64>> {
        self.cells
            .iter()
            .enumerate()
            .map(|(row_idx, cell)| {
                let cell = cell.trim();
                if cell.is_empty() {
                    return Ok(f64::NAN);
                }
                cell.parse::<f64>().with_context(|| {
                    format!(
                        "Failed to parse '{}' as number in column '{}' at row {}",
                        cell,
                        self.title,
                        row_idx + 1
                    )
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_table() -> Table {
        Table::new(
            vec!["time".to_string(), "temp".to_string()],
            vec![
                vec!["1".to_string(), "10.5".to_string()],
                vec!["2".to_string()],
            ],
        )
    }

    #[test]
    fn test_column_at_pads_short_rows() {
        let col = make_table().column_at(1).unwrap();
        assert_eq!(col.title, "temp");
        assert_eq!(col.cells, vec!["10.5".to_string(), String::new()]);
    }

    #[test]
    fn test_column_at_out_of_range() {
        assert!(make_table().column_at(2).is_none());
    }

    #[test]
    fn test_index_column() {
        let idx = make_table().index();
        assert_eq!(idx.title, INDEX_TITLE);
        assert_eq!(idx.numeric().unwrap(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_numeric_empty_cell_is_nan() {
        let values = make_table().column_at(1).unwrap().numeric().unwrap();
        assert_eq!(values[0], 10.5);
        assert!(values[1].is_nan());
    }

    #[test]
    fn test_numeric_reports_row() {
        let col = Column {
            title: "temp".to_string(),
            cells: vec!["1".to_string(), "warm".to_string()],
        };
        let err = col.numeric().unwrap_err();
        assert!(err.to_string().contains("'warm'"));
        assert!(err.to_string().contains("at row 2"));
    }
}
