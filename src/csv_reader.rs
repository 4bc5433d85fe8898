use crate::data::Table;
use crate::error::LineplotError;
use anyhow::{Context, Result};
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

/// Field separator of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    /// Runs of whitespace (`\s+`)
    #[default]
    Whitespace,
    /// A single-byte delimiter handled by the csv reader
    Delimiter(u8),
}

impl FromStr for Separator {
    type Err = LineplotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "\\s+" | "whitespace" | " " => Ok(Separator::Whitespace),
            "\\t" | "tab" => Ok(Separator::Delimiter(b'\t')),
            _ if s.len() == 1 => Ok(Separator::Delimiter(s.as_bytes()[0])),
            _ => Err(LineplotError::invalid_option("separator", s)),
        }
    }
}

/// How to read a delimited file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    pub sep: Separator,
    /// Whether the first line holds column titles
    pub header: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            sep: Separator::Whitespace,
            header: true,
        }
    }
}

/// Read a table from a file path
pub fn read_table_from_path(path: &Path, options: ReadOptions) -> Result<Table> {
    let file = File::open(path).with_context(|| format!("Failed to open '{}'", path.display()))?;
    let table = read_table(file, options)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    debug!(
        "read {} rows x {} columns from {}",
        table.len(),
        table.width(),
        path.display()
    );
    Ok(table)
}

/// Read a table from any reader
pub fn read_table<R: Read>(reader: R, options: ReadOptions) -> Result<Table> {
    let records = match options.sep {
        Separator::Whitespace => read_whitespace_records(reader)?,
        Separator::Delimiter(d) => read_delimited_records(reader, d)?,
    };
    build_table(records, options.header)
}

fn read_whitespace_records<R: Read>(reader: R) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    for line in BufReader::new(reader).lines() {
        let line = line.context("Failed to read line")?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(line.split_whitespace().map(str::to_string).collect());
    }
    Ok(records)
}

fn read_delimited_records<R: Read>(reader: R, delimiter: u8) -> Result<Vec<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Failed to parse record {}", idx + 1))?;
        records.push(record.iter().map(str::to_string).collect());
    }
    Ok(records)
}

fn build_table(mut records: Vec<Vec<String>>, header: bool) -> Result<Table> {
    let headers = if header {
        if records.is_empty() {
            anyhow::bail!("Input is empty (expected a header line)");
        }
        records.remove(0)
    } else {
        let width = records.iter().map(Vec::len).max().unwrap_or(0);
        (1..=width).map(|i| i.to_string()).collect()
    };

    if records.is_empty() {
        anyhow::bail!("Input must contain at least one data row");
    }

    Ok(Table::new(headers, records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_from_str() {
        assert_eq!("\\s+".parse::<Separator>(), Ok(Separator::Whitespace));
        assert_eq!(",".parse::<Separator>(), Ok(Separator::Delimiter(b',')));
        assert_eq!("tab".parse::<Separator>(), Ok(Separator::Delimiter(b'\t')));
        assert!(";;".parse::<Separator>().is_err());
    }

    #[test]
    fn test_read_whitespace_with_header() {
        let input = "x   y  z\n1 2 3\n\n4\t5 6\n";
        let table = read_table(input.as_bytes(), ReadOptions::default()).unwrap();
        assert_eq!(table.headers, vec!["x", "y", "z"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1], vec!["4", "5", "6"]);
    }

    #[test]
    fn test_read_csv_with_header() {
        let input = "time, temp\n1, 20.5\n2, 21.0\n";
        let options = ReadOptions {
            sep: Separator::Delimiter(b','),
            header: true,
        };
        let table = read_table(input.as_bytes(), options).unwrap();
        assert_eq!(table.headers, vec!["time", "temp"]);
        assert_eq!(table.rows[0], vec!["1", "20.5"]);
    }

    #[test]
    fn test_read_without_header_numbers_columns() {
        let input = "1 2\n3 4 5\n";
        let options = ReadOptions {
            sep: Separator::Whitespace,
            header: false,
        };
        let table = read_table(input.as_bytes(), options).unwrap();
        assert_eq!(table.headers, vec!["1", "2", "3"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_read_header_only_fails() {
        let result = read_table("x y\n".as_bytes(), ReadOptions::default());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("at least one data row"));
    }

    #[test]
    fn test_read_empty_fails() {
        assert!(read_table("".as_bytes(), ReadOptions::default()).is_err());
    }
}
