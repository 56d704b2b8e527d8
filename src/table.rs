//! Minimal reader for the comma separated exports the dashboard consumes.
//!
//! Files are small, unquoted and produced by our own tooling: a header line
//! followed by one record per line. Blank lines are skipped and a trailing
//! `\r` is tolerated.

use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TableError {
    #[error("missing header line")]
    MissingHeader,
    #[error("line {line}: expected {expected} fields, found {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the named column, if present.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// Keeps only the rows whose entry in `mask` is `true`.
    pub fn retain_rows(&mut self, mask: &[bool]) {
        let mut keep = mask.iter();
        self.rows.retain(|_| keep.next().copied().unwrap_or(true));
    }

    pub fn to_csv(&self) -> String {
        let mut out = self.header.join(",");
        out.push('\n');

        for row in &self.rows {
            out.push_str(&row.join(","));
            out.push('\n');
        }

        out
    }
}

impl FromStr for Table {
    type Err = TableError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
            .filter(|(_, line)| !line.trim().is_empty());

        let header: Vec<String> = match lines.next() {
            Some((_, line)) => split(line),
            None => return Err(TableError::MissingHeader),
        };

        let mut rows = Vec::new();

        for (number, line) in lines {
            let row = split(line);

            if row.len() != header.len() {
                return Err(TableError::RaggedRow {
                    line: number,
                    expected: header.len(),
                    found: row.len(),
                });
            }

            rows.push(row);
        }

        Ok(Self { header, rows })
    }
}

fn split(line: &str) -> Vec<String> {
    line.split(',').map(|field| field.trim().to_string()).collect()
}
