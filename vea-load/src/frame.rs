//! In-memory copy of the results CSV, typed per column.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use vea_core::{date_format, Column, ColumnKind};

use crate::error::LoadError;

/// One CSV value. Empty cells are `None` and load as NULL; the id is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(Option<String>),
    Integer(Option<i32>),
    Date(Option<NaiveDate>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Line in the source file, for error messages.
    pub line: u64,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Default)]
pub struct ScoreFrame {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl ScoreFrame {
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path.as_ref())?;
        Self::from_reader(rdr)
    }

    pub fn from_reader<R: std::io::Read>(mut rdr: csv::Reader<R>) -> Result<Self, LoadError> {
        let columns = resolve_columns(rdr.headers()?)?;

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let cells = columns
                .iter()
                .zip(record.iter())
                .map(|(column, raw)| read_cell(*column, raw, line))
                .collect::<Result<Vec<_>, _>>()?;

            rows.push(Row { line, cells });
        }

        Ok(Self { columns, rows })
    }

    /// Reparse the test date column from `DD-MON-YYYY` into calendar dates.
    /// A CSV without that column is left as is.
    pub fn normalize_dates(&mut self) -> Result<(), LoadError> {
        let Some(idx) = self.columns.iter().position(|c| *c == Column::TestDate) else {
            return Ok(());
        };

        for row in &mut self.rows {
            let cell = &mut row.cells[idx];
            if let Cell::Text(raw) = cell {
                let date = match raw.as_deref() {
                    Some(s) => Some(date_format::parse(s).map_err(|_| LoadError::InvalidDate {
                        line: row.line,
                        value: s.to_string(),
                    })?),
                    None => None,
                };
                *cell = Cell::Date(date);
            }
        }
        Ok(())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn resolve_columns(headers: &csv::StringRecord) -> Result<Vec<Column>, LoadError> {
    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(headers.len());

    for header in headers {
        let column =
            Column::from_header(header).ok_or_else(|| LoadError::UnknownColumn(header.to_string()))?;
        if !seen.insert(column) {
            return Err(LoadError::DuplicateColumn(header.to_string()));
        }
        columns.push(column);
    }

    if !columns.contains(&Column::IcvaId) {
        return Err(LoadError::MissingIdColumn);
    }
    Ok(columns)
}

// Dates stay text until normalize_dates runs.
fn read_cell(column: Column, raw: &str, line: u64) -> Result<Cell, LoadError> {
    let value = (!raw.is_empty()).then_some(raw);
    if column == Column::IcvaId && value.is_none() {
        return Err(LoadError::MissingId { line });
    }

    match column.kind() {
        ColumnKind::Text | ColumnKind::Date => Ok(Cell::Text(value.map(str::to_string))),
        ColumnKind::Integer => {
            let parsed = value
                .map(|v| {
                    v.parse::<i32>().map_err(|_| LoadError::InvalidInteger {
                        line,
                        column: column.sql_name(),
                        value: v.to_string(),
                    })
                })
                .transpose()?;
            Ok(Cell::Integer(parsed))
        }
    }
}
