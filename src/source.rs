use derive_more::{Deref, From, Into};
use fs_err as fs;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

pub type Row = Vec<String>;

/// Ordered rows of text cells, as handed over by whatever fetched the sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, From, Into)]
pub struct Table(Vec<Row>);

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self(rows)
    }

    pub fn from_strs(rows: &[&[&str]]) -> Self {
        Self(
            rows.iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    /// Single-column table, one value per row.
    pub fn from_column(values: &[&str]) -> Self {
        Self(values.iter().map(|v| vec![v.to_string()]).collect())
    }
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read table export: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed table export: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Fetch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub trait RowSource: Send + Sync {
    fn fetch(&self) -> Result<Table, SourceError>;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Export {
    Values { values: Vec<Vec<Value>> },
    Rows(Vec<Vec<Value>>),
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Reads a spreadsheet export from disk. Accepts either the `{"values": [...]}`
/// document a sheets API returns, or a bare array of rows.
#[derive(Debug, Clone)]
pub struct TableFile {
    path: PathBuf,
}

impl TableFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn parse(text: &str) -> Result<Table, SourceError> {
        let rows = match serde_json::from_str::<Export>(text)? {
            Export::Values { values } => values,
            Export::Rows(rows) => rows,
        };

        Ok(Table(
            rows.into_iter()
                .map(|row| row.into_iter().map(cell_text).collect())
                .collect(),
        ))
    }
}

impl RowSource for TableFile {
    fn fetch(&self) -> Result<Table, SourceError> {
        let text = fs::read_to_string(&self.path)?;
        let table = Self::parse(&text)?;
        log::debug!("Read {} rows from {}", table.len(), self.path.display());
        Ok(table)
    }
}
