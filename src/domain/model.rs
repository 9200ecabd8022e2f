use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One flattened entity from one page. Fields not present in `data` are
/// treated as null when written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, Option<String>>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: &str, value: Option<String>) {
        self.data.insert(field.to_string(), value);
    }

    pub fn with(mut self, field: &str, value: Option<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(|v| v.as_deref())
    }

    /// Values in `schema` order; missing or null fields become `""`.
    pub fn to_row(&self, schema: &Schema) -> Vec<String> {
        schema
            .columns()
            .iter()
            .map(|col| self.get(col).unwrap_or_default().to_string())
            .collect()
    }
}

/// Ordered column set of one scraper variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Records found on one page plus the entries that had to be dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub records: Vec<Record>,
    pub dropped: usize,
}

impl Extraction {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Column layout of a stat table, read from its header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStructure {
    /// Header cell count; data rows with fewer cells are skipped.
    pub min_columns: usize,
    pub has_abilities: bool,
    /// Legacy layout with a single "Special" stat instead of S.Att/S.Def.
    pub special_stat: bool,
}

/// What happened to one page of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Saved { rows: usize, dropped: usize },
    NoData { dropped: usize },
    FetchFailed { error: String },
    SinkFailed { error: String },
}

impl PageOutcome {
    pub fn rows(&self) -> usize {
        match self {
            PageOutcome::Saved { rows, .. } => *rows,
            _ => 0,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            PageOutcome::FetchFailed { .. } | PageOutcome::SinkFailed { .. }
        )
    }
}
