use crate::types::{AnnotationEntry, AnnotatorError, Record, RecordId, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeMap, HashSet};

/// A row of the source table. `index` is the row's position in the table as
/// loaded and survives filtering, slicing and sampling.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub index: usize,
    pub values: Vec<String>,
}

/// In-memory table of string cells with named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceTable {
    columns: Vec<String>,
    rows: Vec<SourceRow>,
}

impl SourceTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(AnnotatorError::Config(format!("Duplicate column name: {}", column)));
            }
        }

        let mut indexed = Vec::with_capacity(rows.len());
        for (index, values) in rows.into_iter().enumerate() {
            if values.len() != columns.len() {
                return Err(AnnotatorError::Config(format!(
                    "Row {} has {} values but the table has {} columns",
                    index,
                    values.len(),
                    columns.len()
                )));
            }
            indexed.push(SourceRow { index, values });
        }

        Ok(Self { columns, rows: indexed })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[SourceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_position(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|column| column == name)
            .ok_or_else(|| AnnotatorError::Config(format!("Column not found: {}", name)))
    }

    pub fn column(&self, name: &str) -> Result<Vec<&str>> {
        let position = self.column_position(name)?;
        Ok(self.rows.iter().map(|row| row.values[position].as_str()).collect())
    }

    /// Keep the rows whose mask entry is true. Rows beyond the mask are dropped.
    pub fn filter(&self, mask: &[bool]) -> SourceTable {
        let rows = self
            .rows
            .iter()
            .zip(mask)
            .filter(|(_, keep)| **keep)
            .map(|(row, _)| row.clone())
            .collect();

        SourceTable {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// First `n` rows in table order; fewer if the table is shorter.
    pub fn head(&self, n: usize) -> SourceTable {
        SourceTable {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// `n` distinct rows in random order.
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<SourceTable> {
        if n > self.rows.len() {
            return Err(AnnotatorError::Config(format!(
                "Cannot sample {} records without replacement from {} eligible rows",
                n,
                self.rows.len()
            )));
        }

        Ok(SourceTable {
            columns: self.columns.clone(),
            rows: self.rows.choose_multiple(rng, n).cloned().collect(),
        })
    }

    /// Build the annotation record for `row`, keyed by the id column when one
    /// is given and by the row index otherwise.
    pub fn record(&self, row: &SourceRow, text_position: usize, id_position: Option<usize>) -> Record {
        let record_id = match id_position {
            Some(position) => RecordId::new(row.values[position].clone()),
            None => RecordId::from(row.index),
        };

        let fields: BTreeMap<String, String> = self
            .columns
            .iter()
            .cloned()
            .zip(row.values.iter().cloned())
            .collect();

        Record {
            record_id,
            text: row.values[text_position].clone(),
            source_index: row.index,
            fields,
        }
    }
}

/// The session's output: one entry per annotated record, in write order.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationTable {
    id_header: String,
    text_header: String,
    entries: Vec<AnnotationEntry>,
}

impl AnnotationTable {
    pub fn new(id_header: impl Into<String>, text_header: impl Into<String>) -> Self {
        Self::from_entries(id_header, text_header, Vec::new())
    }

    pub fn from_entries(
        id_header: impl Into<String>,
        text_header: impl Into<String>,
        entries: Vec<AnnotationEntry>,
    ) -> Self {
        Self {
            id_header: id_header.into(),
            text_header: text_header.into(),
            entries,
        }
    }

    pub fn id_header(&self) -> &str {
        &self.id_header
    }

    pub fn text_header(&self) -> &str {
        &self.text_header
    }

    pub fn entries(&self) -> &[AnnotationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&AnnotationEntry> {
        self.entries.get(row)
    }

    /// First row keyed by `record_id`, with its row number.
    pub fn find(&self, record_id: &RecordId) -> Option<(usize, &AnnotationEntry)> {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, entry)| &entry.record_id == record_id)
    }

    pub fn texts(&self) -> HashSet<&str> {
        self.entries.iter().map(|entry| entry.text.as_str()).collect()
    }

    pub fn contains_text(&self, text: &str) -> bool {
        self.entries.iter().any(|entry| entry.text == text)
    }

    pub(crate) fn push(&mut self, entry: AnnotationEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn replace(&mut self, row: usize, entry: AnnotationEntry) {
        self.entries[row] = entry;
    }

    pub(crate) fn pop(&mut self) -> Option<AnnotationEntry> {
        self.entries.pop()
    }
}
