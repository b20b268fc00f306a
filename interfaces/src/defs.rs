use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Key of an annotation row: the source row index, or the value of the
/// configured id column.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<usize> for RecordId {
    fn from(index: usize) -> Self {
        Self(index.to_string())
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One source row selected for annotation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub record_id: RecordId,
    pub text: String,
    pub source_index: usize,
    pub fields: BTreeMap<String, String>,
}

impl Record {
    pub fn field(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotationEntry {
    pub record_id: RecordId,
    pub text: String,
    pub label: Option<String>,
    pub annotated_at: NaiveDateTime,
}

/// What a presenter needs to draw one position of a session.
#[derive(Debug)]
pub struct RecordView<'a> {
    pub position: usize,
    pub total: usize,
    pub record: &'a Record,
    pub labels: &'a [String],
    /// Label already stored for this record, lowercased. `None` when the
    /// record has no entry or was skipped.
    pub prior_label: Option<&'a str>,
    pub awaiting_confirmation: bool,
}

impl RecordView<'_> {
    pub fn is_prior_label(&self, label: &str) -> bool {
        self.prior_label
            .is_some_and(|prior| prior.to_lowercase() == label.to_lowercase())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub total: usize,
    pub annotated: usize,
    pub skipped: usize,
    pub complete: bool,
}

// Object style note:
// A presenter only draws. It never touches the annotation table; the driver
// re-renders after every action using a fresh `RecordView`.

pub trait Presenter {
    fn render(&mut self, view: &RecordView<'_>) -> anyhow::Result<()>;
    /// A message for the annotator, e.g. a rejected command.
    fn notice(&mut self, message: &str) -> anyhow::Result<()>;
    fn finish(&mut self, summary: &SessionSummary) -> anyhow::Result<()>;
}
