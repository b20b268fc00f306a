use crate::table::{AnnotationTable, SourceTable};
use crate::types::{AnnotationEntry, AnnotatorError, Record, RecordId, Result, SessionConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use tracing::{debug, info};

/// Records selected for one session plus the annotation table they feed.
///
/// The working subset is fixed at construction. The annotation table starts
/// as a copy of the prior annotations (or empty) and is only changed through
/// the recorder.
#[derive(Debug, Clone)]
pub struct SessionState {
    config: SessionConfig,
    text_column: String,
    records: Vec<Record>,
    annotations: AnnotationTable,
}

impl SessionState {
    pub fn new(
        source: &SourceTable,
        text_column: &str,
        prior: Option<AnnotationTable>,
        config: SessionConfig,
    ) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(source, text_column, prior, config, &mut rng)
    }

    pub fn with_rng<R: Rng + ?Sized>(
        source: &SourceTable,
        text_column: &str,
        prior: Option<AnnotationTable>,
        config: SessionConfig,
        rng: &mut R,
    ) -> Result<Self> {
        validate_labels(&config.labels)?;

        let text_position = source.column_position(text_column)?;
        let id_position = config
            .id_column
            .as_deref()
            .map(|column| source.column_position(column))
            .transpose()?;

        let candidates = match prior.as_ref().filter(|table| !table.is_empty()) {
            None => source.clone(),
            Some(table) => {
                let already_annotated = table.texts();
                let mask: Vec<bool> = source
                    .rows()
                    .iter()
                    .map(|row| {
                        already_annotated.contains(row.values[text_position].as_str())
                            == config.edit_annotations
                    })
                    .collect();
                source.filter(&mask)
            }
        };
        debug!(
            "{} of {} source rows eligible (edit mode: {})",
            candidates.len(),
            source.len(),
            config.edit_annotations
        );

        let selected = if config.random_order() {
            candidates.sample(config.num_records, rng)?
        } else {
            candidates.head(config.num_records)
        };

        let records: Vec<Record> = selected
            .rows()
            .iter()
            .map(|row| selected.record(row, text_position, id_position))
            .collect();

        let annotations = prior.unwrap_or_else(|| AnnotationTable::new(config.id_header(), text_column));

        info!(
            "Session ready: {} records to annotate, {} prior annotations",
            records.len(),
            annotations.len()
        );

        Ok(Self {
            config,
            text_column: text_column.to_string(),
            records,
            annotations,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn text_column(&self) -> &str {
        &self.text_column
    }

    pub fn labels(&self) -> &[String] {
        &self.config.labels
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record_at(&self, position: usize) -> Option<&Record> {
        self.records.get(position)
    }

    pub fn record_id_at(&self, position: usize) -> Option<&RecordId> {
        self.record_at(position).map(|record| &record.record_id)
    }

    /// The annotation row already stored for the record at `position`, with
    /// its row number in the table.
    pub fn prior_entry_for(&self, position: usize) -> Option<(usize, &AnnotationEntry)> {
        let record_id = self.record_id_at(position)?;
        self.annotations.find(record_id)
    }

    pub fn annotations(&self) -> &AnnotationTable {
        &self.annotations
    }

    pub(crate) fn annotations_mut(&mut self) -> &mut AnnotationTable {
        &mut self.annotations
    }

    pub fn into_annotations(self) -> AnnotationTable {
        self.annotations
    }
}

fn validate_labels(labels: &[String]) -> Result<()> {
    if labels.is_empty() {
        return Err(AnnotatorError::Config("At least one label is required".to_string()));
    }

    let mut seen = HashSet::new();
    for label in labels {
        if label.trim().is_empty() {
            return Err(AnnotatorError::Config("Labels must not be blank".to_string()));
        }
        if !seen.insert(label.to_lowercase()) {
            return Err(AnnotatorError::Config(format!("Duplicate label: {}", label)));
        }
    }
    Ok(())
}
