// Re-export commonly used test types and utilities
#![allow(dead_code)]

pub use text_annotator::types::*;
pub use text_annotator::{AnnotationTable, SourceTable};

use chrono::NaiveDate;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// `n` rows with columns `id`, `title`, `text`: ids `r0..`, texts `text 0..`.
pub fn sample_source(n: usize) -> SourceTable {
    let rows = (0..n)
        .map(|i| vec![format!("r{}", i), format!("title {}", i), format!("text {}", i)])
        .collect();
    SourceTable::new(vec!["id".to_string(), "title".to_string(), "text".to_string()], rows)
        .expect("valid source table")
}

pub fn fixed_time() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|date| date.and_hms_opt(9, 30, 0))
        .expect("valid timestamp")
}

pub fn entry(record_id: &str, text: &str, label: Option<&str>) -> AnnotationEntry {
    AnnotationEntry {
        record_id: RecordId::new(record_id),
        text: text.to_string(),
        label: label.map(str::to_string),
        annotated_at: fixed_time(),
    }
}

/// Prior annotations keyed by row index for the given source rows.
pub fn prior_for_rows(rows: &[(usize, Option<&str>)]) -> AnnotationTable {
    let entries = rows
        .iter()
        .map(|(i, label)| entry(&i.to_string(), &format!("text {}", i), *label))
        .collect();
    AnnotationTable::from_entries(INDEX_ID_HEADER, "text", entries)
}

pub fn config(num_records: usize) -> SessionConfig {
    SessionConfig {
        num_records,
        ..SessionConfig::default()
    }
}
