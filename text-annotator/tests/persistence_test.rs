mod common;

use common::*;
use std::fs;
use std::path::PathBuf;
use text_annotator::persistence::{read_annotations, read_source_csv, read_source_json, write_annotations};
use text_annotator::{
    annotated_path, load_annotations, load_source, save_annotations, AnnotationRecorder, SessionState,
};

#[test]
fn test_annotated_path_inserts_suffix_before_extension() {
    assert_eq!(annotated_path("data/reviews.csv"), PathBuf::from("data/reviews_annotated.csv"));
    assert_eq!(annotated_path("reviews.tar.gz"), PathBuf::from("reviews.tar_annotated.gz"));
    assert_eq!(annotated_path("/tmp/reviews"), PathBuf::from("/tmp/reviews_annotated"));
}

#[test]
fn test_read_source_csv_keeps_columns_and_order() -> Result<()> {
    let csv = "id,text\n7,\"Great, loved it\"\n9,meh\n";
    let table = read_source_csv(csv.as_bytes())?;

    assert_eq!(table.columns(), ["id", "text"]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.column("text")?, vec!["Great, loved it", "meh"]);
    assert_eq!(table.rows()[1].index, 1);
    Ok(())
}

#[test]
fn test_read_source_csv_rejects_ragged_rows() {
    let csv = "id,text\n1,ok\n2\n";
    assert!(matches!(read_source_csv(csv.as_bytes()), Err(AnnotatorError::Csv(_))));
}

#[test]
fn test_read_source_json_stringifies_scalars() -> Result<()> {
    let json = r#"[
        {"id": 1, "text": "first", "score": 0.5},
        {"id": 2, "text": "second", "score": null}
    ]"#;
    let table = read_source_json(json.as_bytes())?;

    assert_eq!(table.len(), 2);
    assert_eq!(table.column("id")?, vec!["1", "2"]);
    assert_eq!(table.column("score")?, vec!["0.5", ""]);
    Ok(())
}

#[test]
fn test_annotation_csv_round_trip() -> Result<()> {
    let table = AnnotationTable::from_entries(
        "id",
        "review",
        vec![
            entry("a1", "Great, loved it", Some("positive")),
            entry("a2", "multi\nline", None),
        ],
    );

    let mut buffer = Vec::new();
    write_annotations(&mut buffer, &table)?;
    let written = String::from_utf8(buffer.clone()).expect("utf-8 output");
    assert!(written.starts_with("id,review,label,annotated_at\n"));
    assert!(written.contains("2024-05-01 09:30:00"));

    let read_back = read_annotations(buffer.as_slice(), "id", "review")?;
    assert_eq!(read_back, table);
    Ok(())
}

#[test]
fn test_read_annotations_ignores_extra_columns() -> Result<()> {
    let csv = ",id_column,text,label,annotated_at\n0,3,text 3,neutral,2024-05-01 09:30:00\n";
    let table = read_annotations(csv.as_bytes(), INDEX_ID_HEADER, "text")?;

    assert_eq!(table.len(), 1);
    assert_eq!(table.entries()[0], entry("3", "text 3", Some("neutral")));
    Ok(())
}

#[test]
fn test_read_annotations_lowercases_labels() -> Result<()> {
    let csv = "id_column,text,label,annotated_at\n0,text 0,Positive,2024-05-01 09:30:00\n";
    let table = read_annotations(csv.as_bytes(), INDEX_ID_HEADER, "text")?;
    assert_eq!(table.entries()[0].label.as_deref(), Some("positive"));

    let session = SessionState::new(
        &sample_source(2),
        "text",
        Some(table),
        SessionConfig {
            edit_annotations: true,
            ..config(2)
        },
    )?;
    let recorder = AnnotationRecorder::new(session);
    let view = recorder.view().expect("record to edit");
    assert!(view.is_prior_label("Positive"));
    assert!(!view.is_prior_label("Negative"));
    Ok(())
}

#[test]
fn test_read_annotations_requires_columns() {
    let csv = "id_column,text,annotated_at\n0,text 0,2024-05-01 09:30:00\n";
    let result = read_annotations(csv.as_bytes(), INDEX_ID_HEADER, "text");
    assert!(matches!(result, Err(AnnotatorError::Config(_))));
}

#[test]
fn test_read_annotations_rejects_bad_timestamp() {
    let csv = "id_column,text,label,annotated_at\n0,text 0,positive,yesterday\n";
    let result = read_annotations(csv.as_bytes(), INDEX_ID_HEADER, "text");
    assert!(matches!(result, Err(AnnotatorError::Timestamp { .. })));
}

#[test]
fn test_save_then_load_next_to_data_file() -> Result<()> {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let data_path = dir.path().join("reviews.csv");
    fs::write(&data_path, "text\nfirst\nsecond\n")?;

    assert!(load_annotations(&data_path, INDEX_ID_HEADER, "text")?.is_none());
    assert_eq!(load_source(&data_path)?.len(), 2);

    let table = prior_for_rows(&[(0, Some("positive")), (1, None)]);
    let written = save_annotations(&data_path, &table)?;
    assert_eq!(written, dir.path().join("reviews_annotated.csv"));

    let loaded = load_annotations(&data_path, INDEX_ID_HEADER, "text")?.expect("saved annotations");
    assert_eq!(loaded, table);
    Ok(())
}

#[test]
fn test_load_source_picks_json_by_extension() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let data_path = dir.path().join("reviews.JSON");
    fs::write(&data_path, r#"[{"text": "only"}]"#)?;

    let table = load_source(&data_path)?;
    assert_eq!(table.column("text")?, vec!["only"]);
    Ok(())
}
