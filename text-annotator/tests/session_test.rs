mod common;

use common::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use text_annotator::SessionState;
use tracing::info;

#[test]
fn test_sequential_subset_takes_first_rows() -> Result<()> {
    init_tracing();

    let source = sample_source(5);
    let session = SessionState::new(&source, "text", None, config(3))?;

    let indices: Vec<usize> = session.records().iter().map(|r| r.source_index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(session.record_id_at(0), Some(&RecordId::from(0)));
    assert_eq!(session.record_id_at(2), Some(&RecordId::from(2)));
    assert_eq!(session.record_id_at(3), None);
    assert!(session.annotations().is_empty());
    assert_eq!(session.annotations().id_header(), INDEX_ID_HEADER);
    assert_eq!(session.annotations().text_header(), "text");
    Ok(())
}

#[test]
fn test_subset_truncates_when_rows_run_out() -> Result<()> {
    let source = sample_source(4);
    let session = SessionState::new(&source, "text", None, config(10))?;
    assert_eq!(session.len(), 4, "Sequential selection takes what is there");
    Ok(())
}

#[test]
fn test_id_column_keys_records() -> Result<()> {
    let source = sample_source(3);
    let session = SessionState::new(
        &source,
        "text",
        None,
        SessionConfig {
            id_column: Some("id".to_string()),
            ..config(3)
        },
    )?;

    assert_eq!(session.record_id_at(1).map(RecordId::as_str), Some("r1"));
    assert_eq!(session.annotations().id_header(), "id");
    assert_eq!(session.record_at(1).and_then(|r| r.field("title")), Some("title 1"));
    Ok(())
}

#[test]
fn test_resume_excludes_annotated_texts() -> Result<()> {
    init_tracing();

    let source = sample_source(8);
    let prior = prior_for_rows(&[(0, Some("positive")), (2, None), (5, Some("neutral"))]);
    let annotated: HashSet<String> = prior.entries().iter().map(|e| e.text.clone()).collect();

    let session = SessionState::new(&source, "text", Some(prior), config(10))?;
    info!("Resumed session has {} records", session.len());

    assert_eq!(session.len(), 5);
    for record in session.records() {
        assert!(
            !annotated.contains(&record.text),
            "{} was already annotated",
            record.text
        );
    }
    // The prior table is carried over untouched.
    assert_eq!(session.annotations().len(), 3);
    Ok(())
}

#[test]
fn test_edit_mode_includes_only_annotated_texts() -> Result<()> {
    let source = sample_source(8);
    let prior = prior_for_rows(&[(1, Some("negative")), (6, Some("positive"))]);

    let session = SessionState::new(
        &source,
        "text",
        Some(prior.clone()),
        SessionConfig {
            edit_annotations: true,
            ..config(10)
        },
    )?;

    let indices: Vec<usize> = session.records().iter().map(|r| r.source_index).collect();
    assert_eq!(indices, vec![1, 6]);
    for record in session.records() {
        assert!(prior.contains_text(&record.text));
    }

    let (row, entry) = session.prior_entry_for(1).expect("record 6 has an entry");
    assert_eq!(row, 1);
    assert_eq!(entry.label.as_deref(), Some("positive"));
    Ok(())
}

#[test]
fn test_edit_mode_forces_sequential_order() -> Result<()> {
    let source = sample_source(6);
    let prior = prior_for_rows(&[(0, Some("positive")), (3, None), (4, Some("neutral"))]);

    let config = SessionConfig {
        edit_annotations: true,
        random: true,
        // More than the eligible rows: sampling would refuse this.
        num_records: 5,
        ..SessionConfig::default()
    };
    assert!(!config.random_order());

    let session = SessionState::new(&source, "text", Some(prior), config)?;
    let indices: Vec<usize> = session.records().iter().map(|r| r.source_index).collect();
    assert_eq!(indices, vec![0, 3, 4]);
    Ok(())
}

#[test]
fn test_empty_prior_table_keeps_all_rows() -> Result<()> {
    let source = sample_source(3);
    let prior = AnnotationTable::new(INDEX_ID_HEADER, "text");
    let session = SessionState::new(&source, "text", Some(prior), config(3))?;
    assert_eq!(session.len(), 3);
    Ok(())
}

#[test]
fn test_random_sample_is_distinct_and_eligible() -> Result<()> {
    let source = sample_source(20);
    let prior = prior_for_rows(&[(0, Some("positive")), (1, Some("negative"))]);
    let mut rng = StdRng::seed_from_u64(7);

    let session = SessionState::with_rng(
        &source,
        "text",
        Some(prior),
        SessionConfig {
            random: true,
            ..config(6)
        },
        &mut rng,
    )?;

    assert_eq!(session.len(), 6);
    let indices: HashSet<usize> = session.records().iter().map(|r| r.source_index).collect();
    assert_eq!(indices.len(), 6, "Sampling is without replacement");
    assert!(!indices.contains(&0) && !indices.contains(&1));
    Ok(())
}

#[test]
fn test_seeded_sampling_is_reproducible() -> Result<()> {
    let source = sample_source(50);
    let seeded = SessionConfig {
        random: true,
        seed: Some(42),
        ..config(10)
    };

    let first = SessionState::new(&source, "text", None, seeded.clone())?;
    let second = SessionState::new(&source, "text", None, seeded)?;
    assert_eq!(first.records(), second.records());
    Ok(())
}

#[test]
fn test_random_sample_larger_than_eligible_is_rejected() {
    let source = sample_source(3);
    let result = SessionState::new(
        &source,
        "text",
        None,
        SessionConfig {
            random: true,
            ..config(4)
        },
    );
    assert!(matches!(result, Err(AnnotatorError::Config(_))));
}

#[test]
fn test_missing_columns_are_config_errors() {
    let source = sample_source(3);

    let missing_text = SessionState::new(&source, "body", None, config(3));
    assert!(matches!(missing_text, Err(AnnotatorError::Config(_))));

    let missing_id = SessionState::new(
        &source,
        "text",
        None,
        SessionConfig {
            id_column: Some("uuid".to_string()),
            ..config(3)
        },
    );
    assert!(matches!(missing_id, Err(AnnotatorError::Config(_))));
}

#[test]
fn test_label_set_is_validated() {
    let source = sample_source(3);
    for labels in [vec![], vec!["Yes".to_string(), "yes".to_string()], vec![" ".to_string()]] {
        let result = SessionState::new(
            &source,
            "text",
            None,
            SessionConfig {
                labels,
                ..config(3)
            },
        );
        assert!(matches!(result, Err(AnnotatorError::Config(_))));
    }
}
