use crate::table::{AnnotationTable, SourceTable};
use crate::types::{
    AnnotationEntry, AnnotatorError, RecordId, Result, ANNOTATED_AT_HEADER, LABEL_HEADER,
};
use crate::utils::time::{format_timestamp, parse_timestamp};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Sibling path holding the annotations for `data_path`:
/// `data/texts.csv` becomes `data/texts_annotated.csv`.
pub fn annotated_path(data_path: impl AsRef<Path>) -> PathBuf {
    let path = data_path.as_ref();
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file_name = match path.extension() {
        Some(extension) => format!("{}_annotated.{}", stem, extension.to_string_lossy()),
        None => format!("{}_annotated", stem),
    };
    path.with_file_name(file_name)
}

/// Load a source table, as JSON when the extension is `.json` and as CSV
/// otherwise.
pub fn load_source(path: impl AsRef<Path>) -> Result<SourceTable> {
    let path = path.as_ref();
    let file = BufReader::new(File::open(path)?);
    let is_json = path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));

    let table = if is_json {
        read_source_json(file)?
    } else {
        read_source_csv(file)?
    };
    info!("Loaded {} rows from {}", table.len(), path.display());
    Ok(table)
}

pub fn read_source_csv<R: Read>(reader: R) -> Result<SourceTable> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    SourceTable::new(columns, rows)
}

/// Read a JSON array of flat objects. Columns are the union of the object
/// keys; missing keys and nulls become empty cells.
pub fn read_source_json<R: Read>(reader: R) -> Result<SourceTable> {
    let objects: Vec<serde_json::Map<String, Value>> = serde_json::from_reader(reader)?;

    let mut columns: Vec<String> = Vec::new();
    for object in &objects {
        for key in object.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = objects
        .iter()
        .map(|object| {
            columns
                .iter()
                .map(|column| match object.get(column) {
                    None | Some(Value::Null) => String::new(),
                    Some(Value::String(value)) => value.clone(),
                    Some(other) => other.to_string(),
                })
                .collect()
        })
        .collect();

    SourceTable::new(columns, rows)
}

/// Annotations previously saved next to `data_path`, if any.
pub fn load_annotations(
    data_path: impl AsRef<Path>,
    id_header: &str,
    text_header: &str,
) -> Result<Option<AnnotationTable>> {
    let path = annotated_path(data_path);
    if !path.is_file() {
        debug!("No prior annotations at {}", path.display());
        return Ok(None);
    }

    let table = read_annotations(BufReader::new(File::open(&path)?), id_header, text_header)?;
    info!("Loaded {} prior annotations from {}", table.len(), path.display());
    Ok(Some(table))
}

pub fn read_annotations<R: Read>(
    reader: R,
    id_header: &str,
    text_header: &str,
) -> Result<AnnotationTable> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = reader.headers()?.clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| AnnotatorError::Config(format!("Annotation file has no {} column", name)))
    };
    let id_position = position(id_header)?;
    let text_position = position(text_header)?;
    let label_position = position(LABEL_HEADER)?;
    let annotated_at_position = position(ANNOTATED_AT_HEADER)?;

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cell = |position: usize| record.get(position).unwrap_or_default();
        // Stored labels are lowercase, also for hand-edited files.
        let label = Some(cell(label_position))
            .filter(|label| !label.is_empty())
            .map(str::to_lowercase);

        entries.push(AnnotationEntry {
            record_id: RecordId::new(cell(id_position)),
            text: cell(text_position).to_string(),
            label,
            annotated_at: parse_timestamp(cell(annotated_at_position))?,
        });
    }

    Ok(AnnotationTable::from_entries(id_header, text_header, entries))
}

/// Write `table` next to `data_path` and return the path written.
pub fn save_annotations(data_path: impl AsRef<Path>, table: &AnnotationTable) -> Result<PathBuf> {
    let path = annotated_path(data_path);
    let mut file = BufWriter::new(File::create(&path)?);
    write_annotations(&mut file, table)?;
    file.flush()?;

    info!("Saved {} annotations to {}", table.len(), path.display());
    Ok(path)
}

pub fn write_annotations<W: Write>(writer: W, table: &AnnotationTable) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record([
        table.id_header(),
        table.text_header(),
        LABEL_HEADER,
        ANNOTATED_AT_HEADER,
    ])?;

    for entry in table.entries() {
        writer.write_record([
            entry.record_id.as_str(),
            entry.text.as_str(),
            entry.label.as_deref().unwrap_or_default(),
            format_timestamp(&entry.annotated_at).as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
