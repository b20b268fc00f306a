// Use the interfaces crate for core types
pub use interfaces::defs::{AnnotationEntry, Presenter, Record, RecordId, RecordView, SessionSummary};
pub use interfaces::state::{Action, SessionStatus};

/// Header used for the id column when records are keyed by source row index.
pub const INDEX_ID_HEADER: &str = "id_column";
pub const LABEL_HEADER: &str = "label";
pub const ANNOTATED_AT_HEADER: &str = "annotated_at";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub num_records: usize,
    pub id_column: Option<String>,
    pub edit_annotations: bool,
    pub random: bool,
    pub labels: Vec<String>,
    pub confirm: bool,
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            num_records: 10,
            id_column: None,
            edit_annotations: false,
            random: false,
            labels: vec![
                "Positive".to_string(),
                "Negative".to_string(),
                "Neutral".to_string(),
            ],
            confirm: false,
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Random order never applies when correcting existing annotations.
    pub fn random_order(&self) -> bool {
        self.random && !self.edit_annotations
    }

    pub fn id_header(&self) -> &str {
        self.id_column.as_deref().unwrap_or(INDEX_ID_HEADER)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnnotatorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Label {label:?} is not one of the configured labels")]
    InvalidLabel { label: String },

    #[error("Session is complete; no further changes are accepted")]
    SessionClosed,

    #[error("Selection at position {position} is waiting for confirm or undo")]
    SelectionPending { position: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Presentation(#[from] anyhow::Error),

    #[error("Invalid timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

pub type Result<T> = std::result::Result<T, AnnotatorError>;
