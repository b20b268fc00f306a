pub mod baseline;
pub mod defs;
pub mod empty;
pub mod state;

pub use baseline::BaselinePresenter;
pub use defs::{AnnotationEntry, Presenter, Record, RecordId, RecordView, SessionSummary};
pub use empty::EmptyPresenter;
pub use state::{Action, SessionStatus};
