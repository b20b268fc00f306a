pub mod types;
pub mod utils;
pub mod table;
pub mod session;
pub mod recorder;
pub mod persistence;
pub mod presenter;
pub mod annotator;

pub use types::*;
pub use table::{AnnotationTable, SourceRow, SourceTable};
pub use session::SessionState;
pub use recorder::{AnnotationRecorder, Step};
pub use persistence::{annotated_path, load_annotations, load_source, save_annotations};
pub use presenter::TerminalPresenter;
pub use annotator::{parse_command, run_session, Annotator, Command};
