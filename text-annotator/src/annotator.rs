use crate::persistence::{load_annotations, load_source, save_annotations};
use crate::recorder::AnnotationRecorder;
use crate::session::SessionState;
use crate::table::{AnnotationTable, SourceTable};
use crate::types::{Action, AnnotatorError, Presenter, Result, SessionConfig, SessionSummary};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One line of annotator input, interpreted against the configured labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Apply(Action),
    Redraw,
    Quit,
}

/// Parse one input line.
///
/// A configured label name wins over everything else, so labels such as `0`
/// or `s` stay reachable. Otherwise a number picks the label at that
/// (1-based) position, and `s`, `p`, `c`, `u` (or `skip`, `prev`, `confirm`,
/// `undo`) map to the other actions. An empty line confirms a pending
/// selection. Anything else is taken as a label name and checked by the
/// recorder.
pub fn parse_command(line: &str, labels: &[String], awaiting_confirmation: bool) -> Command {
    let input = line.trim();
    if input.is_empty() {
        return if awaiting_confirmation {
            Command::Apply(Action::Confirm)
        } else {
            Command::Redraw
        };
    }

    let lowered = input.to_lowercase();
    if labels.iter().any(|label| label.to_lowercase() == lowered) {
        return Command::Apply(Action::Choose(input.to_string()));
    }

    if let Ok(number) = input.parse::<usize>() {
        if let Some(label) = number.checked_sub(1).and_then(|i| labels.get(i)) {
            return Command::Apply(Action::Choose(label.clone()));
        }
    }

    match lowered.as_str() {
        "s" | "skip" => Command::Apply(Action::Skip),
        "p" | "prev" => Command::Apply(Action::Prev),
        "c" | "confirm" => Command::Apply(Action::Confirm),
        "u" | "undo" | "r" | "redo" | "try again" => Command::Apply(Action::Undo),
        "q" | "quit" | "exit" => Command::Quit,
        _ => Command::Apply(Action::Choose(input.to_string())),
    }
}

/// Drive `recorder` from `reader`, one command per line, until the session
/// completes, the annotator quits, or input ends.
pub fn run_session<R: BufRead, P: Presenter + ?Sized>(
    recorder: &mut AnnotationRecorder,
    presenter: &mut P,
    reader: &mut R,
) -> Result<SessionSummary> {
    loop {
        let Some(view) = recorder.view() else {
            break;
        };
        presenter.render(&view)?;

        let mut buffer = Vec::new();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            info!("Input closed; stopping session");
            break;
        }
        let Ok(line) = String::from_utf8(buffer) else {
            warn!("Rejected command: input is not valid UTF-8");
            presenter.notice("Input is not valid UTF-8")?;
            continue;
        };

        let action = match parse_command(
            &line,
            recorder.session().labels(),
            recorder.is_awaiting_confirmation(),
        ) {
            Command::Quit => break,
            Command::Redraw => continue,
            Command::Apply(action) => action,
        };

        match recorder.apply(action) {
            Ok(_) => {}
            Err(error @ (AnnotatorError::InvalidLabel { .. } | AnnotatorError::SelectionPending { .. })) => {
                warn!("Rejected command: {}", error);
                presenter.notice(&error.to_string())?;
            }
            Err(error) => return Err(error),
        }
    }

    let summary = recorder.summary();
    presenter.finish(&summary)?;
    Ok(summary)
}

/// A session over a data file, with annotations stored next to it.
pub struct Annotator {
    data_path: PathBuf,
    recorder: AnnotationRecorder,
}

impl Annotator {
    /// Load `data_path` and any annotations saved next to it, then select the
    /// records for this session.
    pub fn open(data_path: impl AsRef<Path>, text_column: &str, config: SessionConfig) -> Result<Self> {
        let data_path = data_path.as_ref().to_path_buf();
        let source = load_source(&data_path)?;
        let prior = load_annotations(&data_path, config.id_header(), text_column)?;
        Self::from_parts(data_path, &source, text_column, prior, config)
    }

    pub fn from_parts(
        data_path: PathBuf,
        source: &SourceTable,
        text_column: &str,
        prior: Option<AnnotationTable>,
        config: SessionConfig,
    ) -> Result<Self> {
        let session = SessionState::new(source, text_column, prior, config)?;
        Ok(Self {
            data_path,
            recorder: AnnotationRecorder::new(session),
        })
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn recorder(&self) -> &AnnotationRecorder {
        &self.recorder
    }

    pub fn recorder_mut(&mut self) -> &mut AnnotationRecorder {
        &mut self.recorder
    }

    pub fn annotations(&self) -> &AnnotationTable {
        self.recorder.annotations()
    }

    pub fn run<R: BufRead, P: Presenter + ?Sized>(
        &mut self,
        presenter: &mut P,
        reader: &mut R,
    ) -> Result<SessionSummary> {
        run_session(&mut self.recorder, presenter, reader)
    }

    pub fn save(&self) -> Result<PathBuf> {
        save_annotations(&self.data_path, self.annotations())
    }
}
