use crate::session::SessionState;
use crate::table::AnnotationTable;
use crate::types::{
    Action, AnnotationEntry, AnnotatorError, RecordView, Result, SessionStatus, SessionSummary,
};
use crate::utils::time;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Forward,
    Back,
}

enum Selection {
    Label(String),
    Skip,
}

/// Applies annotator actions to a session, one at a time.
#[derive(Debug)]
pub struct AnnotationRecorder {
    session: SessionState,
    status: SessionStatus,
    awaiting_confirmation: bool,
}

impl AnnotationRecorder {
    pub fn new(session: SessionState) -> Self {
        // Nothing eligible means nothing to do.
        let status = if session.is_empty() {
            SessionStatus::Complete
        } else {
            SessionStatus::Active { position: 0 }
        };

        Self {
            session,
            status,
            awaiting_confirmation: false,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn position(&self) -> Option<usize> {
        self.status.position()
    }

    pub fn is_complete(&self) -> bool {
        self.status.is_complete()
    }

    pub fn is_awaiting_confirmation(&self) -> bool {
        self.awaiting_confirmation
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn annotations(&self) -> &AnnotationTable {
        self.session.annotations()
    }

    pub fn into_session(self) -> SessionState {
        self.session
    }

    pub fn apply(&mut self, action: Action) -> Result<SessionStatus> {
        match action {
            Action::Choose(label) => self.choose_label(&label),
            Action::Skip => self.skip(),
            Action::Confirm => self.confirm(),
            Action::Prev => self.prev(),
            Action::Undo => self.undo().map(|_| self.status),
        }
    }

    /// Record `label` for the current record. The label must be one of the
    /// configured labels, compared case-insensitively, and is stored
    /// lowercased.
    pub fn choose_label(&mut self, label: &str) -> Result<SessionStatus> {
        let position = self.selectable_position()?;
        let wanted = label.trim().to_lowercase();
        let label = self
            .session
            .labels()
            .iter()
            .map(|configured| configured.to_lowercase())
            .find(|configured| *configured == wanted)
            .ok_or_else(|| AnnotatorError::InvalidLabel {
                label: label.to_string(),
            })?;

        self.record(position, Selection::Label(label));
        self.after_selection()
    }

    /// Record a skip for the current record. A label stored earlier for the
    /// same record is kept.
    pub fn skip(&mut self) -> Result<SessionStatus> {
        let position = self.selectable_position()?;
        self.record(position, Selection::Skip);
        self.after_selection()
    }

    pub fn confirm(&mut self) -> Result<SessionStatus> {
        self.advance(Step::Forward)
    }

    pub fn prev(&mut self) -> Result<SessionStatus> {
        self.advance(Step::Back)
    }

    /// Drop the most recently appended annotation row, whatever position it
    /// was written at, and unlock selection at the current position.
    pub fn undo(&mut self) -> Result<Option<AnnotationEntry>> {
        self.active_position()?;
        self.awaiting_confirmation = false;

        let removed = self.session.annotations_mut().pop();
        match &removed {
            Some(entry) => debug!("Undo removed annotation for record {}", entry.record_id),
            None => debug!("Undo with an empty annotation table"),
        }
        Ok(removed)
    }

    pub fn advance(&mut self, step: Step) -> Result<SessionStatus> {
        let position = self.active_position()?;
        let last = self.session.len() - 1;

        self.status = match step {
            Step::Back if position == 0 => return Ok(self.status),
            Step::Back => SessionStatus::Active { position: position - 1 },
            Step::Forward if position < last => SessionStatus::Active { position: position + 1 },
            Step::Forward => {
                info!("Session complete after {} records", self.session.len());
                SessionStatus::Complete
            }
        };
        self.awaiting_confirmation = false;

        Ok(self.status)
    }

    /// Snapshot of the current position for a presenter; `None` once complete.
    pub fn view(&self) -> Option<RecordView<'_>> {
        let position = self.position()?;
        let record = self.session.record_at(position)?;
        let prior_label = self
            .session
            .prior_entry_for(position)
            .and_then(|(_, entry)| entry.label.as_deref());

        Some(RecordView {
            position,
            total: self.session.len(),
            record,
            labels: self.session.labels(),
            prior_label,
            awaiting_confirmation: self.awaiting_confirmation,
        })
    }

    pub fn summary(&self) -> SessionSummary {
        let mut annotated = 0;
        let mut skipped = 0;
        for position in 0..self.session.len() {
            match self.session.prior_entry_for(position) {
                Some((_, entry)) if entry.label.is_some() => annotated += 1,
                Some(_) => skipped += 1,
                None => {}
            }
        }

        SessionSummary {
            total: self.session.len(),
            annotated,
            skipped,
            complete: self.is_complete(),
        }
    }

    fn active_position(&self) -> Result<usize> {
        self.position().ok_or(AnnotatorError::SessionClosed)
    }

    fn selectable_position(&self) -> Result<usize> {
        let position = self.active_position()?;
        if self.awaiting_confirmation {
            return Err(AnnotatorError::SelectionPending { position });
        }
        Ok(position)
    }

    fn after_selection(&mut self) -> Result<SessionStatus> {
        if self.session.config().confirm {
            self.awaiting_confirmation = true;
            Ok(self.status)
        } else {
            self.advance(Step::Forward)
        }
    }

    fn record(&mut self, position: usize, selection: Selection) {
        let Some(record) = self.session.record_at(position) else {
            return;
        };
        let record_id = record.record_id.clone();
        let text = record.text.clone();
        let existing = self
            .session
            .prior_entry_for(position)
            .map(|(row, entry)| (row, entry.label.clone()));

        let annotated_at = time::now();
        let table = self.session.annotations_mut();
        match existing {
            Some((row, prior_label)) => {
                let label = match selection {
                    Selection::Label(label) => Some(label),
                    Selection::Skip => prior_label,
                };
                debug!("Updating annotation row {} for record {}: {:?}", row, record_id, label);
                table.replace(
                    row,
                    AnnotationEntry {
                        record_id,
                        text,
                        label,
                        annotated_at,
                    },
                );
            }
            None => {
                let label = match selection {
                    Selection::Label(label) => Some(label),
                    Selection::Skip => None,
                };
                debug!("Appending annotation for record {}: {:?}", record_id, label);
                table.push(AnnotationEntry {
                    record_id,
                    text,
                    label,
                    annotated_at,
                });
            }
        }
    }
}
