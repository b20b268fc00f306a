use anyhow::Result;

use crate::defs::Presenter;
use crate::defs::RecordView;
use crate::defs::SessionSummary;

fn progress(view: &RecordView<'_>) -> String {
    format!("{}/{}", view.position + 1, view.total)
}

fn label_line(view: &RecordView<'_>) -> String {
    view.labels
        .iter()
        .map(|label| {
            if view.is_prior_label(label) {
                format!("[{}]", label)
            } else {
                label.clone()
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Keeps every frame as plain text, with the record's text shown as-is.
#[derive(Default)]
pub struct BaselinePresenter {
    pub frames: Vec<String>,
}

impl BaselinePresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> Option<&str> {
        self.frames.last().map(String::as_str)
    }
}

impl Presenter for BaselinePresenter {

    fn render(&mut self, view: &RecordView<'_>) -> Result<()> {
        let mut frame = format!("{} {}\n{}", progress(view), view.record.text, label_line(view));
        if view.awaiting_confirmation {
            frame.push_str("\n(confirm)");
        }
        self.frames.push(frame);
        Ok(())
    }

    fn notice(&mut self, message: &str) -> Result<()> {
        self.frames.push(format!("! {}", message));
        Ok(())
    }

    fn finish(&mut self, summary: &SessionSummary) -> Result<()> {
        let status = if summary.complete { "Complete" } else { "Stopped" };
        self.frames.push(format!("{} {}/{}", status, summary.annotated, summary.total));
        Ok(())
    }

}
