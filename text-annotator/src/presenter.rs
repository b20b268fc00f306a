use crate::types::{Presenter, Record, RecordView, SessionSummary};
use crate::utils::text::split_rows;
use anyhow::Result;
use std::io::Write;

pub const MAX_BUTTONS_IN_ROW: usize = 5;
const PROGRESS_WIDTH: usize = 30;

const RULES: &str = "Type the number or name of the label for the text below, \
    [s] to skip, [p] to go back, [q] to save and quit.";

pub type Formatter = Box<dyn Fn(&Record) -> String>;

/// Line-oriented terminal front end.
pub struct TerminalPresenter<W: Write> {
    out: W,
    formatter: Formatter,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            formatter: Box::new(|record| record.text.clone()),
        }
    }

    /// Replace how a record is turned into the text shown to the annotator.
    pub fn with_formatter(mut self, formatter: impl Fn(&Record) -> String + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn progress_line(&mut self, value: usize, max: usize, caption: &str) -> Result<()> {
        let filled = if max == 0 { PROGRESS_WIDTH } else { value.min(max) * PROGRESS_WIDTH / max };
        writeln!(
            self.out,
            "text-annotator  [{}{}] {}",
            "#".repeat(filled),
            "-".repeat(PROGRESS_WIDTH - filled),
            caption
        )?;
        Ok(())
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn render(&mut self, view: &RecordView<'_>) -> Result<()> {
        writeln!(self.out)?;
        self.progress_line(
            view.position,
            view.total,
            &format!("{}/{}", view.position + 1, view.total),
        )?;
        writeln!(self.out, "{}", RULES)?;
        writeln!(self.out)?;
        writeln!(self.out, "    {}", (self.formatter)(view.record))?;
        writeln!(self.out)?;

        let mut buttons: Vec<String> = view
            .labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let marker = if view.is_prior_label(label) { "*" } else { "" };
                format!("[{}] {}{}", i + 1, label, marker)
            })
            .collect();
        buttons.push("[s] Skip".to_string());
        buttons.push("[p] Prev".to_string());

        for row in split_rows(&buttons, MAX_BUTTONS_IN_ROW) {
            writeln!(self.out, "  {}", row.join("   "))?;
        }

        if view.awaiting_confirmation {
            writeln!(self.out, "  [c] Confirm selection   [u] Try again")?;
        }
        write!(self.out, "> ")?;
        self.out.flush()?;
        Ok(())
    }

    fn notice(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "  ! {}", message)?;
        Ok(())
    }

    fn finish(&mut self, summary: &SessionSummary) -> Result<()> {
        writeln!(self.out)?;
        let caption = if summary.complete { "Complete" } else { "Stopped" };
        let value = if summary.complete { summary.total } else { summary.annotated + summary.skipped };
        self.progress_line(value, summary.total, caption)?;
        writeln!(
            self.out,
            "{} labelled, {} skipped, {} records in this session",
            summary.annotated, summary.skipped, summary.total
        )?;
        self.out.flush()?;
        Ok(())
    }
}
