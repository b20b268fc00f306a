use crate::defs::Presenter;
use crate::defs::RecordView;
use crate::defs::SessionSummary;

pub struct EmptyPresenter;

impl Presenter for EmptyPresenter {
    fn render(&mut self, _view: &RecordView<'_>) -> anyhow::Result<()> {
        // Headless sessions draw nothing.
        Ok(())
    }
    fn notice(&mut self, _message: &str) -> anyhow::Result<()> {
        Ok(())
    }
    fn finish(&mut self, _summary: &SessionSummary) -> anyhow::Result<()> {
        Ok(())
    }
}
