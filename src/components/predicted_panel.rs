use ratatui::prelude::{Frame, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use tui_dispatch::EventKind;

use super::{Component, ACCENT_ALT, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;

/// Props for the prediction readout on the right.
pub struct PredictedPanelProps<'a> {
    pub predicted: Option<&'a str>,
}

#[derive(Default)]
pub struct PredictedPanel;

impl Component<Action> for PredictedPanel {
    type Props<'a> = PredictedPanelProps<'a>;

    fn handle_event(
        &mut self,
        _event: &EventKind,
        _props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        None::<Action>
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: PredictedPanelProps<'_>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("PREDICTED")
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
            .border_style(Style::default().fg(TEXT_DIM));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let paragraph = match props.predicted {
            Some(text) => Paragraph::new(text.to_string()).style(Style::default().fg(ACCENT_ALT)),
            None => Paragraph::new("No prediction yet. r: random  m: most likely")
                .style(Style::default().fg(TEXT_DIM)),
        };
        frame.render_widget(paragraph.wrap(Wrap { trim: false }), inner);
    }
}
