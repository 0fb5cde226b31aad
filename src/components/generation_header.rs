use crossterm::event::KeyCode;
use ratatui::prelude::{Frame, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use tui_dispatch::EventKind;

use super::{focus_border, Component, ACCENT, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::state::{Capabilities, SelectField};

/// Props for the generation selector strip across the top.
pub struct GenerationHeaderProps<'a> {
    pub generation: &'a SelectField,
    pub capabilities: Option<Capabilities>,
    pub is_focused: bool,
}

#[derive(Default)]
pub struct GenerationHeader;

impl Component<Action> for GenerationHeader {
    type Props<'a> = GenerationHeaderProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Left | KeyCode::Char('h') => {
                    props.generation.step(-1).map(Action::GenerationSelect)
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    props.generation.step(1).map(Action::GenerationSelect)
                }
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: GenerationHeaderProps<'_>) {
        let selector = match props.generation.value() {
            Some(label) => format!("\u{25c4} Gen {label} \u{25ba}"),
            None => "\u{25c4} -- \u{25ba}".to_string(),
        };
        let mechanics = match props.capabilities {
            Some(capabilities) => {
                let mut parts = vec!["moves"];
                if capabilities.has_items {
                    parts.push("items");
                }
                if capabilities.has_natures_and_abilities {
                    parts.extend(["abilities", "natures", "EVs"]);
                }
                parts.join(" / ")
            }
            None => "waiting for server".to_string(),
        };

        let line = Line::from(vec![
            Span::styled(
                selector,
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            Span::styled(mechanics, Style::default().fg(TEXT_DIM)),
        ]);
        let block = Block::default()
            .borders(Borders::ALL)
            .title("TEAM PREDICTOR")
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
            .border_style(focus_border(props.is_focused));
        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}
