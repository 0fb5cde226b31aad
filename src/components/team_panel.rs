use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::{Frame, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use tui_dispatch::EventKind;

use super::{focus_border, Component, ACCENT, BG_CURSOR, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::state::{
    AppState, SelectField, SlotField, TeamSlot, EV_MAX, LEVEL_MAX, LEVEL_MIN, MAX_TEAM_SIZE,
    STAT_NAMES,
};

/// Props for the roster editor - read-only view of state
pub struct TeamPanelProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

#[derive(Default)]
pub struct TeamPanel;

impl Component<Action> for TeamPanel {
    type Props<'a> = TeamPanelProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        match event {
            EventKind::Key(key) => {
                let fast = key.modifiers.contains(KeyModifiers::SHIFT);
                match key.code {
                    KeyCode::Up | KeyCode::Char('k') => Some(Action::CursorMove(-1)),
                    KeyCode::Down | KeyCode::Char('j') => Some(Action::CursorMove(1)),
                    KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') => {
                        edit_action(props.state, -1, fast)
                    }
                    KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') => {
                        edit_action(props.state, 1, fast)
                    }
                    _ => None,
                }
            }
            EventKind::Scroll { delta, .. } => Some(Action::CursorMove(*delta as i16)),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: TeamPanelProps<'_>) {
        let state = props.state;
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("TEAM ({}/{})", state.team.len(), MAX_TEAM_SIZE))
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
            .border_style(focus_border(props.is_focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if state.team.is_empty() {
            let message = if state.rulesets.is_empty() {
                "Waiting for the predictor to announce its generations..."
            } else {
                "Empty team. Press a to add a member."
            };
            frame.render_widget(
                Paragraph::new(message)
                    .style(Style::default().fg(TEXT_DIM))
                    .wrap(Wrap { trim: true }),
                inner,
            );
            return;
        }

        let (lines, cursor_line) = roster_lines(state, props.is_focused);
        let offset = scroll_offset(cursor_line, lines.len(), inner.height as usize);
        frame.render_widget(
            Paragraph::new(Text::from(lines)).scroll((offset as u16, 0)),
            inner,
        );
    }
}

/// Translate a left/right edit on the cursor row into its action. Selects
/// always step one option; level and EVs step 10 under shift.
fn edit_action(state: &AppState, direction: i16, fast: bool) -> Option<Action> {
    let (slot, field) = state.cursor_position()?;
    let entry = state.team.get(slot)?;
    let numeric_step = if fast { 10 } else { 1 };
    match field {
        SlotField::Species => entry
            .species
            .step(direction)
            .map(|index| Action::SpeciesSelect { slot, index }),
        SlotField::Level => {
            let level = stepped(entry.level, direction, numeric_step, LEVEL_MIN, LEVEL_MAX);
            (level != entry.level).then_some(Action::LevelSet { slot, level })
        }
        SlotField::Item => entry
            .item
            .as_ref()
            .and_then(|field| field.step(direction))
            .map(|index| Action::ItemSelect { slot, index }),
        SlotField::Ability => entry
            .ability
            .as_ref()
            .and_then(|field| field.step(direction))
            .map(|index| Action::AbilitySelect { slot, index }),
        SlotField::Nature => entry
            .nature
            .as_ref()
            .and_then(|field| field.step(direction))
            .map(|index| Action::NatureSelect { slot, index }),
        SlotField::Ev(stat) => {
            let current = *entry.evs.as_ref()?.get(stat)?;
            let value = stepped(current, direction, numeric_step, 0, EV_MAX);
            (value != current).then_some(Action::EvSet { slot, stat, value })
        }
        SlotField::Move(choice) => entry
            .moves
            .get(choice)
            .and_then(|field| field.step(direction))
            .map(|index| Action::MoveSelect {
                slot,
                choice,
                index,
            }),
    }
}

fn stepped(current: u16, direction: i16, step: u16, min: u16, max: u16) -> u16 {
    if direction < 0 {
        current.saturating_sub(step).max(min)
    } else {
        current.saturating_add(step).min(max)
    }
}

fn roster_lines(state: &AppState, is_focused: bool) -> (Vec<Line<'static>>, Option<usize>) {
    let mut lines = Vec::new();
    let mut cursor_line = None;
    let mut row = 0usize;
    for (index, entry) in state.team.iter().enumerate() {
        let species = entry.species.value().unwrap_or("--");
        lines.push(Line::from(Span::styled(
            format!("{}. {}", index + 1, species),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )));
        for field in entry.fields() {
            let is_cursor = state.cursor == row;
            if is_cursor {
                cursor_line = Some(lines.len());
            }
            lines.push(field_line(entry, field, is_cursor, is_focused));
            row += 1;
        }
    }
    if state.can_add_slot() {
        lines.push(Line::from(Span::styled(
            "a: add  c: clear",
            Style::default().fg(TEXT_DIM),
        )));
    }
    (lines, cursor_line)
}

fn field_line(
    entry: &TeamSlot,
    field: SlotField,
    is_cursor: bool,
    is_focused: bool,
) -> Line<'static> {
    let marker = if is_cursor { "\u{25b8} " } else { "  " };
    let mut line = Line::from(vec![
        Span::raw(marker),
        Span::styled(
            format!("{:<8}", field_label(field)),
            Style::default().fg(TEXT_DIM),
        ),
        Span::styled(
            format!("\u{25c4} {} \u{25ba}", field_value(entry, field)),
            Style::default().fg(TEXT_MAIN),
        ),
    ]);
    if is_cursor && is_focused {
        line = line.style(Style::default().bg(BG_CURSOR).add_modifier(Modifier::BOLD));
    }
    line
}

fn field_label(field: SlotField) -> String {
    match field {
        SlotField::Species => "Species".to_string(),
        SlotField::Level => "Level".to_string(),
        SlotField::Item => "Item".to_string(),
        SlotField::Ability => "Ability".to_string(),
        SlotField::Nature => "Nature".to_string(),
        SlotField::Ev(stat) => format!("EV {}", STAT_NAMES[stat]),
        SlotField::Move(choice) => format!("Move {}", choice + 1),
    }
}

fn field_value(entry: &TeamSlot, field: SlotField) -> String {
    match field {
        SlotField::Species => entry.species.value().unwrap_or("--").to_string(),
        SlotField::Level => entry.level.to_string(),
        SlotField::Item => select_value(entry.item.as_ref()),
        SlotField::Ability => select_value(entry.ability.as_ref()),
        SlotField::Nature => select_value(entry.nature.as_ref()),
        SlotField::Ev(stat) => entry
            .evs
            .map(|evs| evs[stat])
            .unwrap_or_default()
            .to_string(),
        SlotField::Move(choice) => select_value(entry.moves.get(choice)),
    }
}

fn select_value(field: Option<&SelectField>) -> String {
    field
        .and_then(SelectField::value)
        .unwrap_or("--")
        .to_string()
}

/// Keep the cursor row in the visible window, preferring to center it.
fn scroll_offset(cursor_line: Option<usize>, total: usize, height: usize) -> usize {
    if height == 0 || total <= height {
        return 0;
    }
    let max_offset = total - height;
    cursor_line
        .map(|line| line.saturating_sub(height / 2).min(max_offset))
        .unwrap_or(0)
}
