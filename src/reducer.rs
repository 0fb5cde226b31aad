//! Reducer - pure function: (state, action) -> DispatchResult
//!
//! Every roster edit ships a fresh "most likely" snapshot to the server in
//! the same reduction, so the server never waits on an explicit submit.

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::payload::{self, Style};
use crate::state::{AppState, SelectField, TeamSlot, EV_MAX, LEVEL_MAX, LEVEL_MIN};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => DispatchResult::changed_with(Effect::Listen),

        // ===== Channel =====
        Action::ChannelDidLoad(push) => {
            let mut effects = Vec::new();
            if let Some(rulesets) = push.generations {
                state.ingest(rulesets);
                // The server gets a defaulted snapshot right away.
                effects.push(send_current(state, Style::MostLikely));
            }
            if let Some(text) = push.predicted {
                state.predicted = Some(text);
            }
            effects.push(Effect::Listen);
            DispatchResult::changed_with_many(effects)
        }

        Action::ChannelDidClose => DispatchResult::unchanged(),

        // ===== Roster structure =====
        Action::GenerationSelect(index) => {
            if !state.generation.select(index) {
                return DispatchResult::unchanged();
            }
            state.clear_team();
            DispatchResult::changed_with(send_current(state, Style::MostLikely))
        }

        Action::SlotAdd => {
            if !state.can_add_slot() {
                return DispatchResult::unchanged();
            }
            let Some(ruleset) = state.active_ruleset() else {
                return DispatchResult::unchanged();
            };
            let entry = TeamSlot::build(ruleset);
            let first_row = state.total_rows();
            state.team.push(entry);
            state.cursor = first_row;
            DispatchResult::changed_with(send_current(state, Style::MostLikely))
        }

        Action::TeamClear => {
            if state.team.is_empty() {
                return DispatchResult::unchanged();
            }
            state.clear_team();
            DispatchResult::changed_with(send_current(state, Style::MostLikely))
        }

        // ===== Entry fields =====
        Action::SpeciesSelect { slot, index } => {
            let Some(label) = state.generation.value().map(str::to_owned) else {
                return DispatchResult::unchanged();
            };
            let Some(ruleset) = state.rulesets.get(&label) else {
                return DispatchResult::unchanged();
            };
            let changed = state
                .team
                .get_mut(slot)
                .map(|entry| entry.change_species(ruleset, index))
                .unwrap_or(false);
            edited(state, changed)
        }

        Action::LevelSet { slot, level } => {
            let level = level.clamp(LEVEL_MIN, LEVEL_MAX);
            let changed = state
                .team
                .get_mut(slot)
                .map(|entry| {
                    if entry.level == level {
                        false
                    } else {
                        entry.level = level;
                        true
                    }
                })
                .unwrap_or(false);
            edited(state, changed)
        }

        Action::ItemSelect { slot, index } => {
            let changed = state
                .team
                .get_mut(slot)
                .map(|entry| select_in(entry.item.as_mut(), index))
                .unwrap_or(false);
            edited(state, changed)
        }

        Action::AbilitySelect { slot, index } => {
            let changed = state
                .team
                .get_mut(slot)
                .map(|entry| select_in(entry.ability.as_mut(), index))
                .unwrap_or(false);
            edited(state, changed)
        }

        Action::NatureSelect { slot, index } => {
            let changed = state
                .team
                .get_mut(slot)
                .map(|entry| select_in(entry.nature.as_mut(), index))
                .unwrap_or(false);
            edited(state, changed)
        }

        Action::EvSet { slot, stat, value } => {
            let value = value.min(EV_MAX);
            let changed = state
                .team
                .get_mut(slot)
                .and_then(|entry| entry.evs.as_mut())
                .and_then(|evs| evs.get_mut(stat))
                .map(|ev| {
                    if *ev == value {
                        false
                    } else {
                        *ev = value;
                        true
                    }
                })
                .unwrap_or(false);
            edited(state, changed)
        }

        Action::MoveSelect { slot, choice, index } => {
            let changed = state
                .team
                .get_mut(slot)
                .and_then(|entry| entry.moves.get_mut(choice))
                .map(|field| field.select(index))
                .unwrap_or(false);
            edited(state, changed)
        }

        // ===== Predict triggers =====
        Action::PredictRandom => DispatchResult::changed_with(send_current(state, Style::Random)),

        Action::PredictMostLikely => {
            DispatchResult::changed_with(send_current(state, Style::MostLikely))
        }

        // ===== UI =====
        Action::FocusNext => {
            state.focus_next();
            DispatchResult::changed()
        }

        Action::FocusPrev => {
            state.focus_prev();
            DispatchResult::changed()
        }

        Action::CursorMove(delta) => {
            if state.move_cursor(delta) {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::UiTerminalResize(width, height) => {
            state.terminal_size = (width, height);
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn send_current(state: &AppState, style: Style) -> Effect {
    Effect::Send {
        request: payload::request(state, style),
    }
}

fn select_in(field: Option<&mut SelectField>, index: usize) -> bool {
    field.map(|field| field.select(index)).unwrap_or(false)
}

/// Shared tail of every field edit: changed edits resend the snapshot.
fn edited(state: &AppState, changed: bool) -> DispatchResult<Effect> {
    if changed {
        DispatchResult::changed_with(send_current(state, Style::MostLikely))
    } else {
        DispatchResult::unchanged()
    }
}
