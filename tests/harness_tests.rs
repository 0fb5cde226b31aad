//! Store flow tests using EffectStoreTestHarness
//!
//! These walk the full loop: a server push lands, the roster changes,
//! and every change ships a fresh snapshot back out.

use indexmap::IndexMap;
use teamtui::{
    action::Action,
    components::{Component, TeamPanel, TeamPanelProps},
    effect::Effect,
    payload::{ServerPush, Style},
    reducer::reducer,
    state::{AppState, Ruleset, SpeciesData, MAX_TEAM_SIZE},
};
use tui_dispatch::testing::*;
use tui_dispatch::NumericComponentId;

fn rulesets() -> IndexMap<String, Ruleset> {
    let mut gen1_pokemon = IndexMap::new();
    gen1_pokemon.insert(
        "Mew".to_string(),
        SpeciesData {
            abilities: None,
            moves: vec!["Pound".to_string(), "Psychic".to_string()],
        },
    );
    gen1_pokemon.insert(
        "Snorlax".to_string(),
        SpeciesData {
            abilities: None,
            moves: vec!["Body Slam".to_string(), "Rest".to_string()],
        },
    );
    let mut gen6_pokemon = IndexMap::new();
    gen6_pokemon.insert(
        "Pikachu".to_string(),
        SpeciesData {
            abilities: Some(vec!["Static".to_string()]),
            moves: vec!["Thunderbolt".to_string()],
        },
    );
    let mut rulesets = IndexMap::new();
    rulesets.insert(
        "1".to_string(),
        Ruleset {
            pokemon: gen1_pokemon,
            items: None,
            natures: None,
        },
    );
    rulesets.insert(
        "6".to_string(),
        Ruleset {
            pokemon: gen6_pokemon,
            items: Some(vec!["Light Ball".to_string()]),
            natures: Some(vec!["Hardy".to_string()]),
        },
    );
    rulesets
}

fn generations_push() -> Action {
    Action::ChannelDidLoad(ServerPush {
        generations: Some(rulesets()),
        predicted: None,
    })
}

fn predicted_push(text: &str) -> Action {
    Action::ChannelDidLoad(ServerPush {
        generations: None,
        predicted: Some(text.to_string()),
    })
}

#[test]
fn test_init_and_ingest_flow() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::Init);
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::Listen));

    harness.dispatch_collect(generations_push());
    harness.assert_state(|s| s.rulesets.len() == 2);
    harness.assert_state(|s| s.generation.value() == Some("1"));
    harness.assert_state(|s| s.team.is_empty());

    // Snapshot first, then the listener re-arms.
    let effects = harness.drain_effects();
    effects.effects_count(2);
    effects.effects_first_matches(
        |e| matches!(e, Effect::Send { request } if request.style == Style::MostLikely),
    );
}

#[test]
fn test_predicted_text_last_write_wins() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(predicted_push("Alakazam / Snorlax / Tauros"));
    harness.dispatch_collect(predicted_push("Starmie / Chansey / Exeggutor"));

    harness.assert_state(|s| s.predicted.as_deref() == Some("Starmie / Chansey / Exeggutor"));
}

#[test]
fn test_combined_push_ingests_and_displays() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    // One frame may carry both fields; both land in the same reduction.
    harness.dispatch_collect(Action::ChannelDidLoad(ServerPush {
        generations: Some(rulesets()),
        predicted: Some("Tauros / Chansey / Snorlax".to_string()),
    }));

    harness.assert_state(|s| s.rulesets.len() == 2);
    harness.assert_state(|s| s.generation.value() == Some("1"));
    harness.assert_state(|s| s.team.is_empty());
    harness.assert_state(|s| s.predicted.as_deref() == Some("Tauros / Chansey / Snorlax"));

    // The defaulted snapshot goes out first, then the listener re-arms.
    let effects = harness.drain_effects();
    effects.effects_count(2);
    effects.effects_first_matches(
        |e| matches!(e, Effect::Send { request } if request.style == Style::MostLikely && request.generation == "1"),
    );
    effects.effects_all_match(|e| matches!(e, Effect::Send { .. } | Effect::Listen));
}

#[test]
fn test_roster_cap_flow() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(generations_push());

    for _ in 0..MAX_TEAM_SIZE {
        harness.dispatch_collect(Action::SlotAdd);
    }
    harness.assert_state(|s| s.team.len() == MAX_TEAM_SIZE);
    harness.drain_effects();

    // The seventh add is refused outright: no state change, no send.
    harness.dispatch_collect(Action::SlotAdd);
    harness.assert_state(|s| s.team.len() == MAX_TEAM_SIZE);
    let effects = harness.drain_effects();
    effects.effects_empty();
}

#[test]
fn test_generation_switch_resets_roster() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(generations_push());
    harness.dispatch_collect(Action::SlotAdd);
    harness.drain_effects();

    harness.dispatch_collect(Action::GenerationSelect(1));
    harness.assert_state(|s| s.generation.value() == Some("6"));
    harness.assert_state(|s| s.team.is_empty());

    // The switch still reports the now-empty roster to the server.
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_all_match(
        |e| matches!(e, Effect::Send { request } if request.generation == "6" && request.team.is_empty()),
    );
}

#[test]
fn test_channel_close_is_silent() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(generations_push());
    harness.dispatch_collect(predicted_push("Alakazam"));
    harness.drain_effects();

    harness.dispatch_collect(Action::ChannelDidClose);
    harness.assert_state(|s| s.predicted.as_deref() == Some("Alakazam"));
    let effects = harness.drain_effects();
    effects.effects_empty();
}

#[test]
fn test_keyboard_edit_resends_snapshot() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    let mut component = TeamPanel;

    harness.dispatch_collect(generations_push());
    harness.dispatch_collect(Action::SlotAdd);
    harness.drain_effects();

    // Cursor sits on the new entry's species row; step to the next species.
    let actions = harness.send_keys::<NumericComponentId, _, _>("l", |state, event| {
        let props = TeamPanelProps {
            state,
            is_focused: true,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });
    actions.assert_count(1);
    actions.assert_first(Action::SpeciesSelect { slot: 0, index: 1 });

    for action in actions {
        harness.dispatch_collect(action);
    }
    harness.assert_state(|s| s.team[0].species.value() == Some("Snorlax"));

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_all_match(|e| matches!(e, Effect::Send { .. }));
}

#[test]
fn test_render_roster_through_harness() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    let mut component = TeamPanel;

    harness.dispatch_collect(generations_push());
    harness.dispatch_collect(Action::SlotAdd);

    let output = harness.render_plain(60, 24, |frame, area, state| {
        let props = TeamPanelProps {
            state,
            is_focused: true,
        };
        component.render(frame, area, props);
    });

    assert!(output.contains("1. Mew"), "Roster should list the entry:\n{output}");
    assert!(output.contains("Level"), "Entry fields should be visible:\n{output}");
}

#[test]
fn test_multiple_async_completions() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.complete_action(generations_push());
    harness.complete_action(predicted_push("Starmie"));

    let (changed, total) = harness.process_emitted();
    assert_eq!(total, 2);
    assert_eq!(changed, 2);

    harness.assert_state(|s| s.rulesets.len() == 2);
    harness.assert_state(|s| s.predicted.as_deref() == Some("Starmie"));
}
