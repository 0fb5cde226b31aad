//! Actions - every way the state is allowed to change

use serde::{Deserialize, Serialize};

use crate::payload::ServerPush;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    Init,

    // ===== Channel =====
    /// One inbound server message, already parsed.
    ChannelDidLoad(ServerPush),
    /// The connection is gone. No reconnect is attempted.
    ChannelDidClose,

    // ===== Roster structure =====
    GenerationSelect(usize),
    SlotAdd,
    TeamClear,

    // ===== Entry fields =====
    SpeciesSelect { slot: usize, index: usize },
    LevelSet { slot: usize, level: u16 },
    ItemSelect { slot: usize, index: usize },
    AbilitySelect { slot: usize, index: usize },
    NatureSelect { slot: usize, index: usize },
    EvSet { slot: usize, stat: usize, value: u16 },
    MoveSelect { slot: usize, choice: usize, index: usize },

    // ===== Predict triggers =====
    PredictRandom,
    PredictMostLikely,

    // ===== UI =====
    FocusNext,
    FocusPrev,
    CursorMove(i16),
    UiTerminalResize(u16, u16),

    Quit,
}
