//! Wire shapes for the predictor protocol, and the roster serializer.
//!
//! Outbound payload fields mirror the active ruleset's capability flags: a
//! control that does not exist in the form produces no field at all.
//! Sentinel selections are filtered out, and numerals travel as strings.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::state::{AppState, Ruleset, SelectField, TeamSlot, NO_ITEM, NO_MOVE};

/// Requested prediction mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Style {
    #[serde(rename = "random")]
    Random,
    #[serde(rename = "most likely")]
    MostLikely,
}

/// One outbound request. `team` holds one payload per roster entry, in
/// display order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub generation: String,
    pub style: Style,
    pub team: Vec<TeamMemberPayload>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamMemberPayload {
    pub species: String,
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evs: Option<EvSpread>,
    pub moves: Vec<String>,
}

/// Always a complete six-stat block when present, even if all zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EvSpread {
    #[serde(rename = "HP")]
    pub hp: String,
    #[serde(rename = "Atk")]
    pub atk: String,
    #[serde(rename = "Def")]
    pub def: String,
    #[serde(rename = "SpA")]
    pub spa: String,
    #[serde(rename = "SpD")]
    pub spd: String,
    #[serde(rename = "Spe")]
    pub spe: String,
}

/// One inbound server message. A single frame may carry either field or
/// both; unknown fields are ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerPush {
    #[serde(default)]
    pub generations: Option<IndexMap<String, Ruleset>>,
    #[serde(default)]
    pub predicted: Option<String>,
}

/// Serialize the live roster into a request.
pub fn request(state: &AppState, style: Style) -> PredictionRequest {
    PredictionRequest {
        generation: state.generation.value().unwrap_or_default().to_string(),
        style,
        team: state.team.iter().map(member).collect(),
    }
}

/// Serialize one roster entry. Fields follow control presence; empty
/// selects (for example an ability list the species does not have) vanish
/// from the payload too.
pub fn member(slot: &TeamSlot) -> TeamMemberPayload {
    TeamMemberPayload {
        species: slot.species.value().unwrap_or_default().to_string(),
        level: slot.level.to_string(),
        item: slot
            .item
            .as_ref()
            .and_then(SelectField::value)
            .filter(|value| *value != NO_ITEM)
            .map(str::to_string),
        ability: slot
            .ability
            .as_ref()
            .and_then(SelectField::value)
            .map(str::to_string),
        nature: slot
            .nature
            .as_ref()
            .and_then(SelectField::value)
            .map(str::to_string),
        evs: slot.evs.as_ref().map(ev_spread),
        moves: slot
            .moves
            .iter()
            .filter_map(SelectField::value)
            .filter(|value| *value != NO_MOVE)
            .map(str::to_string)
            .collect(),
    }
}

fn ev_spread(evs: &[u16; 6]) -> EvSpread {
    EvSpread {
        hp: evs[0].to_string(),
        atk: evs[1].to_string(),
        def: evs[2].to_string(),
        spa: evs[3].to_string(),
        spd: evs[4].to_string(),
        spe: evs[5].to_string(),
    }
}
