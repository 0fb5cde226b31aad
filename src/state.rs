//! Application state - single source of truth

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tui_dispatch_debug::debug::{DebugSection, DebugState, ron_string};

use crate::options;

pub const MAX_TEAM_SIZE: usize = 6;
pub const MOVE_SLOTS: usize = 4;
pub const LEVEL_MIN: u16 = 1;
pub const LEVEL_MAX: u16 = 100;
pub const DEFAULT_LEVEL: u16 = 100;
pub const EV_MAX: u16 = 252;
pub const DEFAULT_NATURE: &str = "Hardy";
pub const DEFAULT_GENERATION: &str = "1";

/// Sentinel options meaning "field unset"; filtered out of payloads.
pub const NO_ITEM: &str = "Select item";
pub const NO_MOVE: &str = "Select move";

/// EV stat labels in wire order.
pub const STAT_NAMES: [&str; 6] = ["HP", "Atk", "Def", "SpA", "SpD", "Spe"];

/// One species' allowed abilities and moves, as pushed by the server.
/// A missing ability list means the ruleset has no ability mechanic.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeciesData {
    #[serde(default)]
    pub abilities: Option<Vec<String>>,
    #[serde(default)]
    pub moves: Vec<String>,
}

/// Everything one generation allows. The optional fields double as
/// capability flags: their absence disables whole form sections.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ruleset {
    #[serde(default)]
    pub pokemon: IndexMap<String, SpeciesData>,
    #[serde(default)]
    pub items: Option<Vec<String>>,
    #[serde(default)]
    pub natures: Option<Vec<String>>,
}

/// Capability flags derived once per ruleset. A `natures` list implies the
/// ability and EV mechanics as well, so those three share one flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub has_items: bool,
    pub has_natures_and_abilities: bool,
}

impl Ruleset {
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            has_items: self.items.is_some(),
            has_natures_and_abilities: self.natures.is_some(),
        }
    }
}

/// A select control: an ordered option set plus the selected index.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectField {
    pub options: Vec<String>,
    pub selected: usize,
}

impl SelectField {
    pub fn new(options: Vec<String>) -> Self {
        Self {
            options,
            selected: 0,
        }
    }

    /// Like [`SelectField::new`] but starts on `value` when present,
    /// falling back to the first option.
    pub fn with_value(options: Vec<String>, value: &str) -> Self {
        let selected = options
            .iter()
            .position(|option| option == value)
            .unwrap_or(0);
        Self { options, selected }
    }

    /// Currently selected option, `None` when the option set is empty.
    pub fn value(&self) -> Option<&str> {
        self.options.get(self.selected).map(String::as_str)
    }

    /// Move the selection to `index`. Returns whether anything changed;
    /// out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.options.len() || index == self.selected {
            return false;
        }
        self.selected = index;
        true
    }

    /// Index `delta` steps away from the current selection, clamped to the
    /// option range. `None` when that is not a different index.
    pub fn step(&self, delta: i16) -> Option<usize> {
        if self.options.is_empty() {
            return None;
        }
        let max = self.options.len() - 1;
        let next = if delta.is_negative() {
            self.selected.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            (self.selected + delta as usize).min(max)
        };
        (next != self.selected).then_some(next)
    }

    /// Swap in a whole new option set. The selection resets to the first
    /// option, matching a rebuilt control.
    pub fn replace_options(&mut self, options: Vec<String>) {
        self.options = options;
        self.selected = 0;
    }
}

/// One addressable row of a team slot's form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotField {
    Species,
    Level,
    Item,
    Ability,
    Nature,
    Ev(usize),
    Move(usize),
}

/// One roster entry. The optional fields exist iff the ruleset's
/// capability flags enable them; `moves` always holds [`MOVE_SLOTS`]
/// selects.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamSlot {
    pub species: SelectField,
    pub level: u16,
    pub item: Option<SelectField>,
    pub ability: Option<SelectField>,
    pub nature: Option<SelectField>,
    pub evs: Option<[u16; 6]>,
    pub moves: Vec<SelectField>,
}

impl TeamSlot {
    /// Build a fresh entry from the ruleset's capability flags, defaulting
    /// the species to the catalog's first key.
    pub fn build(ruleset: &Ruleset) -> Self {
        let capabilities = ruleset.capabilities();
        let species = SelectField::new(options::species_options(&ruleset.pokemon));
        let fallback = SpeciesData::default();
        let descriptor = species
            .value()
            .and_then(|name| ruleset.pokemon.get(name))
            .unwrap_or(&fallback);

        let moves = (0..MOVE_SLOTS)
            .map(|_| SelectField::new(options::move_options(descriptor)))
            .collect();

        Self {
            item: capabilities.has_items.then(|| {
                SelectField::new(options::item_options(
                    ruleset.items.as_deref().unwrap_or_default(),
                ))
            }),
            ability: capabilities
                .has_natures_and_abilities
                .then(|| SelectField::new(options::ability_options(descriptor))),
            nature: capabilities.has_natures_and_abilities.then(|| {
                SelectField::with_value(
                    options::nature_options(ruleset.natures.as_deref().unwrap_or_default()),
                    DEFAULT_NATURE,
                )
            }),
            evs: capabilities.has_natures_and_abilities.then(|| [0; 6]),
            species,
            level: DEFAULT_LEVEL,
            moves,
        }
    }

    /// Select a different species and refresh the dependent controls: the
    /// ability and move option sets are replaced with the new species'
    /// lists. Level, item, nature, and EVs stay untouched.
    pub fn change_species(&mut self, ruleset: &Ruleset, index: usize) -> bool {
        if !self.species.select(index) {
            return false;
        }
        let fallback = SpeciesData::default();
        let descriptor = self
            .species
            .value()
            .and_then(|name| ruleset.pokemon.get(name))
            .unwrap_or(&fallback);
        if let Some(ability) = self.ability.as_mut() {
            ability.replace_options(options::ability_options(descriptor));
        }
        for choice in &mut self.moves {
            choice.replace_options(options::move_options(descriptor));
        }
        true
    }

    /// The slot's present fields in display order.
    pub fn fields(&self) -> Vec<SlotField> {
        let mut fields = vec![SlotField::Species, SlotField::Level];
        if self.item.is_some() {
            fields.push(SlotField::Item);
        }
        if self.ability.is_some() {
            fields.push(SlotField::Ability);
        }
        if self.nature.is_some() {
            fields.push(SlotField::Nature);
        }
        if self.evs.is_some() {
            for stat in 0..STAT_NAMES.len() {
                fields.push(SlotField::Ev(stat));
            }
        }
        for choice in 0..self.moves.len() {
            fields.push(SlotField::Move(choice));
        }
        fields
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusArea {
    Generation,
    #[default]
    Team,
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppState {
    /// Generation label -> ruleset, in server-sent order.
    pub rulesets: IndexMap<String, Ruleset>,
    /// Generation selector over the ruleset labels.
    pub generation: SelectField,
    /// The roster, at most [`MAX_TEAM_SIZE`] entries.
    pub team: Vec<TeamSlot>,
    /// Linear row index over all present fields of all slots.
    pub cursor: usize,
    pub focus: FocusArea,
    /// Latest prediction text from the server, shown verbatim.
    pub predicted: Option<String>,
    pub terminal_size: (u16, u16),
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            rulesets: IndexMap::new(),
            generation: SelectField::default(),
            team: Vec::new(),
            cursor: 0,
            focus: FocusArea::default(),
            predicted: None,
            terminal_size: (80, 24),
        }
    }
}

impl AppState {
    /// Replace the whole ruleset mapping, repopulate the generation
    /// selector (label "1" preferred, else the first key), and drop the
    /// roster, which the new mapping invalidates.
    pub fn ingest(&mut self, rulesets: IndexMap<String, Ruleset>) {
        self.rulesets = rulesets;
        self.generation = SelectField::with_value(
            options::generation_options(&self.rulesets),
            DEFAULT_GENERATION,
        );
        self.clear_team();
    }

    pub fn clear_team(&mut self) {
        self.team.clear();
        self.cursor = 0;
    }

    pub fn active_ruleset(&self) -> Option<&Ruleset> {
        self.generation
            .value()
            .and_then(|label| self.rulesets.get(label))
    }

    pub fn capabilities(&self) -> Option<Capabilities> {
        self.active_ruleset().map(Ruleset::capabilities)
    }

    pub fn can_add_slot(&self) -> bool {
        self.team.len() < MAX_TEAM_SIZE
    }

    pub fn total_rows(&self) -> usize {
        self.team.iter().map(|slot| slot.fields().len()).sum()
    }

    /// Resolve the cursor to (slot index, field), `None` on an empty team.
    pub fn cursor_position(&self) -> Option<(usize, SlotField)> {
        let mut row = self.cursor;
        for (index, slot) in self.team.iter().enumerate() {
            let fields = slot.fields();
            if row < fields.len() {
                return Some((index, fields[row]));
            }
            row -= fields.len();
        }
        None
    }

    /// Move the field cursor, clamped to the flattened row range.
    pub fn move_cursor(&mut self, delta: i16) -> bool {
        let total = self.total_rows();
        if total == 0 {
            return false;
        }
        let max = total - 1;
        let current = self.cursor.min(max);
        let next = if delta.is_negative() {
            current.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            (current + delta as usize).min(max)
        };
        if next != self.cursor {
            self.cursor = next;
            true
        } else {
            false
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            FocusArea::Generation => FocusArea::Team,
            FocusArea::Team => FocusArea::Generation,
        };
    }

    pub fn focus_prev(&mut self) {
        // Two areas, so previous and next coincide.
        self.focus_next();
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Rulesets")
                .entry(
                    "generations",
                    ron_string(&self.rulesets.keys().cloned().collect::<Vec<_>>()),
                )
                .entry("active", ron_string(&self.generation.value()))
                .entry("capabilities", ron_string(&self.capabilities())),
            DebugSection::new("Roster")
                .entry("slots", ron_string(&self.team.len()))
                .entry("can_add", ron_string(&self.can_add_slot()))
                .entry("cursor", ron_string(&self.cursor))
                .entry("focus", ron_string(&self.focus)),
            DebugSection::new("Channel").entry("predicted", ron_string(&self.predicted)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_ruleset() -> Ruleset {
        let mut pokemon = IndexMap::new();
        pokemon.insert(
            "Mew".to_string(),
            SpeciesData {
                abilities: None,
                moves: vec!["Pound".to_string(), "Psychic".to_string()],
            },
        );
        Ruleset {
            pokemon,
            items: None,
            natures: None,
        }
    }

    fn full_ruleset() -> Ruleset {
        let mut pokemon = IndexMap::new();
        pokemon.insert(
            "Pikachu".to_string(),
            SpeciesData {
                abilities: Some(vec!["Static".to_string()]),
                moves: vec!["Thunderbolt".to_string()],
            },
        );
        pokemon.insert(
            "Eevee".to_string(),
            SpeciesData {
                abilities: Some(vec!["Run Away".to_string(), "Adaptability".to_string()]),
                moves: vec!["Tackle".to_string(), "Bite".to_string()],
            },
        );
        Ruleset {
            pokemon,
            items: Some(vec!["Light Ball".to_string()]),
            natures: Some(vec!["Hardy".to_string(), "Timid".to_string()]),
        }
    }

    #[test]
    fn test_capabilities_follow_field_presence() {
        assert_eq!(
            bare_ruleset().capabilities(),
            Capabilities {
                has_items: false,
                has_natures_and_abilities: false,
            }
        );
        assert_eq!(
            full_ruleset().capabilities(),
            Capabilities {
                has_items: true,
                has_natures_and_abilities: true,
            }
        );
    }

    #[test]
    fn test_build_without_natures_skips_gated_controls() {
        let slot = TeamSlot::build(&bare_ruleset());

        assert_eq!(slot.species.value(), Some("Mew"));
        assert_eq!(slot.level, DEFAULT_LEVEL);
        assert!(slot.item.is_none());
        assert!(slot.ability.is_none());
        assert!(slot.nature.is_none());
        assert!(slot.evs.is_none());
        assert_eq!(slot.moves.len(), MOVE_SLOTS);
        for choice in &slot.moves {
            assert_eq!(choice.value(), Some(NO_MOVE));
            assert_eq!(choice.options.len(), 3);
        }
    }

    #[test]
    fn test_build_with_natures_defaults() {
        let slot = TeamSlot::build(&full_ruleset());

        assert_eq!(slot.species.value(), Some("Pikachu"));
        assert_eq!(
            slot.item.as_ref().and_then(SelectField::value),
            Some(NO_ITEM)
        );
        assert_eq!(
            slot.ability.as_ref().and_then(SelectField::value),
            Some("Static")
        );
        assert_eq!(
            slot.nature.as_ref().and_then(SelectField::value),
            Some(DEFAULT_NATURE)
        );
        assert_eq!(slot.evs, Some([0; 6]));
    }

    #[test]
    fn test_change_species_refreshes_dependent_controls() {
        let ruleset = full_ruleset();
        let mut slot = TeamSlot::build(&ruleset);
        if let Some(item) = slot.item.as_mut() {
            item.select(1);
        }
        slot.level = 42;
        if let Some(evs) = slot.evs.as_mut() {
            evs[0] = 12;
        }

        assert!(slot.change_species(&ruleset, 1));

        assert_eq!(slot.species.value(), Some("Eevee"));
        assert_eq!(
            slot.ability.as_ref().map(|field| field.options.clone()),
            Some(vec!["Run Away".to_string(), "Adaptability".to_string()])
        );
        for choice in &slot.moves {
            assert_eq!(
                choice.options,
                vec![
                    NO_MOVE.to_string(),
                    "Tackle".to_string(),
                    "Bite".to_string()
                ]
            );
            assert_eq!(choice.selected, 0);
        }
        // Everything else survives the swap.
        assert_eq!(slot.level, 42);
        assert_eq!(
            slot.item.as_ref().and_then(SelectField::value),
            Some("Light Ball")
        );
        assert_eq!(
            slot.nature.as_ref().and_then(SelectField::value),
            Some(DEFAULT_NATURE)
        );
        assert_eq!(slot.evs.map(|evs| evs[0]), Some(12));
    }

    #[test]
    fn test_change_species_to_same_index_is_noop() {
        let ruleset = full_ruleset();
        let mut slot = TeamSlot::build(&ruleset);
        assert!(!slot.change_species(&ruleset, 0));
    }

    #[test]
    fn test_build_with_empty_catalog_stays_permissive() {
        let slot = TeamSlot::build(&Ruleset::default());
        assert_eq!(slot.species.value(), None);
        assert_eq!(slot.moves.len(), MOVE_SLOTS);
        for choice in &slot.moves {
            assert_eq!(choice.value(), Some(NO_MOVE));
        }
    }

    #[test]
    fn test_select_field_step_clamps() {
        let field = SelectField::new(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(field.step(-1), None);
        assert_eq!(field.step(1), Some(1));
        assert_eq!(field.step(5), Some(2));

        let empty = SelectField::default();
        assert_eq!(empty.step(1), None);
        assert_eq!(empty.value(), None);
    }

    #[test]
    fn test_select_field_with_value_falls_back_to_first() {
        let field = SelectField::with_value(vec!["2".into(), "3".into()], "1");
        assert_eq!(field.value(), Some("2"));
        let field = SelectField::with_value(vec!["1".into(), "2".into()], "1");
        assert_eq!(field.value(), Some("1"));
    }

    #[test]
    fn test_ingest_prefers_generation_one() {
        let mut state = AppState::default();
        let mut rulesets = IndexMap::new();
        rulesets.insert("6".to_string(), full_ruleset());
        rulesets.insert("1".to_string(), bare_ruleset());

        state.ingest(rulesets);

        assert_eq!(state.generation.value(), Some("1"));
        assert!(state.team.is_empty());

        let mut rulesets = IndexMap::new();
        rulesets.insert("6".to_string(), full_ruleset());
        state.ingest(rulesets);
        assert_eq!(state.generation.value(), Some("6"));
    }

    #[test]
    fn test_cursor_walks_across_slots() {
        let mut state = AppState::default();
        let mut rulesets = IndexMap::new();
        rulesets.insert("1".to_string(), bare_ruleset());
        state.ingest(rulesets);
        state.team.push(TeamSlot::build(&bare_ruleset()));
        state.team.push(TeamSlot::build(&bare_ruleset()));

        // Species + level + four moves per bare-ruleset slot.
        assert_eq!(state.total_rows(), 12);
        assert_eq!(state.cursor_position(), Some((0, SlotField::Species)));

        assert!(state.move_cursor(6));
        assert_eq!(state.cursor_position(), Some((1, SlotField::Species)));

        assert!(state.move_cursor(100));
        assert_eq!(state.cursor_position(), Some((1, SlotField::Move(3))));
        assert!(!state.move_cursor(1));

        state.clear_team();
        assert_eq!(state.cursor, 0);
        assert!(!state.move_cursor(1));
        assert_eq!(state.cursor_position(), None);
    }
}
