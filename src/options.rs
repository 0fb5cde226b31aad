//! Pure option-set derivations for every select control.
//!
//! Each function returns the complete ordered option list for one control
//! kind; callers apply it with [`SelectField::replace_options`] or feed it
//! to a fresh field. Sentinel handling lives here and nowhere else.
//!
//! [`SelectField::replace_options`]: crate::state::SelectField::replace_options

use indexmap::IndexMap;

use crate::state::{Ruleset, SpeciesData, NO_ITEM, NO_MOVE};

pub fn generation_options(rulesets: &IndexMap<String, Ruleset>) -> Vec<String> {
    rulesets.keys().cloned().collect()
}

pub fn species_options(catalog: &IndexMap<String, SpeciesData>) -> Vec<String> {
    catalog.keys().cloned().collect()
}

/// Item options lead with the "no item" sentinel.
pub fn item_options(items: &[String]) -> Vec<String> {
    let mut options = Vec::with_capacity(items.len() + 1);
    options.push(NO_ITEM.to_string());
    options.extend(items.iter().cloned());
    options
}

pub fn ability_options(species: &SpeciesData) -> Vec<String> {
    species.abilities.clone().unwrap_or_default()
}

pub fn nature_options(natures: &[String]) -> Vec<String> {
    natures.to_vec()
}

/// Move options lead with the "no move" sentinel.
pub fn move_options(species: &SpeciesData) -> Vec<String> {
    let mut options = Vec::with_capacity(species.moves.len() + 1);
    options.push(NO_MOVE.to_string());
    options.extend(species.moves.iter().cloned());
    options
}
