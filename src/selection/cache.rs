//! Selection Cache
//!
//! Owned state for the six selection levels plus the derived class admission
//! mode. Every mutation of a level bumps its generation so that in-flight
//! fetches can tell whether the context they were issued for still holds.

use serde::{Deserialize, Serialize};

use super::{LevelState, SelectOption, SelectionLevel};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct LevelSlot {
    state: LevelState,
    generation: u64,
}

/// Current value and option list for every level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionCache {
    levels: [LevelSlot; 6],
    class_is_direct: Option<bool>,
}

impl SelectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, level: SelectionLevel) -> &LevelSlot {
        &self.levels[level.index()]
    }

    fn slot_mut(&mut self, level: SelectionLevel) -> &mut LevelSlot {
        &mut self.levels[level.index()]
    }

    pub fn level(&self, level: SelectionLevel) -> &LevelState {
        &self.slot(level).state
    }

    /// Selected value, with blanks treated as unset.
    pub fn value(&self, level: SelectionLevel) -> Option<&str> {
        self.slot(level)
            .state
            .value
            .as_deref()
            .filter(|v| !v.trim().is_empty())
    }

    pub fn options(&self, level: SelectionLevel) -> &[SelectOption] {
        &self.slot(level).state.options
    }

    /// Monotonic counter bumped whenever the level's value or options are reset.
    pub fn generation(&self, level: SelectionLevel) -> u64 {
        self.slot(level).generation
    }

    /// Set the value at `level` and return the new generation.
    /// Blank input is stored as unset.
    pub fn set_value(&mut self, level: SelectionLevel, value: Option<String>) -> u64 {
        let slot = self.slot_mut(level);
        slot.state.value = value.filter(|v| !v.trim().is_empty());
        slot.generation += 1;
        slot.generation
    }

    /// Replace the option list at `level`.
    ///
    /// Loading a non-empty Medium list while no Medium is chosen selects the
    /// first entry. Returns `true` when that auto-selection happened.
    pub fn set_options(&mut self, level: SelectionLevel, options: Vec<SelectOption>) -> bool {
        let slot = self.slot_mut(level);
        slot.state.options = options;
        slot.state.loading = false;

        if level != SelectionLevel::Medium || self.value(level).is_some() {
            return false;
        }

        let first = self.options(level).first().map(|o| o.value.clone());
        match first {
            Some(value) => {
                self.slot_mut(level).state.value = Some(value);
                true
            }
            None => false,
        }
    }

    pub fn set_loading(&mut self, level: SelectionLevel, loading: bool) {
        self.slot_mut(level).state.loading = loading;
    }

    /// Clear `level` and everything downstream of it.
    /// Also forgets the admission mode when `level` is at or above Class.
    pub fn clear_from(&mut self, level: SelectionLevel) {
        for l in level.from_here() {
            let slot = self.slot_mut(l);
            slot.state = LevelState::default();
            slot.generation += 1;
        }
        if level <= SelectionLevel::Class {
            self.class_is_direct = None;
        }
    }

    pub fn class_is_direct(&self) -> Option<bool> {
        self.class_is_direct
    }

    pub fn set_class_is_direct(&mut self, direct: Option<bool>) {
        self.class_is_direct = direct;
    }

    /// True when every level holds a non-blank value.
    pub fn all_selected(&self) -> bool {
        SelectionLevel::ALL.iter().all(|l| self.value(*l).is_some())
    }

    /// Levels still lacking a value, in chain order.
    pub fn missing_levels(&self) -> Vec<SelectionLevel> {
        SelectionLevel::ALL
            .into_iter()
            .filter(|l| self.value(*l).is_none())
            .collect()
    }
}
