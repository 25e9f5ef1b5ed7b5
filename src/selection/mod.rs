//! Selection Module
//!
//! The six-level enrollment dependency chain:
//! Taluka → Institute → Section → Course → Class → Medium.
//! Each level holds a chosen value and the option list fetched for the
//! current upstream context.

mod cache;
mod options;
mod resolver;

pub use cache::SelectionCache;
pub use resolver::{DependencyResolver, Resolution};

use serde::{Deserialize, Serialize};

/// One step in the enrollment dependency chain, in dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionLevel {
    Taluka,
    Institute,
    Section,
    Course,
    Class,
    Medium,
}

impl SelectionLevel {
    pub const ALL: [SelectionLevel; 6] = [
        SelectionLevel::Taluka,
        SelectionLevel::Institute,
        SelectionLevel::Section,
        SelectionLevel::Course,
        SelectionLevel::Class,
        SelectionLevel::Medium,
    ];

    /// Zero-based position in the chain.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The level whose options depend on this one, if any.
    pub fn next(self) -> Option<SelectionLevel> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// This level and every level after it.
    pub fn from_here(self) -> impl Iterator<Item = SelectionLevel> {
        Self::ALL.into_iter().skip(self.index())
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    /// Human label used in prompts and messages.
    pub fn label(self) -> &'static str {
        match self {
            SelectionLevel::Taluka => "Taluka",
            SelectionLevel::Institute => "Institute",
            SelectionLevel::Section => "Section",
            SelectionLevel::Course => "Course",
            SelectionLevel::Class => "Class",
            SelectionLevel::Medium => "Medium",
        }
    }
}

impl std::fmt::Display for SelectionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A dropdown entry: what the user sees and the key sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Snapshot of one level as the UI renders it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelState {
    pub value: Option<String>,
    pub options: Vec<SelectOption>,
    pub loading: bool,
}

impl LevelState {
    pub fn is_selected(&self) -> bool {
        self.value.as_deref().is_some_and(|v| !v.trim().is_empty())
    }

    /// Label of the currently selected option, if it is among the options.
    pub fn selected_label(&self) -> Option<&str> {
        let value = self.value.as_deref()?;
        self.options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }
}
