//! Conditional Validator
//!
//! Save-readiness is a pure function of the current state: merit record,
//! six selections, admission mode and (for non-direct classes) bank details.

use serde::Serialize;

use super::{BankAccountDetails, BankField, MeritMaster};
use crate::selection::{SelectionCache, SelectionLevel};

/// One reason the save action is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SaveBlocker {
    MeritNotLoaded,
    MissingSelection(SelectionLevel),
    AdmissionModeUnknown,
    MissingBankField(BankField),
}

impl std::fmt::Display for SaveBlocker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveBlocker::MeritNotLoaded => write!(f, "merit record not loaded"),
            SaveBlocker::MissingSelection(level) => write!(f, "{} not selected", level),
            SaveBlocker::AdmissionModeUnknown => write!(f, "class admission mode not resolved"),
            SaveBlocker::MissingBankField(field) => write!(f, "{} is empty", field),
        }
    }
}

/// Everything standing between the current state and a save, in form order.
pub fn blockers(
    merit: Option<&MeritMaster>,
    selections: &SelectionCache,
    bank: &BankAccountDetails,
) -> Vec<SaveBlocker> {
    let mut out = Vec::new();

    if merit.is_none() {
        out.push(SaveBlocker::MeritNotLoaded);
    }

    out.extend(
        selections
            .missing_levels()
            .into_iter()
            .map(SaveBlocker::MissingSelection),
    );

    match selections.class_is_direct() {
        None => out.push(SaveBlocker::AdmissionModeUnknown),
        Some(false) => out.extend(
            bank.missing_fields()
                .into_iter()
                .map(SaveBlocker::MissingBankField),
        ),
        Some(true) => {}
    }

    out
}

pub fn can_save(
    merit: Option<&MeritMaster>,
    selections: &SelectionCache,
    bank: &BankAccountDetails,
) -> bool {
    blockers(merit, selections, bank).is_empty()
}
