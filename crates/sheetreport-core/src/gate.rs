//! Which controls are usable for a given selection.

use serde::{Deserialize, Serialize};

use crate::selection::Selection;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    pub sheet_selector_enabled: bool,
    pub generate_enabled: bool,
}

/// Pure derivation, re-evaluated after every selection change.
///
/// A sheet is only ever set together with a file, so `generate_enabled`
/// implies `sheet_selector_enabled`.
pub fn evaluate(selection: &Selection) -> Gate {
    Gate {
        sheet_selector_enabled: selection.has_file(),
        generate_enabled: selection.has_sheet(),
    }
}
