//! Per-cycle events produced from the car state.
use strum_macros::{Display, EnumIter};

/// Semantic cruise control button.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ButtonType {
    AccelCruise,
    DecelCruise,
    GapAdjustCruise,
    Cancel,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ButtonEvent {
    pub button_type: ButtonType,
}

/// Advisory events raised by the car interface.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventName {
    /// Steering assist is unavailable below the platform's minimum steering speed.
    BelowSteerSpeed,
}

/// Edge triggered translation of a raw button code. Emits at most one event, for the newly pressed button, and only when the code changed since the previous cycle. Codes `lookup` does not know (including "no button") emit nothing.
pub fn create_button_events(cur_btn: u8, prev_btn: u8, lookup: impl Fn(u8) -> Option<ButtonType>) -> Vec<ButtonEvent> {
    if cur_btn == prev_btn {
        return vec![];
    }

    lookup(cur_btn)
        .map(|button_type| ButtonEvent { button_type })
        .into_iter()
        .collect()
}
