// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use strum_macros::{Display, EnumIter};

/// A button that changes what other controls do while it's held.
#[derive(
    Clone, Copy, Debug, Display, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Modifier {
    #[allow(missing_docs)]
    Shift,
    #[allow(missing_docs)]
    Select,
    #[allow(missing_docs)]
    Delete,
    #[allow(missing_docs)]
    Duplicate,
}

/// What a button does. Device profiles assign one to each button.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ButtonAction {
    /// Makes the mode active.
    SetMode(ModeId),
    /// Lays the mode over the active one while the button is held.
    MomentaryMode(ModeId),
    /// Makes the view active.
    SetView(ViewId),
    /// Lays the view over the active one while the button is held.
    MomentaryView(ViewId),
    /// Cycles the effective view's grid mode.
    ToggleGridMode,
    /// Scene button `k`, handled by views that care.
    SceneButton(usize),
    /// Switches the mixer modes between instrument and effect tracks.
    ToggleEffectBank,
    /// Sends a transport command to the DAW.
    Transport(TransportCommand),
    /// Acts as a modifier.
    Modifier(Modifier),
}

/// One held button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonPress {
    pressed_at: Instant,
    is_consumed: bool,
}
impl ButtonPress {
    #[allow(missing_docs)]
    pub fn pressed_at(&self) -> Instant {
        self.pressed_at
    }

    /// True if the button took part in a combination while it was held, in
    /// which case its own release action shouldn't run.
    pub fn is_consumed(&self) -> bool {
        self.is_consumed
    }
}

/// Which buttons are held, and which of them are modifiers.
#[derive(Debug, Default)]
pub struct ButtonStates {
    pressed: FxHashMap<ControlId, ButtonPress>,
    modifiers: FxHashMap<Modifier, ControlId>,
}
impl ButtonStates {
    /// Declares that `control` acts as `modifier`.
    pub fn assign_modifier(&mut self, modifier: Modifier, control: ControlId) {
        self.modifiers.insert(modifier, control);
    }

    /// The button that acts as `modifier`.
    pub fn modifier_control(&self, modifier: Modifier) -> Option<ControlId> {
        self.modifiers.get(&modifier).copied()
    }

    #[allow(missing_docs)]
    pub fn press(&mut self, control: ControlId, now: Instant) {
        self.pressed.insert(
            control,
            ButtonPress {
                pressed_at: now,
                is_consumed: false,
            },
        );
    }

    /// Forgets a held button, returning how it was held.
    pub fn release(&mut self, control: ControlId) -> Option<ButtonPress> {
        self.pressed.remove(&control)
    }

    #[allow(missing_docs)]
    pub fn is_pressed(&self, control: ControlId) -> bool {
        self.pressed.contains_key(&control)
    }

    /// Whether `modifier` is held, without consuming it.
    pub fn is_modifier_held(&self, modifier: Modifier) -> bool {
        self.modifier_control(modifier)
            .is_some_and(|control| self.is_pressed(control))
    }

    /// Whether `modifier` is held. If it is, the modifier counts as used, and
    /// its own release action is skipped.
    pub fn is_combination(&mut self, modifier: Modifier) -> bool {
        let Some(control) = self.modifier_control(modifier) else {
            return false;
        };
        match self.pressed.get_mut(&control) {
            Some(press) => {
                press.is_consumed = true;
                true
            }
            None => false,
        }
    }
}
