// Copyright (c) 2024 Mike Tsao

use super::{BankRef, Signal};
use crate::types::u7;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumCount, EnumIter};

/// Host-wide transport actions a button can trigger.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransportCommand {
    #[allow(missing_docs)]
    Play,
    #[allow(missing_docs)]
    Stop,
    #[allow(missing_docs)]
    Record,
    #[allow(missing_docs)]
    ToggleLoop,
    #[allow(missing_docs)]
    ToggleMetronome,
}

/// What a clip slot currently holds and is doing.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, EnumCount, EnumIter)]
pub enum SlotState {
    /// No clip.
    #[default]
    Empty,
    /// A clip that isn't playing.
    Stopped,
    #[allow(missing_docs)]
    Playing,
    #[allow(missing_docs)]
    Recording,
    /// Launched, waiting for the next quantization boundary.
    Queued,
}

/// The state of one cell of the step sequencer.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq)]
pub enum StepState {
    /// No note starts here.
    #[default]
    Off,
    /// A note starts here.
    On,
    /// A note started earlier is still sounding here.
    Continued,
}

/// The DAW data model as the engine sees it. A host binding implements this
/// once; the engine only ever reads banks from it and asks it to do things.
///
/// Addresses in clip and step methods are page-relative: `track` is an index
/// into the current page of the current track bank, `slot` into the scene
/// bank's page, `step` and `row` into the sequencer's visible window.
#[allow(unused_variables)]
pub trait Daw {
    /// The instrument/audio track bank.
    fn track_bank(&self) -> BankRef;

    /// The effect (return) track bank.
    fn effect_track_bank(&self) -> BankRef;

    /// The scene bank, whose page addresses clip slots vertically.
    fn scene_bank(&self) -> BankRef;

    /// The current device's remote-control page. Items are parameters.
    fn device_parameter_bank(&self) -> BankRef;

    /// Freely assignable parameters. Items are parameters.
    fn user_parameter_bank(&self) -> BankRef;

    /// The layers of the current device, when it is a layered instrument.
    fn layer_bank(&self) -> BankRef;

    /// The pads of the current device, when it is a drum machine.
    fn drum_pad_bank(&self) -> BankRef;

    /// True while the current device exposes drum pads.
    fn has_drum_pads(&self) -> &Signal<bool>;

    /// Plays (velocity > 0) or releases (velocity 0) a note on the selected
    /// track.
    fn play_note(&self, note: u7, velocity: u7);

    /// Selects a drum pad of the current device by page-relative index.
    fn select_drum_pad(&self, index: usize) {}

    #[allow(missing_docs)]
    fn launch_slot(&self, track: usize, slot: usize);

    #[allow(missing_docs)]
    fn select_slot(&self, track: usize, slot: usize);

    /// Copies a slot's clip into the next empty slot of the same track.
    fn duplicate_slot(&self, track: usize, slot: usize) {}

    #[allow(missing_docs)]
    fn delete_slot(&self, track: usize, slot: usize) {}

    #[allow(missing_docs)]
    fn launch_scene(&self, scene: usize);

    #[allow(missing_docs)]
    fn slot_state(&self, track: usize, slot: usize) -> SlotState {
        SlotState::default()
    }

    /// Adds a note at the step if there is none, removes it otherwise.
    fn toggle_step(&self, step: usize, row: usize);

    #[allow(missing_docs)]
    fn clear_step(&self, step: usize, row: usize) {}

    /// Makes the step the target of subsequent note-parameter edits.
    fn select_step(&self, step: usize, row: usize) {}

    #[allow(missing_docs)]
    fn step_state(&self, step: usize, row: usize) -> StepState {
        StepState::default()
    }

    /// Picks the `row`th result in the browser's `column`th filter column.
    fn browse_select(&self, column: usize, row: usize) {}

    #[allow(missing_docs)]
    fn transport_command(&self, command: TransportCommand);
}
