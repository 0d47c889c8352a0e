// Copyright (c) 2024 Mike Tsao

//! Common data types used throughout the system.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        Color, ControlId, KnobValue, MidiChannel, ModeId, PadLight, ParamValue, ViewId,
    };
}

pub use {
    colors::{Color, PadLight},
    midi::{u4, u7, MidiChannel, MidiMessage},
    uid::{ControlId, IsUid, ModeId, ViewId},
    values::{KnobValue, ParamValue},
};

mod colors;
mod midi;
mod uid;
mod values;
