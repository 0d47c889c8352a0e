// Copyright (c) 2024 Mike Tsao

//! The device side of the engine: what its buttons do, how its MIDI maps to
//! controls, where feedback goes, and the [ControllerSession] that drives
//! everything from one event stream.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        ButtonAction, ButtonStates, ControlKind, ControlRegistry, ControllerSession, DisplayCell,
        MidiSource, Modifier, SurfaceContext, SurfaceEvent, SurfaceOutput, Transport,
        TransportOutput,
    };
}

pub use {
    buttons::{ButtonAction, ButtonPress, ButtonStates, Modifier},
    context::SurfaceContext,
    output::{
        brightness_palette, DisplayCell, PaletteFn, SurfaceOutput, SysexEncoder, Transport,
        TransportOutput,
    },
    registry::{ControlKind, ControlRegistry, MidiSource, SurfaceEvent},
    session::{ControllerSession, DeferredTask},
};

mod buttons;
mod context;
mod output;
mod registry;
mod session;
