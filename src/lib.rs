// Copyright (c) 2024 Mike Tsao

#![warn(missing_docs, unused_imports, unused_variables)]
#![allow(rustdoc::private_intra_doc_links)]

//! Surfacer is the engine underneath a DAW control-surface extension. It
//! decides what a fixed set of physical knobs, faders, buttons and pads means
//! at any moment.
//!
//! The pieces, from the bottom up:
//!
//! * The [daw] facade: the traits a host binding implements so that the engine
//! can see [Bank](daw::Bank)s of tracks and devices and their
//! [Parameter](daw::Parameter)s. The engine never constructs DAW objects.
//! * [ParameterProvider](providers::ParameterProvider)s: strategies that turn
//! "knob 3" into "the send 2 level of the selected track", re-resolving on
//! every access so that bank swaps are always honored.
//! * A [Mode](modes::Mode) binds the continuous controls to a provider. A
//! [View](views::View) gives the pad grid its meaning.
//! * A [Manager](managers::Manager) keeps exactly one mode (or view) effective,
//! including a one-level momentary overlay.
//! * [Indication](indication) tells the host which parameters are about to be
//! controlled.
//! * [ControllerSession](surface::ControllerSession) ties all of this to the
//! event stream coming from the device and to the host's flush tick.

/// A collection of imports that are useful to users of this crate. `use
/// surfacer::prelude::*;` for easier onboarding.
pub mod prelude {
    pub use super::{
        daw::prelude::*,
        error::{ManagedKind, SurfaceError},
        indication::prelude::*,
        managers::prelude::*,
        modes::prelude::*,
        providers::prelude::*,
        surface::prelude::*,
        types::prelude::*,
        util::prelude::*,
        views::prelude::*,
    };
}

pub use {
    error::{ManagedKind, SurfaceError},
    managers::{ModeManager, ViewManager},
    surface::ControllerSession,
};

pub mod daw;
pub mod error;
pub mod indication;
pub mod managers;
pub mod modes;
pub mod providers;
pub mod surface;
pub mod testing;
pub mod types;
pub mod util;
pub mod views;
