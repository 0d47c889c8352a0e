// Copyright (c) 2024 Mike Tsao

//! Managers keep exactly one mode and one view in effect, and track which of
//! them owns each physical control.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        Activatable, BindingOwner, ControlBindings, Manager, ModeManager, Transition, ViewManager,
    };
}

pub use {
    bindings::{Activatable, BindingOwner, ControlBindings},
    manager::{ManagedId, Manager, ModeManager, Transition, ViewManager},
};

mod bindings;
mod manager;
