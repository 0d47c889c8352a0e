// Copyright (c) 2024 Mike Tsao

//! A [View] decides what the pad grid means: playing notes, launching clips,
//! toggling sequencer steps or browsing. Every view composes a [ViewCore] that
//! holds the state all views share.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        BrowserView, GridLayout, GridLayoutBuilder, GridMode, PlayView, SceneButtonHandler,
        SequencerView, SessionView, View, ViewCore,
    };
}

pub use {
    base::{GridLayout, GridLayoutBuilder, GridMode, SceneButtonHandler, View, ViewCore},
    browser::BrowserView,
    play::PlayView,
    sequencer::SequencerView,
    session::SessionView,
};

mod base;
mod browser;
mod play;
mod sequencer;
mod session;
