// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use std::rc::Rc;

/// A shared handle to a [ParameterProvider].
pub type ProviderRef = Rc<dyn ParameterProvider>;

/// The event a [ParameterProvider] fires when the same index may now resolve
/// to a different parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParametersChanged;

/// Callback type for [ParameterProvider::observe()].
pub type ParametersChangedFn = Box<dyn FnMut(&ParametersChanged)>;

/// Maps a physical control's index to whatever parameter it should currently
/// control.
///
/// Resolution happens on every call. Callers should not cache the returned
/// handles across events, because the bank behind a provider can be swapped at
/// any time (track selection, effect-bank toggle, drum pads appearing).
pub trait ParameterProvider {
    /// How many indexes currently resolve to something. Never more than the
    /// provider's page size.
    fn size(&self) -> usize;

    /// The parameter at `index`, or the empty parameter. Never panics.
    fn get(&self, index: usize) -> ParameterRef;

    /// The accent color of whatever owns the parameter at `index`.
    #[allow(unused_variables)]
    fn color(&self, index: usize) -> Option<Color> {
        None
    }

    /// Registers a callback for when the index-to-parameter mapping changes.
    fn observe(&self, callback: ParametersChangedFn) -> Subscription;
}
