// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use std::rc::Rc;

/// A shared handle to a [Parameter]. Handles are cheap to obtain and should be
/// obtained fresh for each use; one kept across a bank swap can point at an
/// item that is no longer addressed.
pub type ParameterRef = Rc<dyn Parameter>;

/// A single controllable scalar owned by a DAW object: a track's volume, a
/// send level, a device parameter. Implementations live in the host binding;
/// mutation goes through `&self` because the host owns the actual state.
#[allow(unused_variables)]
pub trait Parameter {
    /// False for the empty sentinel and for parameters whose owner has gone
    /// away.
    fn exists(&self) -> bool;

    /// A short human-readable name, suitable for a display cell.
    fn name(&self) -> String;

    /// The current normalized value.
    fn value(&self) -> ParamValue;

    /// The host's text rendering of the current value ("-6.0 dB", "C 42").
    fn display_value(&self) -> String {
        format!("{:.2}", self.value().0)
    }

    /// Sets the normalized value.
    fn set_value(&self, value: ParamValue);

    /// Moves the value by `delta`, staying within 0..=1.0.
    fn inc(&self, delta: f64) {
        self.set_value((self.value() + delta).clamped());
    }

    /// Returns the parameter to its default value.
    fn reset(&self) {}

    /// Begins (true) or ends (false) a touch. While touched, a host typically
    /// writes automation and keeps motorized faders from fighting the user.
    fn touch(&self, is_touched: bool) {}

    /// Asks the host to highlight (or stop highlighting) this parameter as
    /// being under hardware control.
    fn set_indication(&self, enable: bool) {}
}

/// The sentinel returned whenever nothing is addressed: no bank, no selection,
/// or an index past the end. Every mutator is a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyParameter;
impl EmptyParameter {
    /// Returns a fresh handle to the sentinel.
    pub fn new_ref() -> ParameterRef {
        Rc::new(Self)
    }
}
impl Parameter for EmptyParameter {
    fn exists(&self) -> bool {
        false
    }

    fn name(&self) -> String {
        String::default()
    }

    fn value(&self) -> ParamValue {
        ParamValue::MIN
    }

    fn display_value(&self) -> String {
        String::default()
    }

    fn set_value(&self, _: ParamValue) {}

    fn inc(&self, _: f64) {}
}
