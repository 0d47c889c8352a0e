// Copyright (c) 2024 Mike Tsao

use serde::{Deserialize, Serialize};
use synonym::Synonym;

pub use midly::{
    num::{u4, u7},
    MidiMessage,
};

/// A zero-based MIDI channel, as it appears on the wire.
#[derive(Synonym, Serialize, Deserialize)]
pub struct MidiChannel(pub u8);
impl MidiChannel {
    /// The highest channel (inclusive).
    pub const MAX_VALUE: u8 = 15;

    /// The channel `steps` above this one, or the highest channel. Devices use
    /// neighboring channels to select pad animations.
    pub fn offset(&self, steps: u8) -> Self {
        Self(self.0.saturating_add(steps).min(Self::MAX_VALUE))
    }
}
impl From<u4> for MidiChannel {
    fn from(value: u4) -> Self {
        Self(value.as_int())
    }
}
impl From<MidiChannel> for u4 {
    fn from(value: MidiChannel) -> Self {
        u4::from(value.0)
    }
}
