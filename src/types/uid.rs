// Copyright (c) 2024 Mike Tsao

//! Identifiers for physical controls, modes and views. Each lives in its own
//! namespace, and each is stable for the lifetime of a device profile.

use core::hash::Hash;
use serde::{Deserialize, Serialize};
use synonym::Synonym;

/// Names one physical control: a specific knob, fader, button or pad. The
/// values are assigned by the device profile.
#[derive(Synonym, Serialize, Deserialize, Eq, PartialEq)]
// See
// https://doc.rust-lang.org/stable/std/marker/trait.StructuralPartialEq.html
// for explanation why we derive PartialEq rather than letting Synonym do it.
#[synonym(skip(PartialEq))]
#[serde(rename_all = "kebab-case")]
pub struct ControlId(pub usize);
impl IsUid for ControlId {
    fn as_usize(&self) -> usize {
        self.0
    }
}

/// Names a [Mode](crate::modes::Mode).
#[derive(Synonym, Serialize, Deserialize, Eq, PartialEq)]
#[synonym(skip(PartialEq))]
#[serde(rename_all = "kebab-case")]
pub struct ModeId(pub usize);
impl IsUid for ModeId {
    fn as_usize(&self) -> usize {
        self.0
    }
}
#[allow(missing_docs)]
impl ModeId {
    pub const VOLUME: Self = Self(1);
    pub const PAN: Self = Self(2);
    pub const TRACK: Self = Self(3);
    pub const DEVICE: Self = Self(4);
    pub const LAYER: Self = Self(5);
    pub const USER: Self = Self(6);
    pub const SEND1: Self = Self(100);
    pub const SEND2: Self = Self(101);
    pub const SEND3: Self = Self(102);
    pub const SEND4: Self = Self(103);
    pub const SEND5: Self = Self(104);
    pub const SEND6: Self = Self(105);
    pub const SEND7: Self = Self(106);
    pub const SEND8: Self = Self(107);

    /// The mode that controls the zero-based send `index`.
    pub const fn send(index: usize) -> Self {
        Self(Self::SEND1.0 + index)
    }

    /// If this is one of the send modes, returns its zero-based send index.
    pub fn send_index(&self) -> Option<usize> {
        self.0.checked_sub(Self::SEND1.0)
    }
}

/// Names a [View](crate::views::View).
#[derive(Synonym, Serialize, Deserialize, Eq, PartialEq)]
#[synonym(skip(PartialEq))]
#[serde(rename_all = "kebab-case")]
pub struct ViewId(pub usize);
impl IsUid for ViewId {
    fn as_usize(&self) -> usize {
        self.0
    }
}
#[allow(missing_docs)]
impl ViewId {
    pub const PLAY: Self = Self(1);
    pub const DRUM: Self = Self(2);
    pub const SESSION: Self = Self(3);
    pub const SEQUENCER: Self = Self(4);
    pub const BROWSER: Self = Self(5);
}

/// Anything that is a raw numeric identifier.
pub trait IsUid: Eq + Hash + Clone + Copy + From<usize> {
    /// Returns the raw value.
    fn as_usize(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_modes_round_trip_their_index() {
        assert_eq!(ModeId::send(0), ModeId::SEND1);
        assert_eq!(ModeId::send(7), ModeId::SEND8);
        assert_eq!(ModeId::SEND3.send_index(), Some(2));
        assert_eq!(
            ModeId::VOLUME.send_index(),
            None,
            "non-send modes have no send index"
        );
    }

    #[test]
    fn namespaces_are_distinct_types() {
        let mut ids: std::collections::HashSet<ControlId> = Default::default();
        for i in 0..16 {
            assert!(ids.insert(ControlId::from(i)), "control ids should be unique");
        }
        assert_eq!(ControlId(3).as_usize(), 3);
        assert_eq!(format!("{}", ViewId::SESSION), "3");
    }
}
