// Copyright (c) 2024 Mike Tsao

use super::u7;
use core::ops::{Add, Sub};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A normalized parameter value. Everything that flows between physical
/// controls and DAW parameters is expressed in the range 0..=1.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParamValue(pub f64);
#[allow(missing_docs)]
impl ParamValue {
    pub const MIN: Self = Self(0.0);
    pub const MAX: Self = Self(1.0);
    pub const CENTER: Self = Self(0.5);

    /// Returns the value limited to 0..=1.0.
    pub fn clamped(self) -> Self {
        Self(self.0.clamp(Self::MIN.0, Self::MAX.0))
    }

    /// Converts a 7-bit MIDI controller value. 127 maps to exactly 1.0.
    pub fn from_midi(value: u7) -> Self {
        Self(value.as_int() as f64 / 127.0)
    }

    /// Converts to a 7-bit MIDI controller value, rounding to the nearest step.
    pub fn to_midi(self) -> u7 {
        u7::from((self.clamped().0 * 127.0).round() as u8)
    }
}
impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self(value)
    }
}
impl From<ParamValue> for f64 {
    fn from(value: ParamValue) -> Self {
        value.0
    }
}
impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        if value {
            Self::MAX
        } else {
            Self::MIN
        }
    }
}
impl From<ParamValue> for bool {
    fn from(value: ParamValue) -> Self {
        value.0 != 0.0
    }
}
impl Add<f64> for ParamValue {
    type Output = Self;

    fn add(self, rhs: f64) -> Self::Output {
        Self(self.0 + rhs)
    }
}
impl Sub<ParamValue> for ParamValue {
    type Output = f64;

    fn sub(self, rhs: ParamValue) -> Self::Output {
        self.0 - rhs.0
    }
}

/// What a continuous control reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KnobValue {
    /// A pot or fader reporting its position.
    Absolute(ParamValue),
    /// An endless encoder reporting how many steps it moved, negative for
    /// counterclockwise.
    Relative(i8),
}
impl KnobValue {
    /// Decodes a two's-complement relative encoder byte (1..=63 clockwise,
    /// 65..=127 counterclockwise).
    pub fn from_relative_midi(value: u7) -> Self {
        let raw = value.as_int() as i16;
        let steps = if raw >= 64 { raw - 128 } else { raw };
        Self::Relative(steps as i8)
    }
}
