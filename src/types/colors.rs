// Copyright (c) 2024 Mike Tsao

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumDiscriminants};

/// An RGB accent color for LED feedback. Devices with fixed palettes pick the
/// nearest entry themselves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Color {
    #[allow(missing_docs)]
    pub r: u8,
    #[allow(missing_docs)]
    pub g: u8,
    #[allow(missing_docs)]
    pub b: u8,
}
#[allow(missing_docs)]
impl Color {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const GRAY: Self = Self::new(96, 96, 96);
    pub const RED: Self = Self::new(255, 0, 0);
    pub const ORANGE: Self = Self::new(255, 128, 0);
    pub const YELLOW: Self = Self::new(255, 255, 0);
    pub const GREEN: Self = Self::new(0, 255, 0);
    pub const BLUE: Self = Self::new(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Returns a dimmer version, for "available but not selected" states.
    pub fn dimmed(&self) -> Self {
        Self::new(self.r / 4, self.g / 4, self.b / 4)
    }
}

/// How a single pad should be lit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumDiscriminants)]
#[strum_discriminants(name(PadLightKind))]
pub enum PadLight {
    /// Unlit.
    #[default]
    Off,
    /// Steadily lit.
    On(Color),
    /// Blinking, usually "queued" or "recording".
    Blink(Color),
    /// Pulsing, usually "playing".
    Pulse(Color),
}
impl PadLight {
    /// The color of a lit pad, or [None] if it's off.
    pub fn color(&self) -> Option<Color> {
        match self {
            PadLight::Off => None,
            PadLight::On(color) | PadLight::Blink(color) | PadLight::Pulse(color) => {
                Some(*color)
            }
        }
    }
}
