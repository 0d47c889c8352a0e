// Copyright (c) 2024 Mike Tsao

//! Tunables for a control surface. Intended to be serialized, so that a device
//! profile can ship its own timing without code changes.

use crate::prelude::*;
use anyhow::{Context, Result};
use core::time::Duration;
use derivative::Derivative;
use serde::{Deserialize, Serialize};

/// Contains the timing and default-selection settings of a surface.
#[derive(Clone, Debug, Derivative, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case", default)]
pub struct SurfaceSettings {
    /// How long after a knob value arrives the engine checks again whether the
    /// knob has settled.
    #[derivative(Default(value = "100"))]
    knob_recheck_ms: u64,

    /// A knob is considered still moving until this long has passed since its
    /// last value.
    #[derivative(Default(value = "200"))]
    knob_settle_ms: u64,

    /// How long a pad must be held before it counts as a long press.
    #[derivative(Default(value = "400"))]
    long_press_ms: u64,

    /// How long a notification stays on the display.
    #[derivative(Default(value = "1000"))]
    notification_ms: u64,

    /// How far one relative-encoder step moves a parameter.
    #[derivative(Default(value = "0.01"))]
    encoder_sensitivity: f64,

    #[derivative(Default(value = "ModeId::VOLUME"))]
    default_mode: ModeId,

    #[derivative(Default(value = "ViewId::PLAY"))]
    default_view: ViewId,
}
impl SurfaceSettings {
    /// Parses settings from JSON. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("while parsing surface settings")
    }

    /// Serializes these settings to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("while serializing surface settings")
    }

    #[allow(missing_docs)]
    pub fn knob_recheck(&self) -> Duration {
        Duration::from_millis(self.knob_recheck_ms)
    }

    #[allow(missing_docs)]
    pub fn knob_settle(&self) -> Duration {
        Duration::from_millis(self.knob_settle_ms)
    }

    #[allow(missing_docs)]
    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }

    #[allow(missing_docs)]
    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }

    #[allow(missing_docs)]
    pub fn encoder_sensitivity(&self) -> f64 {
        self.encoder_sensitivity
    }

    /// The mode that is active when the session starts.
    pub fn default_mode(&self) -> ModeId {
        self.default_mode
    }

    /// Sets the mode that is active when the session starts.
    pub fn set_default_mode(&mut self, mode: ModeId) {
        self.default_mode = mode;
    }

    /// The view that is active when the session starts.
    pub fn default_view(&self) -> ViewId {
        self.default_view
    }

    /// Sets the view that is active when the session starts.
    pub fn set_default_view(&mut self, view: ViewId) {
        self.default_view = view;
    }
}
