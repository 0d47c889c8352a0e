// Copyright (c) 2024 Mike Tsao

//! A [Mode] decides what the device's continuous controls (knobs, faders,
//! encoders) mean: which [ParameterProvider](crate::providers::ParameterProvider)
//! they address, what the display shows above them, and what touching them
//! does.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        DisplayFormat, IndicationTarget, Mode, ModeConfig, ModeConfigBuilder, SettleCheck,
        TouchBehavior,
    };
}

pub use {
    mode::{DisplayFormat, IndicationTarget, Mode, ModeConfig, ModeConfigBuilder, TouchBehavior},
    settle::{KnobSettle, SettleCheck},
};

mod mode;
mod settle;
