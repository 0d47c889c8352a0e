// Copyright (c) 2024 Mike Tsao

//! [ParameterProvider]s decouple a fixed set of physical controls from
//! whatever logical parameters they should control right now. Each provider
//! resolves an index against a [Bank](crate::daw::Bank) on every access, and
//! tells its observers when the bank behind it is swapped.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        BankBinding, BankPageProvider, CurrentTrackBank, LayerDrumPadProvider, ParameterProvider,
        ParametersChanged, ProviderRef, SelectedItemProvider, TrackBankKind,
    };
}

pub use {
    bank_page::BankPageProvider,
    binding::{BankBinding, CurrentTrackBank, TrackBankKind},
    layer_drum_pad::LayerDrumPadProvider,
    selected_item::SelectedItemProvider,
    traits::{ParameterProvider, ParametersChanged, ParametersChangedFn, ProviderRef},
};

mod bank_page;
mod binding;
mod layer_drum_pad;
mod selected_item;
mod traits;
