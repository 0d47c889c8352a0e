// Copyright (c) 2024 Mike Tsao

//! The facade through which the engine sees the DAW: banks of items, the
//! parameters those items expose, and the actions the engine can request. A
//! host binding implements these traits; the engine never constructs DAW
//! objects itself.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        Bank, BankEvent, BankItem, BankObserverFn, BankRef, Daw, EmptyItem, EmptyParameter,
        ItemRef, Observers, Parameter, ParameterKind, ParameterRef, Signal, SlotState, StepState,
        Subscription, TransportCommand,
    };
}

pub use {
    bank::{Bank, BankEvent, BankItem, BankObserverFn, BankRef, EmptyItem, ItemRef, ParameterKind},
    facade::{Daw, SlotState, StepState, TransportCommand},
    observers::{Observers, Signal, Subscription},
    parameter::{EmptyParameter, Parameter, ParameterRef},
};

mod bank;
mod facade;
mod observers;
mod parameter;
