// Copyright (c) 2024 Mike Tsao

use super::{BankBinding, CurrentTrackBank, ParameterProvider, ParametersChangedFn};
use crate::prelude::*;
use std::rc::Rc;

/// Resolves index `i` to one parameter of the `i`th item on the bound bank's
/// current page: "volume of track i", "send 2 of track i", or, for banks whose
/// items are parameters, the item itself.
#[derive(Debug)]
pub struct BankPageProvider {
    kind: ParameterKind,
    binding: Rc<BankBinding>,
}
impl BankPageProvider {
    /// Always resolves against `bank`.
    pub fn new_with(bank: &BankRef, kind: ParameterKind) -> Rc<Self> {
        Rc::new(Self {
            kind,
            binding: BankBinding::new_with(bank),
        })
    }

    /// Resolves against whichever track bank is current.
    pub fn following(tracks: &Rc<CurrentTrackBank>, kind: ParameterKind) -> Rc<Self> {
        let binding = Rc::new(BankBinding::default());
        tracks.attach(&binding);
        Rc::new(Self { kind, binding })
    }

    /// Which parameter of each item this provider exposes.
    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    /// The bank currently resolved against.
    pub fn bank(&self) -> Option<BankRef> {
        self.binding.bank()
    }
}
impl ParameterProvider for BankPageProvider {
    fn size(&self) -> usize {
        self.bank().map_or(0, |bank| bank.existing_item_count())
    }

    fn get(&self, index: usize) -> ParameterRef {
        match self.bank() {
            Some(bank) => bank.item(index).parameter(self.kind),
            None => EmptyParameter::new_ref(),
        }
    }

    fn color(&self, index: usize) -> Option<Color> {
        self.bank().and_then(|bank| bank.item(index).color())
    }

    fn observe(&self, callback: ParametersChangedFn) -> Subscription {
        self.binding.observe(callback)
    }
}
