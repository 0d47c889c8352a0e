// Copyright (c) 2024 Mike Tsao

use super::{BankBinding, CurrentTrackBank, ParameterProvider, ParametersChangedFn};
use crate::prelude::*;
use std::rc::Rc;

/// Exposes the channel strip of the bank's selected item: index 0 is volume,
/// 1 is pan, and 2 onward are its sends. With nothing selected, every index
/// resolves to the empty parameter.
#[derive(Debug)]
pub struct SelectedItemProvider {
    binding: Rc<BankBinding>,
}
impl SelectedItemProvider {
    /// Index of the volume parameter.
    pub const VOLUME_INDEX: usize = 0;
    /// Index of the pan parameter.
    pub const PAN_INDEX: usize = 1;
    /// Index of the first send.
    pub const FIRST_SEND_INDEX: usize = 2;

    #[allow(missing_docs)]
    pub fn new_with(bank: &BankRef) -> Rc<Self> {
        Rc::new(Self {
            binding: BankBinding::new_with(bank),
        })
    }

    /// Uses the selection of whichever track bank is current.
    pub fn following(tracks: &Rc<CurrentTrackBank>) -> Rc<Self> {
        let binding = Rc::new(BankBinding::default());
        tracks.attach(&binding);
        Rc::new(Self { binding })
    }

    fn selected(&self) -> Option<ItemRef> {
        self.binding
            .bank()
            .and_then(|bank| bank.selected_item())
            .filter(|item| item.exists())
    }

    fn kind_at(item: &ItemRef, index: usize) -> Option<ParameterKind> {
        match index {
            Self::VOLUME_INDEX => Some(ParameterKind::Volume),
            Self::PAN_INDEX => Some(ParameterKind::Pan),
            _ => {
                let send = index - Self::FIRST_SEND_INDEX;
                (send < item.send_count()).then_some(ParameterKind::Send(send))
            }
        }
    }
}
impl ParameterProvider for SelectedItemProvider {
    fn size(&self) -> usize {
        self.selected()
            .map_or(0, |item| Self::FIRST_SEND_INDEX + item.send_count())
    }

    fn get(&self, index: usize) -> ParameterRef {
        self.selected()
            .and_then(|item| Self::kind_at(&item, index).map(|kind| item.parameter(kind)))
            .unwrap_or_else(EmptyParameter::new_ref)
    }

    fn color(&self, _: usize) -> Option<Color> {
        self.selected().and_then(|item| item.color())
    }

    fn observe(&self, callback: ParametersChangedFn) -> Subscription {
        self.binding.observe(callback)
    }
}
