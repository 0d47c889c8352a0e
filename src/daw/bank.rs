// Copyright (c) 2024 Mike Tsao

use super::{EmptyParameter, ParameterRef, Subscription};
use crate::prelude::*;
use std::rc::Rc;
use strum_macros::Display;

/// A shared handle to a [Bank].
pub type BankRef = Rc<dyn Bank>;

/// A shared handle to a [BankItem].
pub type ItemRef = Rc<dyn BankItem>;

/// Receives [BankEvent]s. Boxed because [Bank] must stay object-safe.
pub type BankObserverFn = Box<dyn FnMut(&BankEvent)>;

/// What changed in a [Bank].
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum BankEvent {
    /// The bank scrolled, so every page slot may now address a different item.
    PageChanged,
    /// A different item (or none) is selected.
    SelectionChanged,
    /// Items were added, removed or reordered.
    ItemsChanged,
}

/// Names one of the parameters a [BankItem] can expose.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// A channel's volume.
    Volume,
    /// A channel's panorama.
    Pan,
    /// A channel's send level, by zero-based send index.
    Send(usize),
    /// A device's parameter, by zero-based index within its current page.
    Parameter(usize),
    /// The item itself, for banks whose items are parameters (device parameter
    /// pages, user parameters).
    Value,
}

/// An ordered, paged collection of DAW items (tracks, layers, drum pads,
/// parameters, scenes) with a fixed page size.
///
/// Item indexes are relative to the current page. Addressing past the page,
/// or past the last item, yields an empty sentinel item rather than an error.
pub trait Bank {
    /// How many items one page shows.
    fn page_size(&self) -> usize;

    /// How many items the bank has in total.
    fn item_count(&self) -> usize;

    /// The absolute position of the first item on the current page.
    fn scroll_position(&self) -> usize;

    /// The item at page-relative `index`, or an empty item.
    fn item(&self, index: usize) -> ItemRef;

    /// The selected item, if any.
    fn selected_item(&self) -> Option<ItemRef>;

    /// Registers a callback for page, selection and content changes.
    fn observe(&self, callback: BankObserverFn) -> Subscription;

    /// Asks the host to highlight this bank's clip launcher area.
    #[allow(unused_variables)]
    fn set_indication(&self, enable: bool) {}

    /// The number of items that exist on the current page.
    fn existing_item_count(&self) -> usize {
        (0..self.page_size())
            .filter(|i| self.item(*i).exists())
            .count()
    }
}

/// One addressable thing in a [Bank].
pub trait BankItem {
    /// False for empty page slots.
    fn exists(&self) -> bool;

    /// The item's position within the whole bank.
    fn index(&self) -> usize;

    /// The item's display name.
    fn name(&self) -> String;

    /// The item's accent color, if it has one.
    fn color(&self) -> Option<Color> {
        None
    }

    /// How many sends this item has. Zero for items that aren't channels.
    fn send_count(&self) -> usize {
        0
    }

    /// The requested parameter, or the empty parameter if this item doesn't
    /// have one of that kind.
    fn parameter(&self, kind: ParameterKind) -> ParameterRef;

    /// Asks the host to select this item.
    fn select(&self) {}
}

/// The sentinel returned for unaddressable page slots.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyItem {
    index: usize,
}
impl EmptyItem {
    /// Returns a fresh handle to an empty item at position `index`.
    pub fn new_ref(index: usize) -> ItemRef {
        Rc::new(Self { index })
    }
}
impl BankItem for EmptyItem {
    fn exists(&self) -> bool {
        false
    }

    fn index(&self) -> usize {
        self.index
    }

    fn name(&self) -> String {
        String::default()
    }

    fn parameter(&self, _: ParameterKind) -> ParameterRef {
        EmptyParameter::new_ref()
    }
}
