// Copyright (c) 2024 Mike Tsao

use super::TestParameter;
use crate::prelude::*;
use core::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// A [BankItem] with a channel strip (volume, pan, sends) and a value of its
/// own, so that it can stand in for a track, a layer, a drum pad or a device
/// parameter.
#[derive(Debug)]
pub struct TestTrack {
    index: usize,
    name: String,
    color: Option<Color>,
    volume: Rc<TestParameter>,
    pan: Rc<TestParameter>,
    sends: RefCell<Vec<Rc<TestParameter>>>,
    value: Rc<TestParameter>,
    bank: Weak<TestBank>,
}
impl TestTrack {
    fn new_with(bank: Weak<TestBank>, index: usize, name: &str, send_count: usize) -> Rc<Self> {
        let r = Rc::new(Self {
            index,
            name: name.to_string(),
            color: Some(Color::new((index * 32 % 256) as u8, 128, 64)),
            volume: TestParameter::new_with(&format!("{name} Volume"), ParamValue(0.8)),
            pan: TestParameter::new_with(&format!("{name} Pan"), ParamValue::CENTER),
            sends: Default::default(),
            value: TestParameter::new_with(name, ParamValue::MIN),
            bank,
        });
        r.set_send_count(send_count);
        r
    }

    fn set_send_count(&self, count: usize) {
        *self.sends.borrow_mut() = (0..count)
            .map(|i| {
                TestParameter::new_with(&format!("{} Send {}", self.name, i + 1), ParamValue::MIN)
            })
            .collect();
    }

    /// The concrete parameter behind `kind`, for assertions.
    pub fn test_parameter(&self, kind: ParameterKind) -> Option<Rc<TestParameter>> {
        match kind {
            ParameterKind::Volume => Some(Rc::clone(&self.volume)),
            ParameterKind::Pan => Some(Rc::clone(&self.pan)),
            ParameterKind::Send(i) => self.sends.borrow().get(i).cloned(),
            ParameterKind::Parameter(_) => None,
            ParameterKind::Value => Some(Rc::clone(&self.value)),
        }
    }

    fn all_parameters(&self) -> Vec<Rc<TestParameter>> {
        let mut all = vec![
            Rc::clone(&self.volume),
            Rc::clone(&self.pan),
            Rc::clone(&self.value),
        ];
        all.extend(self.sends.borrow().iter().cloned());
        all
    }
}
impl BankItem for TestTrack {
    fn exists(&self) -> bool {
        true
    }

    fn index(&self) -> usize {
        self.index
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn color(&self) -> Option<Color> {
        self.color
    }

    fn send_count(&self) -> usize {
        self.sends.borrow().len()
    }

    fn parameter(&self, kind: ParameterKind) -> ParameterRef {
        match self.test_parameter(kind) {
            Some(p) => p as ParameterRef,
            None => EmptyParameter::new_ref(),
        }
    }

    fn select(&self) {
        if let Some(bank) = self.bank.upgrade() {
            bank.select(self.index);
        }
    }
}

/// An in-memory [Bank]. Scrolling, selecting and replacing items fire the
/// same events a host would.
#[derive(Debug)]
pub struct TestBank {
    me: Weak<TestBank>,
    page_size: usize,
    scroll_position: Cell<usize>,
    items: RefCell<Vec<Rc<TestTrack>>>,
    send_count: Cell<usize>,
    selected: Cell<Option<usize>>,
    is_clip_launcher_indicated: Cell<bool>,
    clip_launcher_indication_calls: Cell<usize>,
    observers: Observers<BankEvent>,
}
impl TestBank {
    /// A bank with one item per name and no sends.
    pub fn new_tracks(page_size: usize, names: &[&str]) -> Rc<Self> {
        let r = Rc::new_cyclic(|me| Self {
            me: Weak::clone(me),
            page_size,
            scroll_position: Default::default(),
            items: Default::default(),
            send_count: Default::default(),
            selected: Default::default(),
            is_clip_launcher_indicated: Default::default(),
            clip_launcher_indication_calls: Default::default(),
            observers: Default::default(),
        });
        r.set_names(names);
        r
    }

    /// Replaces every item. Clears the selection.
    pub fn set_names(&self, names: &[&str]) {
        let send_count = self.send_count.get();
        *self.items.borrow_mut() = names
            .iter()
            .enumerate()
            .map(|(i, name)| TestTrack::new_with(Weak::clone(&self.me), i, name, send_count))
            .collect();
        self.selected.set(None);
        self.observers.notify(&BankEvent::ItemsChanged);
    }

    /// Gives every item `count` sends.
    pub fn set_send_count(&self, count: usize) {
        self.send_count.set(count);
        self.items
            .borrow()
            .iter()
            .for_each(|item| item.set_send_count(count));
        self.observers.notify(&BankEvent::ItemsChanged);
    }

    /// Moves the page so that it starts at `position`.
    pub fn scroll_to(&self, position: usize) {
        if self.scroll_position.replace(position) != position {
            self.observers.notify(&BankEvent::PageChanged);
        }
    }

    /// Selects the item at absolute `position`.
    pub fn select(&self, position: usize) {
        let position = (position < self.items.borrow().len()).then_some(position);
        if self.selected.replace(position) != position {
            self.observers.notify(&BankEvent::SelectionChanged);
        }
    }

    #[allow(missing_docs)]
    pub fn clear_selection(&self) {
        if self.selected.replace(None).is_some() {
            self.observers.notify(&BankEvent::SelectionChanged);
        }
    }

    /// The item at absolute `position`.
    pub fn track(&self, position: usize) -> Option<Rc<TestTrack>> {
        self.items.borrow().get(position).cloned()
    }

    /// Shortcut for `track(position)` followed by
    /// [TestTrack::test_parameter()].
    pub fn test_parameter(&self, position: usize, kind: ParameterKind) -> Option<Rc<TestParameter>> {
        self.track(position)
            .and_then(|track| track.test_parameter(kind))
    }

    /// How many live subscriptions the bank has.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    #[allow(missing_docs)]
    pub fn is_clip_launcher_indicated(&self) -> bool {
        self.is_clip_launcher_indicated.get()
    }

    /// Every indication call made on this bank and on the parameters of its
    /// items.
    pub fn indication_calls(&self) -> usize {
        self.clip_launcher_indication_calls.get()
            + self
                .items
                .borrow()
                .iter()
                .flat_map(|item| item.all_parameters())
                .map(|p| p.indication_calls())
                .sum::<usize>()
    }

    /// The names of the indicated parameters, in bank order.
    pub fn indicated_parameters(&self) -> Vec<String> {
        self.items
            .borrow()
            .iter()
            .flat_map(|item| item.all_parameters())
            .filter(|p| p.is_indicated())
            .map(|p| p.name())
            .collect()
    }
}
impl Bank for TestBank {
    fn page_size(&self) -> usize {
        self.page_size
    }

    fn item_count(&self) -> usize {
        self.items.borrow().len()
    }

    fn scroll_position(&self) -> usize {
        self.scroll_position.get()
    }

    fn item(&self, index: usize) -> ItemRef {
        let position = self.scroll_position.get().saturating_add(index);
        if index >= self.page_size {
            return EmptyItem::new_ref(position);
        }
        match self.track(position) {
            Some(track) => track as ItemRef,
            None => EmptyItem::new_ref(position),
        }
    }

    fn selected_item(&self) -> Option<ItemRef> {
        self.selected
            .get()
            .and_then(|position| self.track(position))
            .map(|track| track as ItemRef)
    }

    fn observe(&self, callback: BankObserverFn) -> Subscription {
        self.observers.observe_boxed(callback)
    }

    fn set_indication(&self, enable: bool) {
        self.clip_launcher_indication_calls
            .set(self.clip_launcher_indication_calls.get() + 1);
        self.is_clip_launcher_indicated.set(enable);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paging_and_empty_slots() {
        let bank = TestBank::new_tracks(2, &["a", "b", "c"]);
        assert_eq!(bank.item(0).name(), "a");
        assert!(!bank.item(2).exists(), "past the page");
        bank.scroll_to(2);
        assert_eq!(bank.item(0).name(), "c");
        assert!(!bank.item(1).exists(), "past the end");
        assert_eq!(bank.existing_item_count(), 1);
    }

    #[test]
    fn selecting_through_an_item() {
        let bank = TestBank::new_tracks(4, &["a", "b"]);
        bank.item(1).select();
        assert_eq!(bank.selected_item().map(|i| i.name()), Some("b".into()));
        bank.select(7);
        assert!(bank.selected_item().is_none(), "out of range deselects");
    }
}
