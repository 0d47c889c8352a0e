// Copyright (c) 2024 Mike Tsao

//! Single-threaded observer plumbing. Everything that can change under a live
//! control (banks, selections, signals) notifies through [Observers], and
//! everyone who listens holds a [Subscription] that unsubscribes when dropped.

use core::{cell::RefCell, fmt::Debug};
use std::rc::{Rc, Weak};

type Callback<E> = Rc<RefCell<Box<dyn FnMut(&E)>>>;

struct Registry<E> {
    next_key: usize,
    callbacks: Vec<(usize, Callback<E>)>,
}
impl<E> Default for Registry<E> {
    fn default() -> Self {
        Self {
            next_key: Default::default(),
            callbacks: Default::default(),
        }
    }
}
impl<E> Registry<E> {
    fn contains(&self, key: usize) -> bool {
        self.callbacks.iter().any(|(k, _)| *k == key)
    }
}

/// A fan-out list of callbacks interested in events of type `E`.
pub struct Observers<E: 'static> {
    registry: Rc<RefCell<Registry<E>>>,
}
impl<E: 'static> Default for Observers<E> {
    fn default() -> Self {
        Self {
            registry: Default::default(),
        }
    }
}
impl<E: 'static> Debug for Observers<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.len())
            .finish()
    }
}
impl<E: 'static> Observers<E> {
    /// Registers `callback`. It stays registered for as long as the returned
    /// [Subscription] lives.
    pub fn observe(&self, callback: impl FnMut(&E) + 'static) -> Subscription {
        self.observe_boxed(Box::new(callback))
    }

    /// Like [Observers::observe()], for callers that already have a boxed
    /// callback (trait methods can't be generic).
    pub fn observe_boxed(&self, callback: Box<dyn FnMut(&E)>) -> Subscription {
        let key = {
            let mut registry = self.registry.borrow_mut();
            let key = registry.next_key;
            registry.next_key += 1;
            registry
                .callbacks
                .push((key, Rc::new(RefCell::new(callback))));
            key
        };
        let registry: Weak<RefCell<Registry<E>>> = Rc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry
                    .borrow_mut()
                    .callbacks
                    .retain(|(k, _)| *k != key);
            }
        })
    }

    /// Calls every registered callback with `event`.
    ///
    /// Callbacks may subscribe or unsubscribe while this runs. A callback that
    /// is unsubscribed partway through is not called, and one added partway
    /// through waits for the next event. A callback that (indirectly) causes
    /// its own notification again is not re-entered.
    pub fn notify(&self, event: &E) {
        let snapshot: Vec<(usize, Callback<E>)> = self
            .registry
            .borrow()
            .callbacks
            .iter()
            .map(|(k, c)| (*k, Rc::clone(c)))
            .collect();
        for (key, callback) in snapshot {
            if !self.registry.borrow().contains(key) {
                continue;
            }
            if let Ok(mut callback) = callback.try_borrow_mut() {
                (&mut **callback)(event);
            }
        }
    }

    /// The number of live subscriptions.
    pub fn len(&self) -> usize {
        self.registry.borrow().callbacks.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A handle to a registered callback. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}
impl Subscription {
    fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Unsubscribes now. Equivalent to dropping.
    pub fn cancel(self) {}
}
impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}
impl Debug for Subscription {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Subscription")
    }
}

/// An observable value. Observers hear about a change only when the new value
/// differs from the old one, which keeps feedback loops between observers from
/// spinning.
pub struct Signal<T: Clone + PartialEq + 'static> {
    value: RefCell<T>,
    observers: Observers<T>,
}
impl<T: Clone + PartialEq + Default + 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
impl<T: Clone + PartialEq + Debug + 'static> Debug for Signal<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Signal")
            .field("value", &self.value.borrow())
            .field("observers", &self.observers)
            .finish()
    }
}
impl<T: Clone + PartialEq + 'static> Signal<T> {
    #[allow(missing_docs)]
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            observers: Default::default(),
        }
    }

    /// Returns a copy of the current value.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Stores `value` and notifies observers if it changed. Returns whether it
    /// changed.
    pub fn set(&self, value: T) -> bool {
        if *self.value.borrow() == value {
            return false;
        }
        *self.value.borrow_mut() = value.clone();
        self.observers.notify(&value);
        true
    }

    /// Registers a callback that receives each new value.
    pub fn observe(&self, callback: impl FnMut(&T) + 'static) -> Subscription {
        self.observers.observe(callback)
    }
}
