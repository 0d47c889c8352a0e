// Copyright (c) 2024 Mike Tsao

use super::{ParametersChanged, ParametersChangedFn};
use crate::prelude::*;
use core::cell::RefCell;
use serde::{Deserialize, Serialize};
use std::rc::{Rc, Weak};
use strum_macros::{Display, EnumIter};

/// A provider's link to the [Bank] it currently resolves against.
///
/// The bank is held weakly. Swapping banks drops the old bank subscription
/// before subscribing to the new one, and then tells everyone observing the
/// binding that the parameters changed.
#[derive(Default)]
pub struct BankBinding {
    bank: RefCell<Option<Weak<dyn Bank>>>,
    bank_subscription: RefCell<Option<Subscription>>,
    source_subscription: RefCell<Option<Subscription>>,
    changed: Rc<Observers<ParametersChanged>>,
}
impl core::fmt::Debug for BankBinding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BankBinding")
            .field("is_bound", &self.bank().is_some())
            .field("observers", &self.changed)
            .finish()
    }
}
impl BankBinding {
    /// A binding that is already bound to `bank`.
    pub fn new_with(bank: &BankRef) -> Rc<Self> {
        let r = Rc::new(Self::default());
        r.rebind(Some(bank));
        r
    }

    /// The bound bank, if there is one and it still exists.
    pub fn bank(&self) -> Option<BankRef> {
        self.bank.borrow().as_ref().and_then(Weak::upgrade)
    }

    /// Points the binding at `bank` (or at nothing). Returns false, and does
    /// nothing else, if it was already bound to the same bank.
    pub fn rebind(&self, bank: Option<&BankRef>) -> bool {
        let old = self.bank().map(|b| Rc::as_ptr(&b) as *const ());
        let new = bank.map(|b| Rc::as_ptr(b) as *const ());
        if old == new {
            return false;
        }

        self.bank_subscription.borrow_mut().take();
        *self.bank.borrow_mut() = bank.map(Rc::downgrade);
        if let Some(bank) = bank {
            let changed = Rc::clone(&self.changed);
            let subscription = bank.observe(Box::new(move |event| {
                log::trace!("bank event {event}");
                changed.notify(&ParametersChanged);
            }));
            *self.bank_subscription.borrow_mut() = Some(subscription);
        }
        self.changed.notify(&ParametersChanged);
        true
    }

    /// Keeps alive the subscription to whatever decides which bank this
    /// binding follows. Replaces any previous one.
    pub fn set_source_subscription(&self, subscription: Subscription) {
        *self.source_subscription.borrow_mut() = Some(subscription);
    }

    /// Registers a callback for bank swaps and for changes within the bound
    /// bank.
    pub fn observe(&self, callback: ParametersChangedFn) -> Subscription {
        self.changed.observe_boxed(callback)
    }

    /// Tells observers the parameters changed, for changes the binding can't
    /// see by itself.
    pub fn notify_changed(&self) {
        self.changed.notify(&ParametersChanged);
    }
}

/// Which of the two track banks is meant.
#[derive(
    Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum TrackBankKind {
    /// Instrument and audio tracks.
    #[default]
    Instrument,
    /// Effect (return) tracks.
    Effect,
}

/// The track bank the mixer modes currently address: the instrument bank, or
/// the effect bank while that is toggled on. Exactly one is current.
pub struct CurrentTrackBank {
    instrument: BankRef,
    effect: BankRef,
    effect_active: Signal<bool>,
}
impl core::fmt::Debug for CurrentTrackBank {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CurrentTrackBank")
            .field("kind", &self.kind())
            .finish()
    }
}
impl CurrentTrackBank {
    #[allow(missing_docs)]
    pub fn new_with(instrument: BankRef, effect: BankRef) -> Rc<Self> {
        Rc::new(Self {
            instrument,
            effect,
            effect_active: Signal::new(false),
        })
    }

    /// Uses the DAW's track and effect track banks.
    pub fn from_daw(daw: &dyn Daw) -> Rc<Self> {
        Self::new_with(daw.track_bank(), daw.effect_track_bank())
    }

    /// The bank that is current right now.
    pub fn current(&self) -> BankRef {
        self.bank(self.kind())
    }

    /// The bank of the given kind, whether or not it's current.
    pub fn bank(&self, kind: TrackBankKind) -> BankRef {
        match kind {
            TrackBankKind::Instrument => Rc::clone(&self.instrument),
            TrackBankKind::Effect => Rc::clone(&self.effect),
        }
    }

    #[allow(missing_docs)]
    pub fn kind(&self) -> TrackBankKind {
        if self.effect_active.get() {
            TrackBankKind::Effect
        } else {
            TrackBankKind::Instrument
        }
    }

    #[allow(missing_docs)]
    pub fn is_effect_active(&self) -> bool {
        self.effect_active.get()
    }

    /// Makes the effect bank (true) or instrument bank (false) current.
    /// Returns whether anything changed.
    pub fn set_effect_active(&self, is_active: bool) -> bool {
        let changed = self.effect_active.set(is_active);
        if changed {
            log::debug!("track bank is now {}", self.kind());
        }
        changed
    }

    /// Switches to the other bank.
    pub fn toggle(&self) {
        self.set_effect_active(!self.is_effect_active());
    }

    /// Registers a callback that hears about switches. The argument is true
    /// when the effect bank became current.
    pub fn observe(&self, callback: impl FnMut(&bool) + 'static) -> Subscription {
        self.effect_active.observe(callback)
    }

    /// Makes `binding` follow this bank from now on.
    pub fn attach(self: &Rc<Self>, binding: &Rc<BankBinding>) {
        binding.rebind(Some(&self.current()));
        let tracks = Rc::downgrade(self);
        let target = Rc::downgrade(binding);
        binding.set_source_subscription(self.observe(move |_| {
            if let (Some(tracks), Some(target)) = (tracks.upgrade(), target.upgrade()) {
                target.rebind(Some(&tracks.current()));
            }
        }));
    }
}
