// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use rustc_hash::FxHashMap;
use strum_macros::Display;

/// Who a physical control's events go to.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum BindingOwner {
    #[allow(missing_docs)]
    Mode(ModeId),
    #[allow(missing_docs)]
    View(ViewId),
}

/// Which mode or view currently owns each bound control. A control has at most
/// one owner.
#[derive(Debug, Default)]
pub struct ControlBindings {
    owners: FxHashMap<ControlId, BindingOwner>,
}
impl ControlBindings {
    /// Makes `owner` the owner of `control`, replacing any previous owner.
    pub fn bind(&mut self, control: ControlId, owner: BindingOwner) {
        if let Some(previous) = self.owners.insert(control, owner) {
            if previous != owner {
                log::debug!("control {control} moved from {previous} to {owner}");
            }
        }
    }

    /// Releases `control`, but only if `owner` is the one holding it.
    pub fn unbind(&mut self, control: ControlId, owner: BindingOwner) -> bool {
        if self.owners.get(&control) == Some(&owner) {
            self.owners.remove(&control);
            true
        } else {
            false
        }
    }

    #[allow(missing_docs)]
    pub fn owner(&self, control: ControlId) -> Option<BindingOwner> {
        self.owners.get(&control).copied()
    }

    /// How many controls are bound to `owner`.
    pub fn count_for(&self, owner: BindingOwner) -> usize {
        self.owners.values().filter(|o| **o == owner).count()
    }

    /// The number of bound controls.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// Something a [Manager](super::Manager) can switch on and off.
pub trait Activatable {
    /// A human-readable name, suitable for a notification.
    fn name(&self) -> &str;

    #[allow(missing_docs)]
    fn is_active(&self) -> bool;

    /// Starts handling events. Calling it while already active does nothing.
    fn activate(&mut self, owner: BindingOwner, bindings: &mut ControlBindings);

    /// Stops handling events. Calling it while inactive does nothing.
    fn deactivate(&mut self, owner: BindingOwner, bindings: &mut ControlBindings);
}
