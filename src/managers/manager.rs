// Copyright (c) 2024 Mike Tsao

use super::{Activatable, BindingOwner, ControlBindings};
use crate::{prelude::*, types::IsUid};
use core::fmt::{Debug, Display};
use rustc_hash::FxHashMap;

/// An identifier a [Manager] can be keyed on.
pub trait ManagedId: IsUid + Debug + Display + 'static {
    /// Which kind of thing the id names, for error messages.
    const KIND: ManagedKind;

    /// The binding owner that stands for this id.
    fn owner(self) -> BindingOwner;
}
impl ManagedId for ModeId {
    const KIND: ManagedKind = ManagedKind::Mode;

    fn owner(self) -> BindingOwner {
        BindingOwner::Mode(self)
    }
}
impl ManagedId for ViewId {
    const KIND: ManagedKind = ManagedKind::View;

    fn owner(self) -> BindingOwner {
        BindingOwner::View(self)
    }
}

/// Fired after the effective instance changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition<I> {
    /// What was in effect before, if anything.
    pub previous: Option<I>,
    /// What is in effect now.
    pub current: I,
}

/// Keeps exactly one of a set of registered [Activatable]s in effect.
///
/// The one in effect is normally the *active* one. A *temporary* one can be
/// laid over it (for example while a button is held); restoring returns to
/// the active one. Overlays don't nest.
pub struct Manager<I: ManagedId, T: Activatable> {
    registry: FxHashMap<I, T>,
    order: Vec<I>,
    active: Option<I>,
    temporary: Option<I>,
    default: Option<I>,
    observers: Observers<Transition<I>>,
}
impl<I: ManagedId, T: Activatable> Default for Manager<I, T> {
    fn default() -> Self {
        Self {
            registry: Default::default(),
            order: Default::default(),
            active: Default::default(),
            temporary: Default::default(),
            default: Default::default(),
            observers: Default::default(),
        }
    }
}
impl<I: ManagedId, T: Activatable> Debug for Manager<I, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Manager")
            .field("kind", &I::KIND)
            .field("order", &self.order)
            .field("active", &self.active)
            .field("temporary", &self.temporary)
            .field("default", &self.default)
            .finish()
    }
}
impl<I: ManagedId, T: Activatable> Manager<I, T> {
    /// Adds `instance` under `id`. Registration is append-only, and each id
    /// may be registered once.
    pub fn register(&mut self, id: I, instance: T) -> Result<(), SurfaceError> {
        if self.registry.contains_key(&id) {
            return Err(SurfaceError::duplicate(I::KIND, id));
        }
        log::debug!("registered {} {id} ({})", I::KIND, instance.name());
        self.registry.insert(id, instance);
        self.order.push(id);
        Ok(())
    }

    /// Chooses what [Manager::start()] activates.
    pub fn set_default(&mut self, id: I) {
        self.default = Some(id);
    }

    #[allow(missing_docs)]
    pub fn default_id(&self) -> Option<I> {
        self.default
    }

    /// Checks that the default is registered.
    pub fn validate(&self) -> Result<(), SurfaceError> {
        match self.default {
            None => Err(SurfaceError::NoDefault { kind: I::KIND }),
            Some(id) if !self.registry.contains_key(&id) => {
                Err(SurfaceError::unregistered(I::KIND, id))
            }
            Some(_) => Ok(()),
        }
    }

    /// Activates the default.
    pub fn start(&mut self, bindings: &mut ControlBindings) -> Result<(), SurfaceError> {
        self.validate()?;
        match self.default {
            Some(id) => self.set_active(id, bindings),
            None => Err(SurfaceError::NoDefault { kind: I::KIND }),
        }
    }

    /// Makes `id` the one in effect. While an overlay is set, `id` replaces the
    /// overlay and the id to restore to stays the same.
    pub fn set_active(
        &mut self,
        id: I,
        bindings: &mut ControlBindings,
    ) -> Result<(), SurfaceError> {
        self.check_registered(id)?;
        if let Some(temporary) = self.temporary {
            if temporary != id {
                self.switch(Some(temporary), id, bindings);
                self.temporary = Some(id);
            }
        } else if self.active != Some(id) {
            self.switch(self.active, id, bindings);
            self.active = Some(id);
        }
        Ok(())
    }

    /// Lays `id` over the active one until [Manager::restore_from_temporary()].
    pub fn set_temporary(
        &mut self,
        id: I,
        bindings: &mut ControlBindings,
    ) -> Result<(), SurfaceError> {
        self.check_registered(id)?;
        if self.temporary.is_some() {
            return Err(SurfaceError::NestedTemporary { kind: I::KIND });
        }
        if self.active != Some(id) {
            self.switch(self.active, id, bindings);
        }
        self.temporary = Some(id);
        Ok(())
    }

    /// Removes the overlay, returning to the id that was active before it.
    pub fn restore_from_temporary(
        &mut self,
        bindings: &mut ControlBindings,
    ) -> Result<(), SurfaceError> {
        let Some(temporary) = self.temporary.take() else {
            return Err(SurfaceError::NoTemporary { kind: I::KIND });
        };
        if let Some(active) = self.active {
            if active != temporary {
                self.switch(Some(temporary), active, bindings);
            }
        } else {
            self.deactivate(temporary, bindings);
        }
        Ok(())
    }

    fn check_registered(&self, id: I) -> Result<(), SurfaceError> {
        if self.registry.contains_key(&id) {
            Ok(())
        } else {
            Err(SurfaceError::unregistered(I::KIND, id))
        }
    }

    fn deactivate(&mut self, id: I, bindings: &mut ControlBindings) {
        if let Some(instance) = self.registry.get_mut(&id) {
            instance.deactivate(id.owner(), bindings);
        }
    }

    // Deactivate-then-activate, so that a control shared by both ends up owned
    // by the new one.
    fn switch(&mut self, from: Option<I>, to: I, bindings: &mut ControlBindings) {
        if let Some(from) = from {
            self.deactivate(from, bindings);
        }
        if let Some(instance) = self.registry.get_mut(&to) {
            instance.activate(to.owner(), bindings);
            log::info!("{} is now {}", I::KIND, instance.name());
        }
        self.observers.notify(&Transition {
            previous: from,
            current: to,
        });
    }

    /// The id in effect: the temporary one if set, else the active one.
    pub fn effective_id(&self) -> Option<I> {
        self.temporary.or(self.active)
    }

    /// The id that is active underneath any overlay.
    pub fn active_id(&self) -> Option<I> {
        self.active
    }

    #[allow(missing_docs)]
    pub fn temporary_id(&self) -> Option<I> {
        self.temporary
    }

    /// The instance in effect.
    pub fn active_or_temporary(&self) -> Option<&T> {
        self.effective_id().and_then(|id| self.registry.get(&id))
    }

    #[allow(missing_docs)]
    pub fn active_or_temporary_mut(&mut self) -> Option<&mut T> {
        self.effective_id()
            .and_then(|id| self.registry.get_mut(&id))
    }

    #[allow(missing_docs)]
    pub fn get(&self, id: I) -> Option<&T> {
        self.registry.get(&id)
    }

    #[allow(missing_docs)]
    pub fn get_mut(&mut self, id: I) -> Option<&mut T> {
        self.registry.get_mut(&id)
    }

    /// Registered ids, in registration order.
    pub fn ids(&self) -> &[I] {
        &self.order
    }

    /// Registers a callback for changes of the instance in effect.
    pub fn observe(&self, callback: impl FnMut(&Transition<I>) + 'static) -> Subscription {
        self.observers.observe(callback)
    }

    /// How many instances report themselves active. Never more than one,
    /// unless something outside the manager activated one.
    pub fn active_count(&self) -> usize {
        self.registry.values().filter(|t| t.is_active()).count()
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

/// Tracks which [Mode] is in effect.
pub type ModeManager = Manager<ModeId, Mode>;

/// Tracks which [View] is in effect.
pub type ViewManager = Manager<ViewId, Box<dyn View>>;
