// Copyright (c) 2024 Mike Tsao

use super::{BankBinding, ParameterProvider, ParametersChangedFn};
use crate::prelude::*;
use std::rc::{Rc, Weak};

/// Resolves against the current device's drum pads when it has them, and
/// against its layers otherwise. Switching between the two rebinds
/// immediately, so a control that stays touched across the switch is never
/// left addressing the old bank.
pub struct LayerDrumPadProvider {
    kind: ParameterKind,
    layers: Weak<dyn Bank>,
    drum_pads: Weak<dyn Bank>,
    binding: Rc<BankBinding>,
}
impl core::fmt::Debug for LayerDrumPadProvider {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayerDrumPadProvider")
            .field("kind", &self.kind)
            .field("binding", &self.binding)
            .finish()
    }
}
impl LayerDrumPadProvider {
    /// Follows `daw`'s layer and drum-pad banks, exposing `kind` of each item.
    pub fn new_with(daw: &dyn Daw, kind: ParameterKind) -> Rc<Self> {
        let layers = daw.layer_bank();
        let drum_pads = daw.drum_pad_bank();
        let has_drum_pads = daw.has_drum_pads();

        Rc::new_cyclic(|me: &Weak<Self>| {
            let binding = Rc::new(BankBinding::default());
            binding.rebind(Some(if has_drum_pads.get() {
                &drum_pads
            } else {
                &layers
            }));
            let me = Weak::clone(me);
            binding.set_source_subscription(has_drum_pads.observe(move |has| {
                if let Some(me) = me.upgrade() {
                    me.switch(*has);
                }
            }));
            Self {
                kind,
                layers: Rc::downgrade(&layers),
                drum_pads: Rc::downgrade(&drum_pads),
                binding,
            }
        })
    }

    fn switch(&self, has_drum_pads: bool) {
        let bank = if has_drum_pads {
            self.drum_pads.upgrade()
        } else {
            self.layers.upgrade()
        };
        log::debug!(
            "layer provider now resolves against {}",
            if has_drum_pads { "drum pads" } else { "layers" }
        );
        self.binding.rebind(bank.as_ref());
    }

    /// The bank currently resolved against.
    pub fn bank(&self) -> Option<BankRef> {
        self.binding.bank()
    }
}
impl ParameterProvider for LayerDrumPadProvider {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestDaw;

    #[test]
    fn flips_between_layers_and_drum_pads() {
        let daw = TestDaw::new_with_tracks(&["Kit"]);
        daw.layers().set_names(&["Layer A", "Layer B"]);
        daw.drum_pads().set_names(&["Kick", "Snare", "Hat"]);
        let provider = LayerDrumPadProvider::new_with(&*daw, ParameterKind::Volume);
        assert_eq!(provider.get(0).name(), "Layer A Volume");
        assert_eq!(provider.size(), 2);

        let count = Rc::new(core::cell::Cell::new(0));
        let c = Rc::clone(&count);
        let _s = provider.observe(Box::new(move |_| c.set(c.get() + 1)));

        daw.has_drum_pads().set(true);
        assert_eq!(count.get(), 1);
        assert_eq!(provider.get(0).name(), "Kick Volume");
        assert_eq!(provider.size(), 3);

        daw.has_drum_pads().set(false);
        assert_eq!(count.get(), 2);
        assert_eq!(provider.get(1).name(), "Layer B Volume");
    }
}
