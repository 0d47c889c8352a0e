// Copyright (c) 2024 Mike Tsao

//! Indication is the DAW-side highlight on the parameters that the controls
//! are about to change. It is derived from the mode and view in effect, and is
//! reapplied only when one of them (or the current track bank) changes, or
//! when the banks themselves move.

use crate::prelude::*;
use rustc_hash::FxHashMap;
use std::rc::Rc;
use strum::IntoEnumIterator;

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        compute_indication, Indication, IndicationContext, IndicationKey, Indicator, TrackIndication,
        TrackKey,
    };
}

/// One slot of a track bank page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TrackKey {
    #[allow(missing_docs)]
    pub bank: TrackBankKind,
    /// The slot within the bank's current page.
    pub index: usize,
}

/// Which parts of one track's channel strip are indicated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackIndication {
    #[allow(missing_docs)]
    pub volume: bool,
    #[allow(missing_docs)]
    pub pan: bool,
    /// One flag per send the track has.
    pub sends: Vec<bool>,
}
impl TrackIndication {
    fn none(send_count: usize) -> Self {
        Self {
            sends: vec![false; send_count],
            ..Default::default()
        }
    }

    fn all(send_count: usize) -> Self {
        Self {
            volume: true,
            pan: true,
            sends: vec![true; send_count],
        }
    }

    /// Whether anything on the strip is indicated.
    pub fn any(&self) -> bool {
        self.volume || self.pan || self.sends.iter().any(|s| *s)
    }
}

/// The full set of indication flags for one mode/view combination.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Indication {
    /// Flags for every existing item on both track banks' current pages.
    /// Items on the bank that isn't current are all false.
    pub tracks: FxHashMap<TrackKey, TrackIndication>,
    /// One flag per slot of the device-parameter page.
    pub device_parameters: Vec<bool>,
    /// The track bank whose clip launcher should be highlighted, if any.
    pub clip_launcher: Option<TrackBankKind>,
}

/// The banks that indication is computed over.
#[derive(Clone, Copy)]
pub struct IndicationContext<'a> {
    #[allow(missing_docs)]
    pub tracks: &'a CurrentTrackBank,
    #[allow(missing_docs)]
    pub device_parameters: &'a dyn Bank,
}
impl core::fmt::Debug for IndicationContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IndicationContext")
            .field("tracks", &self.tracks)
            .finish()
    }
}

/// Works out what should be indicated while `mode` and `view` are in effect.
/// Reads the banks but changes nothing.
pub fn compute_indication(
    mode: Option<&Mode>,
    view: Option<&dyn View>,
    ctx: &IndicationContext<'_>,
) -> Indication {
    let target = mode.map(Mode::indication_target).unwrap_or_default();
    let current = ctx.tracks.kind();
    let mut indication = Indication::default();

    for kind in TrackBankKind::iter() {
        let bank = ctx.tracks.bank(kind);
        let selected = bank.selected_item().map(|item| item.index());
        for slot in 0..bank.page_size() {
            let item = bank.item(slot);
            if !item.exists() {
                continue;
            }
            let send_count = item.send_count();
            let flags = if kind != current {
                TrackIndication::none(send_count)
            } else {
                match target {
                    IndicationTarget::Volume => TrackIndication {
                        volume: true,
                        ..TrackIndication::none(send_count)
                    },
                    IndicationTarget::Pan => TrackIndication {
                        pan: true,
                        ..TrackIndication::none(send_count)
                    },
                    IndicationTarget::Send(k) => {
                        let mut flags = TrackIndication::none(send_count);
                        if let Some(send) = flags.sends.get_mut(k) {
                            *send = true;
                        }
                        flags
                    }
                    IndicationTarget::SelectedTrack if selected == Some(item.index()) => {
                        TrackIndication::all(send_count)
                    }
                    _ => TrackIndication::none(send_count),
                }
            };
            indication.tracks.insert(TrackKey { bank: kind, index: slot }, flags);
        }
    }

    let device = ctx.device_parameters;
    indication.device_parameters = (0..device.page_size())
        .map(|i| target == IndicationTarget::DeviceParameters && device.item(i).exists())
        .collect();

    indication.clip_launcher = view
        .filter(|view| view.indicates_clip_launcher())
        .map(|_| current);
    indication
}

/// What an [Indication] was computed from. Equal keys give equal indications
/// as long as the banks haven't moved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IndicationKey {
    #[allow(missing_docs)]
    pub mode: Option<ModeId>,
    #[allow(missing_docs)]
    pub view: Option<ViewId>,
    #[allow(missing_docs)]
    pub effect_active: bool,
}

/// Applies indications to the DAW, skipping the work when nothing it depends
/// on changed.
#[derive(Default)]
pub struct Indicator {
    last: Option<IndicationKey>,
    is_valid: bool,
    indicated: Vec<ParameterRef>,
}
impl core::fmt::Debug for Indicator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Indicator")
            .field("last", &self.last)
            .field("is_valid", &self.is_valid)
            .field("indicated", &self.indicated.len())
            .finish()
    }
}
impl Indicator {
    /// Forces the next [Indicator::update()] to reapply. Call it when a bank
    /// scrolls, changes its items or changes its selection.
    pub fn invalidate(&mut self) {
        self.is_valid = false;
    }

    #[allow(missing_docs)]
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// The key of the indication currently applied.
    pub fn last_key(&self) -> Option<IndicationKey> {
        self.last
    }

    /// Recomputes and applies indication for `key`, unless `key` is what was
    /// applied last and nothing invalidated it since. Returns whether anything
    /// was applied.
    pub fn update(
        &mut self,
        key: IndicationKey,
        mode: Option<&Mode>,
        view: Option<&dyn View>,
        ctx: &IndicationContext<'_>,
    ) -> bool {
        if self.is_valid && self.last == Some(key) {
            return false;
        }
        let indication = compute_indication(mode, view, ctx);
        self.apply(&indication, ctx);
        log::debug!(
            "indication for mode {:?} view {:?}: {} track(s), {} device parameter(s)",
            mode.map(|m| m.name()),
            view.map(|v| v.core().name()),
            indication.tracks.values().filter(|t| t.any()).count(),
            indication.device_parameters.iter().filter(|d| **d).count()
        );
        self.last = Some(key);
        self.is_valid = true;
        true
    }

    fn apply(&mut self, indication: &Indication, ctx: &IndicationContext<'_>) {
        let mut flags: Vec<(ParameterRef, bool)> = Vec::default();
        for kind in TrackBankKind::iter() {
            let bank = ctx.tracks.bank(kind);
            for slot in 0..bank.page_size() {
                let item = bank.item(slot);
                let Some(strip) = indication.tracks.get(&TrackKey { bank: kind, index: slot })
                else {
                    continue;
                };
                flags.push((item.parameter(ParameterKind::Volume), strip.volume));
                flags.push((item.parameter(ParameterKind::Pan), strip.pan));
                for k in 0..item.send_count() {
                    let is_on = strip.sends.get(k).copied().unwrap_or_default();
                    flags.push((item.parameter(ParameterKind::Send(k)), is_on));
                }
            }
            bank.set_indication(indication.clip_launcher == Some(kind));
        }
        for (i, is_on) in indication.device_parameters.iter().enumerate() {
            let item = ctx.device_parameters.item(i);
            if item.exists() {
                flags.push((item.parameter(ParameterKind::Value), *is_on));
            }
        }

        // Parameters that scrolled off a page keep their highlight unless
        // cleared here.
        let is_listed = |p: &ParameterRef| {
            flags
                .iter()
                .any(|(q, _)| Rc::as_ptr(p) as *const () == Rc::as_ptr(q) as *const ())
        };
        for stale in core::mem::take(&mut self.indicated) {
            if !is_listed(&stale) {
                stale.set_indication(false);
            }
        }
        for (parameter, is_on) in flags {
            parameter.set_indication(is_on);
            if is_on {
                self.indicated.push(parameter);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestBank;

    fn mode(target: IndicationTarget, provider: ProviderRef) -> Mode {
        Mode::new_with(
            ModeConfigBuilder::default()
                .name(target.to_string())
                .indication(target)
                .build()
                .unwrap(),
            provider,
        )
    }

    struct Fixture {
        instrument: Rc<TestBank>,
        effect: Rc<TestBank>,
        device: Rc<TestBank>,
        tracks: Rc<CurrentTrackBank>,
    }
    impl Fixture {
        fn new() -> Self {
            let instrument = TestBank::new_tracks(2, &["Drums", "Bass", "Keys"]);
            instrument.set_send_count(2);
            let effect = TestBank::new_tracks(2, &["Reverb"]);
            effect.set_send_count(2);
            let device = TestBank::new_tracks(4, &["Cutoff", "Resonance"]);
            let tracks = CurrentTrackBank::new_with(instrument.clone(), effect.clone());
            Self {
                instrument,
                effect,
                device,
                tracks,
            }
        }

        fn ctx(&self) -> IndicationContext<'_> {
            IndicationContext {
                tracks: &self.tracks,
                device_parameters: &*self.device,
            }
        }

        fn provider(&self) -> ProviderRef {
            BankPageProvider::following(&self.tracks, ParameterKind::Volume)
        }

        fn key(&self, mode: ModeId) -> IndicationKey {
            IndicationKey {
                mode: Some(mode),
                view: None,
                effect_active: self.tracks.is_effect_active(),
            }
        }
    }

    #[test]
    fn send_target_flags_only_that_send_on_the_current_bank() {
        let f = Fixture::new();
        let send1 = mode(IndicationTarget::Send(0), f.provider());
        let indication = compute_indication(Some(&send1), None, &f.ctx());

        for slot in 0..2 {
            let strip = &indication.tracks[&TrackKey {
                bank: TrackBankKind::Instrument,
                index: slot,
            }];
            assert_eq!(strip.sends, vec![true, false]);
            assert!(!strip.volume && !strip.pan);
        }
        let reverb = &indication.tracks[&TrackKey {
            bank: TrackBankKind::Effect,
            index: 0,
        }];
        assert!(!reverb.any(), "only the current bank is indicated");
        assert_eq!(indication.device_parameters, vec![false; 4]);
        assert_eq!(indication.clip_launcher, None);
    }

    #[test]
    fn selected_track_and_device_targets() {
        let f = Fixture::new();
        f.instrument.select(1);
        let strip = mode(IndicationTarget::SelectedTrack, f.provider());
        let indication = compute_indication(Some(&strip), None, &f.ctx());
        assert!(
            !indication.tracks[&TrackKey {
                bank: TrackBankKind::Instrument,
                index: 0
            }]
                .any()
        );
        assert_eq!(
            indication.tracks[&TrackKey {
                bank: TrackBankKind::Instrument,
                index: 1
            }],
            TrackIndication::all(2)
        );

        let device = mode(IndicationTarget::DeviceParameters, f.provider());
        let indication = compute_indication(Some(&device), None, &f.ctx());
        assert_eq!(
            indication.device_parameters,
            vec![true, true, false, false],
            "only slots with a parameter"
        );
    }

    #[test]
    fn unchanged_key_issues_no_calls() {
        let f = Fixture::new();
        let volume = mode(IndicationTarget::Volume, f.provider());
        let mut indicator = Indicator::default();

        assert!(indicator.update(f.key(ModeId::VOLUME), Some(&volume), None, &f.ctx()));
        let calls = f.instrument.indication_calls() + f.effect.indication_calls();
        assert!(calls > 0);
        assert_eq!(
            f.instrument.indicated_parameters(),
            vec!["Drums Volume", "Bass Volume"]
        );

        assert!(!indicator.update(f.key(ModeId::VOLUME), Some(&volume), None, &f.ctx()));
        assert_eq!(
            f.instrument.indication_calls() + f.effect.indication_calls(),
            calls
        );

        indicator.invalidate();
        assert!(indicator.update(f.key(ModeId::VOLUME), Some(&volume), None, &f.ctx()));
    }

    #[test]
    fn switching_banks_moves_the_highlight() {
        let f = Fixture::new();
        let volume = mode(IndicationTarget::Volume, f.provider());
        let mut indicator = Indicator::default();
        indicator.update(f.key(ModeId::VOLUME), Some(&volume), None, &f.ctx());

        f.tracks.set_effect_active(true);
        assert!(indicator.update(f.key(ModeId::VOLUME), Some(&volume), None, &f.ctx()));
        assert!(f.instrument.indicated_parameters().is_empty());
        assert_eq!(f.effect.indicated_parameters(), vec!["Reverb Volume"]);
    }

    #[test]
    fn scrolled_off_parameters_are_cleared() {
        let f = Fixture::new();
        let pan = mode(IndicationTarget::Pan, f.provider());
        let mut indicator = Indicator::default();
        indicator.update(f.key(ModeId::PAN), Some(&pan), None, &f.ctx());

        f.instrument.scroll_to(2);
        indicator.invalidate();
        indicator.update(f.key(ModeId::PAN), Some(&pan), None, &f.ctx());
        assert_eq!(f.instrument.indicated_parameters(), vec!["Keys Pan"]);
    }
}
