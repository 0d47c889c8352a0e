// Copyright (c) 2024 Mike Tsao

use super::{KnobSettle, SettleCheck};
use crate::{
    managers::{Activatable, BindingOwner, ControlBindings},
    prelude::*,
    surface::{DisplayCell, SurfaceContext, SurfaceOutput},
};
use bit_vec::BitVec;
use core::cell::Cell;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::{rc::Rc, time::Instant};
use strum_macros::Display;

/// What a mode writes to the display cell above each control.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayFormat {
    /// Parameter name on top, value below.
    #[default]
    NameAndValue,
    /// Only the value.
    ValueOnly,
    /// Nothing. The mode still drives control values and colors.
    Hidden,
}

/// What touching a control does.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TouchBehavior {
    /// Touches the parameter for as long as the control is touched.
    #[default]
    TouchParameter,
    /// Touch sensors are ignored.
    Ignore,
    /// Touches the parameter, except that touching while the modifier is held
    /// resets the parameter instead.
    ResetWithModifier(Modifier),
}

/// Which parameters a mode asks the DAW to highlight while it is in effect.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndicationTarget {
    /// Nothing.
    #[default]
    None,
    /// The volume of every track on the current page.
    Volume,
    /// The pan of every track on the current page.
    Pan,
    /// The given send of every track on the current page.
    Send(usize),
    /// The whole channel strip of the selected track.
    SelectedTrack,
    /// The current device's remote-control page.
    DeviceParameters,
}

/// Everything about a [Mode] that's decided when the device profile is
/// written.
#[derive(Clone, Builder, Debug, Default, PartialEq, Serialize, Deserialize)]
#[builder(default)]
#[serde(rename_all = "kebab-case")]
pub struct ModeConfig {
    /// Shown briefly when the mode becomes active.
    #[builder(setter(into))]
    name: String,

    /// The continuous controls the mode binds, in provider index order.
    controls: Vec<ControlId>,

    display: DisplayFormat,
    touch: TouchBehavior,
    indication: IndicationTarget,

    /// Shown in place of parameter cells when nothing is addressable.
    #[builder(setter(into, strip_option))]
    placeholder: Option<String>,

    /// A pinned mode's controls stay bound when the mode is deactivated. Use it
    /// for hard-wired controls such as a master fader.
    pinned: bool,
}
#[allow(missing_docs)]
impl ModeConfig {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn controls(&self) -> &[ControlId] {
        &self.controls
    }

    pub fn display(&self) -> DisplayFormat {
        self.display
    }

    pub fn touch(&self) -> TouchBehavior {
        self.touch
    }

    pub fn indication(&self) -> IndicationTarget {
        self.indication
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }
}

/// Binds a fixed set of continuous controls to a [ParameterProvider].
///
/// A mode never caches a resolved parameter for value handling; it asks the
/// provider on every event. The one exception is a touched control, which must
/// release the same parameter it touched. That handle is swapped (release old,
/// touch new) as soon as the provider reports a change.
pub struct Mode {
    config: ModeConfig,
    provider: ProviderRef,
    is_active: bool,
    is_bound: bool,
    touched: BitVec,
    touched_parameters: Vec<Option<ParameterRef>>,
    settle: KnobSettle,
    parameters_changed: Rc<Cell<bool>>,
    subscription: Option<Subscription>,
}
impl core::fmt::Debug for Mode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Mode")
            .field("config", &self.config)
            .field("is_active", &self.is_active)
            .field("touched", &self.touched)
            .finish()
    }
}
impl Mode {
    #[allow(missing_docs)]
    pub fn new_with(config: ModeConfig, provider: ProviderRef) -> Self {
        let count = config.controls.len();
        Self {
            config,
            provider,
            is_active: false,
            is_bound: false,
            touched: BitVec::from_elem(count, false),
            touched_parameters: vec![None; count],
            settle: KnobSettle::new_with(count),
            parameters_changed: Default::default(),
            subscription: None,
        }
    }

    #[allow(missing_docs)]
    pub fn config(&self) -> &ModeConfig {
        &self.config
    }

    #[allow(missing_docs)]
    pub fn provider(&self) -> &ProviderRef {
        &self.provider
    }

    #[allow(missing_docs)]
    pub fn controls(&self) -> &[ControlId] {
        &self.config.controls
    }

    /// How many display columns, starting at the first, [Mode::update_display()]
    /// writes.
    pub fn display_columns(&self) -> usize {
        if self.config.display == DisplayFormat::Hidden && self.config.placeholder.is_none() {
            0
        } else {
            self.config.controls.len()
        }
    }

    /// The provider index of a bound control.
    pub fn control_index(&self, control: ControlId) -> Option<usize> {
        self.config.controls.iter().position(|c| *c == control)
    }

    #[allow(missing_docs)]
    pub fn is_pinned(&self) -> bool {
        self.config.pinned
    }

    #[allow(missing_docs)]
    pub fn indication_target(&self) -> IndicationTarget {
        self.config.indication
    }

    /// Resolves the parameter behind `index` right now.
    pub fn parameter(&self, index: usize) -> ParameterRef {
        if index < self.config.controls.len() {
            self.provider.get(index)
        } else {
            EmptyParameter::new_ref()
        }
    }

    /// Whether the control at `index` is currently touched.
    pub fn is_touched(&self, index: usize) -> bool {
        self.touched.get(index).unwrap_or_default()
    }

    /// Applies a value from the control at `index`. Returns true if the caller
    /// should schedule a settle check for it.
    pub fn on_knob_value(
        &mut self,
        index: usize,
        value: KnobValue,
        ctx: &mut SurfaceContext<'_>,
    ) -> bool {
        self.sync_touch();
        let parameter = self.parameter(index);
        if !parameter.exists() {
            log::debug!("{}: knob {index} addresses nothing", self.config.name);
            return false;
        }
        match value {
            KnobValue::Absolute(value) => parameter.set_value(value),
            KnobValue::Relative(steps) => {
                parameter.inc(steps as f64 * ctx.settings.encoder_sensitivity())
            }
        }
        self.settle.moved(index, ctx.now)
    }

    /// Re-checks whether the knob at `index` stopped moving.
    pub fn settle_check(
        &mut self,
        index: usize,
        now: Instant,
        settings: &SurfaceSettings,
    ) -> SettleCheck {
        self.settle.check(index, now, settings.knob_settle())
    }

    /// Handles the touch sensor of the control at `index`.
    pub fn on_knob_touch(&mut self, index: usize, is_touched: bool, ctx: &mut SurfaceContext<'_>) {
        if index >= self.config.controls.len() || self.is_touched(index) == is_touched {
            return;
        }
        self.sync_touch();
        self.touched.set(index, is_touched);

        if !is_touched {
            if let Some(parameter) = self.touched_parameters[index].take() {
                parameter.touch(false);
            }
            return;
        }

        let parameter = self.parameter(index);
        match self.config.touch {
            TouchBehavior::Ignore => {}
            TouchBehavior::ResetWithModifier(modifier) if ctx.buttons.is_combination(modifier) => {
                parameter.reset();
            }
            TouchBehavior::TouchParameter | TouchBehavior::ResetWithModifier(_) => {
                parameter.touch(true);
                self.touched_parameters[index] = Some(parameter);
            }
        }
    }

    /// If the provider changed since the last call, moves every held touch
    /// from the parameter it was on to the one the control now addresses.
    /// Returns whether the provider had changed.
    pub fn sync_touch(&mut self) -> bool {
        if !self.parameters_changed.replace(false) {
            return false;
        }
        for index in 0..self.touched_parameters.len() {
            let Some(old) = self.touched_parameters[index].take() else {
                continue;
            };
            let new = self.provider.get(index);
            if Rc::as_ptr(&old) as *const () == Rc::as_ptr(&new) as *const () {
                self.touched_parameters[index] = Some(old);
                continue;
            }
            old.touch(false);
            new.touch(true);
            self.touched_parameters[index] = Some(new);
        }
        true
    }

    /// Writes control values, colors and display cells. Controls that are
    /// still being turned keep whatever the hardware shows.
    pub fn update_display(
        &mut self,
        out: &mut dyn SurfaceOutput,
        now: Instant,
        settings: &SurfaceSettings,
    ) {
        self.sync_touch();
        let window = settings.knob_settle();

        if self.provider.size() == 0 {
            if let Some(placeholder) = self.config.placeholder.as_ref() {
                for (index, control) in self.config.controls.iter().enumerate() {
                    out.set_control_value(*control, ParamValue::MIN);
                    out.set_control_color(*control, None);
                    out.set_cell(
                        index,
                        DisplayCell {
                            top: if index == 0 {
                                placeholder.clone()
                            } else {
                                String::default()
                            },
                            bottom: String::default(),
                        },
                    );
                }
                return;
            }
        }

        for (index, control) in self.config.controls.iter().enumerate() {
            let parameter = self.provider.get(index);
            if !self.settle.is_moving(index, now, window) {
                out.set_control_value(*control, parameter.value());
            }
            out.set_control_color(
                *control,
                parameter
                    .exists()
                    .then(|| self.provider.color(index))
                    .flatten(),
            );
            let cell = match self.config.display {
                DisplayFormat::NameAndValue => DisplayCell {
                    top: parameter.name(),
                    bottom: parameter.display_value(),
                },
                DisplayFormat::ValueOnly => DisplayCell {
                    top: String::default(),
                    bottom: parameter.display_value(),
                },
                DisplayFormat::Hidden => continue,
            };
            out.set_cell(index, cell);
        }
    }

    /// Binds this mode's controls and starts listening to its provider.
    /// Harmless if already bound.
    pub fn bind(&mut self, owner: BindingOwner, bindings: &mut ControlBindings) {
        for control in self.config.controls.iter() {
            bindings.bind(*control, owner);
        }
        if !self.is_bound {
            let flag = Rc::clone(&self.parameters_changed);
            self.subscription = Some(self.provider.observe(Box::new(move |_| flag.set(true))));
            self.is_bound = true;
        }
    }

    fn unbind(&mut self, owner: BindingOwner, bindings: &mut ControlBindings) {
        for control in self.config.controls.iter() {
            bindings.unbind(*control, owner);
        }
        self.subscription = None;
        self.is_bound = false;
    }

    fn release_all(&mut self) {
        self.sync_touch();
        for (index, parameter) in self.touched_parameters.iter_mut().enumerate() {
            if let Some(parameter) = parameter.take() {
                parameter.touch(false);
            }
            self.touched.set(index, false);
        }
    }
}
impl Activatable for Mode {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn activate(&mut self, owner: BindingOwner, bindings: &mut ControlBindings) {
        if self.is_active {
            return;
        }
        self.is_active = true;
        self.bind(owner, bindings);
        self.parameters_changed.set(true);
        log::debug!("mode {} activated", self.config.name);
    }

    fn deactivate(&mut self, owner: BindingOwner, bindings: &mut ControlBindings) {
        if !self.is_active {
            return;
        }
        self.is_active = false;
        self.release_all();
        if !self.config.pinned {
            self.unbind(owner, bindings);
        }
        log::debug!("mode {} deactivated", self.config.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        surface::ButtonStates,
        testing::{RecordingOutput, TestBank, TestDaw},
    };
    use core::time::Duration;
    use float_cmp::approx_eq;

    fn volume_mode(bank: &Rc<TestBank>) -> Mode {
        let bank: BankRef = bank.clone();
        Mode::new_with(
            ModeConfigBuilder::default()
                .name("Volume")
                .controls((10..14).map(ControlId).collect::<Vec<_>>())
                .placeholder("Please select a track...")
                .indication(IndicationTarget::Volume)
                .build()
                .unwrap(),
            BankPageProvider::new_with(&bank, ParameterKind::Volume),
        )
    }

    struct Fixture {
        daw: Rc<TestDaw>,
        settings: SurfaceSettings,
        buttons: ButtonStates,
    }
    impl Fixture {
        fn new() -> Self {
            Self {
                daw: TestDaw::new_with_tracks(&["Drums", "Bass"]),
                settings: SurfaceSettings::default(),
                buttons: ButtonStates::default(),
            }
        }

        fn ctx(&mut self, now: Instant) -> SurfaceContext<'_> {
            SurfaceContext {
                now,
                settings: &self.settings,
                buttons: &mut self.buttons,
                daw: &*self.daw,
            }
        }
    }

    #[test]
    fn absolute_and_relative_values() {
        let mut f = Fixture::new();
        let mut mode = volume_mode(f.daw.tracks());
        let now = Instant::now();
        let volume = f
            .daw
            .tracks()
            .test_parameter(1, ParameterKind::Volume)
            .unwrap();

        assert!(mode.on_knob_value(1, KnobValue::Absolute(ParamValue(0.25)), &mut f.ctx(now)));
        assert_eq!(volume.value(), ParamValue(0.25));

        assert!(
            !mode.on_knob_value(1, KnobValue::Relative(-5), &mut f.ctx(now)),
            "already moving, so no second settle check"
        );
        assert!(approx_eq!(f64, volume.value().0, 0.20, epsilon = 1e-9));

        assert!(
            !mode.on_knob_value(3, KnobValue::Absolute(ParamValue::MAX), &mut f.ctx(now)),
            "empty slot is a no-op"
        );
        assert!(!mode.on_knob_value(
            99,
            KnobValue::Absolute(ParamValue::MAX),
            &mut f.ctx(now)
        ));
    }

    #[test]
    fn touch_is_guarded_and_released_on_the_same_handle() {
        let mut f = Fixture::new();
        let mut mode = volume_mode(f.daw.tracks());
        let now = Instant::now();
        let drums = f
            .daw
            .tracks()
            .test_parameter(0, ParameterKind::Volume)
            .unwrap();

        mode.on_knob_touch(0, true, &mut f.ctx(now));
        mode.on_knob_touch(0, true, &mut f.ctx(now));
        assert_eq!(drums.touch_history(), vec![true], "duplicate touch ignored");

        f.daw.tracks().set_names(&["Keys", "Bass"]);
        mode.on_knob_touch(0, false, &mut f.ctx(now));
        assert_eq!(
            drums.touch_history(),
            vec![true, false],
            "release goes to the handle that was touched"
        );
        assert!(!drums.is_touched());
    }

    #[test]
    fn held_touch_moves_to_the_new_parameter() {
        let mut f = Fixture::new();
        let mut mode = volume_mode(f.daw.tracks());
        let mut bindings = ControlBindings::default();
        mode.activate(BindingOwner::Mode(ModeId::VOLUME), &mut bindings);
        let now = Instant::now();
        let before = f
            .daw
            .tracks()
            .test_parameter(0, ParameterKind::Volume)
            .unwrap();

        mode.on_knob_touch(0, true, &mut f.ctx(now));
        f.daw.tracks().set_names(&["Keys", "Bass"]);
        let after = f
            .daw
            .tracks()
            .test_parameter(0, ParameterKind::Volume)
            .unwrap();

        assert!(mode.sync_touch());
        assert_eq!(before.touch_history(), vec![true, false]);
        assert_eq!(after.touch_history(), vec![true]);

        mode.on_knob_touch(0, false, &mut f.ctx(now));
        assert_eq!(after.touch_history(), vec![true, false]);
    }

    #[test]
    fn reset_with_modifier() {
        let mut f = Fixture::new();
        let bank: BankRef = f.daw.tracks().clone();
        let mut mode = Mode::new_with(
            ModeConfigBuilder::default()
                .name("Pan")
                .controls(vec![ControlId(1)])
                .touch(TouchBehavior::ResetWithModifier(Modifier::Shift))
                .build()
                .unwrap(),
            BankPageProvider::new_with(&bank, ParameterKind::Pan),
        );
        let pan = f.daw.tracks().test_parameter(0, ParameterKind::Pan).unwrap();
        pan.set_value(ParamValue(0.9));

        let now = Instant::now();
        f.buttons.assign_modifier(Modifier::Shift, ControlId(50));
        f.buttons.press(ControlId(50), now);
        mode.on_knob_touch(0, true, &mut f.ctx(now));
        assert_eq!(pan.value(), ParamValue::CENTER, "shift+touch resets");
        assert!(pan.touch_history().is_empty());
        assert!(
            f.buttons.release(ControlId(50)).is_some_and(|p| p.is_consumed()),
            "the modifier was used in a combination"
        );
    }

    #[test]
    fn display_skips_moving_knobs_and_shows_placeholder() {
        let mut f = Fixture::new();
        let mut mode = volume_mode(f.daw.tracks());
        let t0 = Instant::now();
        let mut out = RecordingOutput::default();

        mode.on_knob_value(0, KnobValue::Absolute(ParamValue(0.5)), &mut f.ctx(t0));
        mode.update_display(&mut out, t0 + Duration::from_millis(50), &f.settings);
        assert!(!out.values.contains_key(&ControlId(10)), "moving knob");
        assert_eq!(out.values.get(&ControlId(11)), Some(&ParamValue(0.8)));
        assert_eq!(out.top(1), "Bass Volume");

        mode.update_display(&mut out, t0 + Duration::from_millis(250), &f.settings);
        assert_eq!(out.values.get(&ControlId(10)), Some(&ParamValue(0.5)));

        f.daw.tracks().set_names(&[]);
        mode.update_display(&mut out, t0 + Duration::from_millis(300), &f.settings);
        assert_eq!(out.top(0), "Please select a track...");
        assert_eq!(out.top(1), "");
    }

    #[test]
    fn pinned_mode_keeps_bindings() {
        let f = Fixture::new();
        let bank: BankRef = f.daw.tracks().clone();
        let mut mode = Mode::new_with(
            ModeConfigBuilder::default()
                .name("Master")
                .controls(vec![ControlId(7)])
                .pinned(true)
                .build()
                .unwrap(),
            BankPageProvider::new_with(&bank, ParameterKind::Volume),
        );
        let owner = BindingOwner::Mode(ModeId::TRACK);
        let mut bindings = ControlBindings::default();
        mode.activate(owner, &mut bindings);
        mode.deactivate(owner, &mut bindings);
        assert!(!mode.is_active());
        assert_eq!(bindings.owner(ControlId(7)), Some(owner));
    }
}
