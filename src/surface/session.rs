// Copyright (c) 2024 Mike Tsao

use super::{
    ButtonAction, ButtonStates, ControlRegistry, DisplayCell, SurfaceContext, SurfaceEvent,
    SurfaceOutput,
};
use crate::{
    indication::{IndicationContext, IndicationKey, Indicator},
    managers::{BindingOwner, ControlBindings, ManagedId},
    modes::SettleCheck,
    prelude::*,
    types::{u7, MidiMessage},
};
use anyhow::Result;
use core::cell::Cell;
use delegate::delegate;
use rustc_hash::FxHashMap;
use std::{rc::Rc, time::Instant};
use strum_macros::Display;

/// Work that the session schedules for later. Each task checks when it runs
/// whether it still applies.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum DeferredTask {
    /// Checks whether a knob has stopped moving.
    KnobSettle {
        #[allow(missing_docs)]
        mode: ModeId,
        #[allow(missing_docs)]
        index: usize,
    },
    /// Fires a long press if the pad is still held from the same press.
    LongPress {
        #[allow(missing_docs)]
        note: u8,
        #[allow(missing_docs)]
        pressed_at: Instant,
    },
    /// Removes a notification unless a newer one replaced it.
    ClearNotification {
        #[allow(missing_docs)]
        shown_at: Instant,
    },
}

/// Everything one connected device needs: its modes and views, the managers
/// that keep one of each in effect, what its buttons do, and the timers.
///
/// The host feeds it events with [ControllerSession::handle_midi()] (or
/// [ControllerSession::handle_event()] for events it has already decoded),
/// calls [ControllerSession::tick()] whenever
/// [ControllerSession::next_due()] passes, and calls
/// [ControllerSession::flush()] on every display refresh.
pub struct ControllerSession {
    settings: SurfaceSettings,
    daw: Rc<dyn Daw>,
    tracks: Rc<CurrentTrackBank>,

    modes: ModeManager,
    views: ViewManager,
    bindings: ControlBindings,
    buttons: ButtonStates,
    actions: FxHashMap<ControlId, ButtonAction>,
    overlay_triggers: FxHashMap<ManagedKind, ControlId>,
    registry: ControlRegistry,

    scheduler: Scheduler<DeferredTask>,
    indicator: Indicator,
    held_pads: FxHashMap<u8, Instant>,
    notification: Option<(String, Instant)>,
    // What the mode in effect drew on the last flush.
    drawn_controls: Vec<ControlId>,
    drawn_columns: usize,

    is_dirty: Rc<Cell<bool>>,
    banks_changed: Rc<Cell<bool>>,
    _subscriptions: Vec<Subscription>,
}
impl core::fmt::Debug for ControllerSession {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ControllerSession")
            .field("modes", &self.modes)
            .field("views", &self.views)
            .field("bindings", &self.bindings)
            .field("indicator", &self.indicator)
            .field("pending", &self.scheduler.len())
            .finish()
    }
}
impl ControllerSession {
    /// A session with nothing registered. The defaults come from `settings`.
    pub fn new(settings: SurfaceSettings, daw: Rc<dyn Daw>) -> Self {
        let tracks = CurrentTrackBank::from_daw(&*daw);
        let is_dirty = Rc::new(Cell::new(true));
        let banks_changed = Rc::new(Cell::new(false));

        let mut modes = ModeManager::default();
        modes.set_default(settings.default_mode());
        let mut views = ViewManager::default();
        views.set_default(settings.default_view());

        let mut subscriptions = Vec::default();
        for bank in [
            daw.track_bank(),
            daw.effect_track_bank(),
            daw.device_parameter_bank(),
        ] {
            let (dirty, changed) = (Rc::clone(&is_dirty), Rc::clone(&banks_changed));
            subscriptions.push(bank.observe(Box::new(move |_| {
                changed.set(true);
                dirty.set(true);
            })));
        }
        let dirty = Rc::clone(&is_dirty);
        subscriptions.push(tracks.observe(move |_| dirty.set(true)));
        let dirty = Rc::clone(&is_dirty);
        subscriptions.push(modes.observe(move |_| dirty.set(true)));
        let dirty = Rc::clone(&is_dirty);
        subscriptions.push(views.observe(move |_| dirty.set(true)));

        Self {
            settings,
            daw,
            tracks,
            modes,
            views,
            bindings: Default::default(),
            buttons: Default::default(),
            actions: Default::default(),
            overlay_triggers: Default::default(),
            registry: Default::default(),
            scheduler: Default::default(),
            indicator: Default::default(),
            held_pads: Default::default(),
            notification: None,
            drawn_controls: Vec::default(),
            drawn_columns: 0,
            is_dirty,
            banks_changed,
            _subscriptions: subscriptions,
        }
    }

    #[allow(missing_docs)]
    pub fn settings(&self) -> &SurfaceSettings {
        &self.settings
    }

    #[allow(missing_docs)]
    pub fn daw(&self) -> &Rc<dyn Daw> {
        &self.daw
    }

    /// The instrument/effect track bank switch. Providers for the mixer modes
    /// should follow it.
    pub fn tracks(&self) -> &Rc<CurrentTrackBank> {
        &self.tracks
    }

    /// The device's physical controls, used by [ControllerSession::handle_midi()].
    pub fn registry_mut(&mut self) -> &mut ControlRegistry {
        &mut self.registry
    }

    #[allow(missing_docs)]
    pub fn registry(&self) -> &ControlRegistry {
        &self.registry
    }

    /// Adds a mode. A pinned mode claims its controls right away, and keeps
    /// them for the rest of the session.
    pub fn register_mode(&mut self, id: ModeId, mode: Mode) -> Result<()> {
        self.modes.register(id, mode)?;
        if let Some(mode) = self.modes.get_mut(id) {
            if mode.is_pinned() {
                mode.bind(id.owner(), &mut self.bindings);
            }
        }
        Ok(())
    }

    /// Adds a view.
    pub fn register_view(&mut self, id: ViewId, view: Box<dyn View>) -> Result<()> {
        self.views.register(id, view)?;
        Ok(())
    }

    #[allow(missing_docs)]
    pub fn set_default_mode(&mut self, id: ModeId) {
        self.modes.set_default(id);
    }

    #[allow(missing_docs)]
    pub fn set_default_view(&mut self, id: ViewId) {
        self.views.set_default(id);
    }

    /// Assigns `action` to the button `control`. Modifier buttons also become
    /// known to [ButtonStates], so that views can ask about combinations.
    pub fn bind_button(&mut self, control: ControlId, action: ButtonAction) {
        if let ButtonAction::Modifier(modifier) = action {
            self.buttons.assign_modifier(modifier, control);
        }
        if let Some(previous) = self.actions.insert(control, action) {
            log::debug!("button {control} was {previous}, now {action}");
        }
    }

    /// Checks the wiring: defaults must be registered, and so must every mode
    /// and view a button refers to. A session without views needs no default
    /// view.
    pub fn validate(&self) -> Result<()> {
        self.modes.validate()?;
        if !self.views.is_empty() {
            self.views.validate()?;
        }
        for action in self.actions.values() {
            match *action {
                ButtonAction::SetMode(id) | ButtonAction::MomentaryMode(id)
                    if self.modes.get(id).is_none() =>
                {
                    return Err(SurfaceError::unregistered(ManagedKind::Mode, id).into());
                }
                ButtonAction::SetView(id) | ButtonAction::MomentaryView(id)
                    if self.views.get(id).is_none() =>
                {
                    return Err(SurfaceError::unregistered(ManagedKind::View, id).into());
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Validates the wiring and activates the default mode and view.
    pub fn start(&mut self) -> Result<()> {
        self.validate()?;
        self.modes.start(&mut self.bindings)?;
        if !self.views.is_empty() {
            self.views.start(&mut self.bindings)?;
        }
        self.indicator.invalidate();
        self.is_dirty.set(true);
        log::info!(
            "session started with {} mode(s), {} view(s), {} bound control(s)",
            self.modes.len(),
            self.views.len(),
            self.bindings.len()
        );
        Ok(())
    }

    /// Makes `id` the active mode.
    pub fn set_mode(&mut self, id: ModeId) -> Result<(), SurfaceError> {
        self.modes.set_active(id, &mut self.bindings)
    }

    /// Makes `id` the active view. Held pads are released on the old view
    /// first.
    pub fn set_view(&mut self, id: ViewId, now: Instant) -> Result<(), SurfaceError> {
        if self.views.effective_id() != Some(id) {
            self.release_held_pads(now);
        }
        self.views.set_active(id, &mut self.bindings)
    }

    delegate! {
        to self.modes {
            /// The mode in effect, overlay included.
            #[call(effective_id)]
            pub fn effective_mode(&self) -> Option<ModeId>;

            /// The mode in effect.
            #[call(active_or_temporary)]
            pub fn effective_mode_instance(&self) -> Option<&Mode>;
        }
        to self.views {
            /// The view in effect, overlay included.
            #[call(effective_id)]
            pub fn effective_view(&self) -> Option<ViewId>;
        }
        to self.tracks {
            /// Switches the mixer modes between instrument and effect tracks.
            #[call(toggle)]
            pub fn toggle_effect_bank(&self);

            #[call(set_effect_active)]
            #[allow(missing_docs)]
            pub fn set_effect_bank_active(&self, is_active: bool) -> bool;
        }
        to self.scheduler {
            /// When [ControllerSession::tick()] next has work to do.
            pub fn next_due(&self) -> Option<Instant>;
        }
    }

    #[allow(missing_docs)]
    pub fn modes(&self) -> &ModeManager {
        &self.modes
    }

    #[allow(missing_docs)]
    pub fn views(&self) -> &ViewManager {
        &self.views
    }

    /// The view in effect.
    pub fn effective_view_instance(&self) -> Option<&dyn View> {
        self.views.active_or_temporary().map(|view| &**view)
    }

    /// Which mode or view owns each control.
    pub fn bindings(&self) -> &ControlBindings {
        &self.bindings
    }

    #[allow(missing_docs)]
    pub fn buttons(&self) -> &ButtonStates {
        &self.buttons
    }

    #[allow(missing_docs)]
    pub fn indicator(&self) -> &Indicator {
        &self.indicator
    }

    /// The notification currently shown.
    pub fn notification(&self) -> Option<&str> {
        self.notification.as_ref().map(|(text, _)| text.as_str())
    }

    /// Whether anything changed since the last [ControllerSession::flush()].
    /// Flushing a clean session is harmless, so hosts may ignore this.
    pub fn is_dirty(&self) -> bool {
        self.is_dirty.get()
    }

    /// Shows `text` until [SurfaceSettings::notification_duration()] has passed
    /// or another notification replaces it.
    pub fn show_notification(&mut self, text: &str, now: Instant) {
        log::debug!("notification: {text}");
        self.notification = Some((text.to_string(), now));
        self.scheduler.schedule(
            now + self.settings.notification_duration(),
            DeferredTask::ClearNotification { shown_at: now },
        );
        self.is_dirty.set(true);
    }

    /// Decodes an incoming MIDI message and handles it. Messages from sources
    /// the registry doesn't know are ignored.
    pub fn handle_midi(&mut self, channel: MidiChannel, message: &MidiMessage, now: Instant) {
        match self.registry.translate(channel, message) {
            Some(event) => self.handle_event(event, now),
            None => log::trace!("ignoring {message:?} on channel {channel}"),
        }
    }

    /// Handles one event from the device. Failures are logged and otherwise
    /// absorbed.
    pub fn handle_event(&mut self, event: SurfaceEvent, now: Instant) {
        if let Err(e) = self.dispatch(event, now) {
            log::warn!("while handling {event:?}: {e:#}");
        }
    }

    fn dispatch(&mut self, event: SurfaceEvent, now: Instant) -> Result<()> {
        match event {
            SurfaceEvent::Knob { control, value } => self.on_knob_value(control, value, now),
            SurfaceEvent::Touch {
                control,
                is_touched,
            } => self.on_knob_touch(control, is_touched, now),
            SurfaceEvent::Button {
                control,
                is_pressed: true,
            } => self.on_button_press(control, now)?,
            SurfaceEvent::Button {
                control,
                is_pressed: false,
            } => self.on_button_release(control, now)?,
            SurfaceEvent::Grid { note, velocity } => self.on_grid_note(note, velocity, now),
        }
        Ok(())
    }

    // The mode that owns `control`, and the control's index within it.
    fn owning_mode(&self, control: ControlId) -> Option<(ModeId, usize)> {
        let BindingOwner::Mode(id) = self.bindings.owner(control)? else {
            return None;
        };
        let index = self.modes.get(id)?.control_index(control)?;
        Some((id, index))
    }

    fn on_knob_value(&mut self, control: ControlId, value: KnobValue, now: Instant) {
        let Some((id, index)) = self.owning_mode(control) else {
            log::trace!("knob {control} belongs to no mode");
            return;
        };
        let Some(mode) = self.modes.get_mut(id) else {
            return;
        };
        let mut ctx = SurfaceContext {
            now,
            settings: &self.settings,
            buttons: &mut self.buttons,
            daw: &*self.daw,
        };
        if mode.on_knob_value(index, value, &mut ctx) {
            self.scheduler.schedule(
                now + self.settings.knob_recheck(),
                DeferredTask::KnobSettle { mode: id, index },
            );
        }
        self.is_dirty.set(true);
    }

    fn on_knob_touch(&mut self, control: ControlId, is_touched: bool, now: Instant) {
        let Some((id, index)) = self.owning_mode(control) else {
            log::trace!("touch on {control} belongs to no mode");
            return;
        };
        let Some(mode) = self.modes.get_mut(id) else {
            return;
        };
        let mut ctx = SurfaceContext {
            now,
            settings: &self.settings,
            buttons: &mut self.buttons,
            daw: &*self.daw,
        };
        mode.on_knob_touch(index, is_touched, &mut ctx);
    }

    fn on_button_press(&mut self, control: ControlId, now: Instant) -> Result<()> {
        self.buttons.press(control, now);
        let Some(action) = self.actions.get(&control).copied() else {
            log::trace!("button {control} has no action");
            return Ok(());
        };
        log::debug!("button {control}: {action}");
        match action {
            ButtonAction::SetMode(id) => self.set_mode(id)?,
            ButtonAction::MomentaryMode(id) => {
                self.modes.set_temporary(id, &mut self.bindings)?;
                self.overlay_triggers.insert(ManagedKind::Mode, control);
            }
            ButtonAction::SetView(id) => self.set_view(id, now)?,
            ButtonAction::MomentaryView(id) => {
                self.release_held_pads(now);
                self.views.set_temporary(id, &mut self.bindings)?;
                self.overlay_triggers.insert(ManagedKind::View, control);
            }
            ButtonAction::ToggleGridMode => {
                if let Some(view) = self.views.active_or_temporary_mut() {
                    let grid_mode = view.toggle_grid_mode();
                    let text = format!("{}: {grid_mode}", view.core().name());
                    self.show_notification(&text, now);
                }
            }
            ButtonAction::SceneButton(index) => {
                let handler = self
                    .views
                    .active_or_temporary_mut()
                    .and_then(|view| view.scene_button_handler());
                match handler {
                    Some(handler) => {
                        let mut ctx = SurfaceContext {
                            now,
                            settings: &self.settings,
                            buttons: &mut self.buttons,
                            daw: &*self.daw,
                        };
                        handler.on_scene_button(index, &mut ctx);
                        self.is_dirty.set(true);
                    }
                    None => log::trace!("the view in effect ignores scene buttons"),
                }
            }
            ButtonAction::ToggleEffectBank => self.toggle_effect_bank(),
            ButtonAction::Transport(command) => self.daw.transport_command(command),
            ButtonAction::Modifier(_) => {}
        }
        Ok(())
    }

    fn on_button_release(&mut self, control: ControlId, now: Instant) -> Result<()> {
        let press = self.buttons.release(control);
        let Some(action) = self.actions.get(&control).copied() else {
            return Ok(());
        };
        match action {
            ButtonAction::MomentaryMode(_) => {
                if self.overlay_triggers.get(&ManagedKind::Mode) == Some(&control) {
                    self.overlay_triggers.remove(&ManagedKind::Mode);
                    self.modes.restore_from_temporary(&mut self.bindings)?;
                }
            }
            ButtonAction::MomentaryView(_) => {
                if self.overlay_triggers.get(&ManagedKind::View) == Some(&control) {
                    self.overlay_triggers.remove(&ManagedKind::View);
                    self.release_held_pads(now);
                    self.views.restore_from_temporary(&mut self.bindings)?;
                }
            }
            ButtonAction::Modifier(modifier) if press.is_some_and(|p| !p.is_consumed()) => {
                if let Some(view) = self.views.active_or_temporary_mut() {
                    let mut ctx = SurfaceContext {
                        now,
                        settings: &self.settings,
                        buttons: &mut self.buttons,
                        daw: &*self.daw,
                    };
                    view.on_modifier_tap(modifier, &mut ctx);
                    self.is_dirty.set(true);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn on_grid_note(&mut self, note: u7, velocity: u7, now: Instant) {
        let Some(view) = self.views.active_or_temporary_mut() else {
            log::trace!("no view for grid note {}", note.as_int());
            return;
        };
        let mut ctx = SurfaceContext {
            now,
            settings: &self.settings,
            buttons: &mut self.buttons,
            daw: &*self.daw,
        };
        if !view.on_grid_note(note, velocity, &mut ctx) {
            return;
        }
        if velocity.as_int() > 0 {
            self.held_pads.insert(note.as_int(), now);
            self.scheduler.schedule(
                now + self.settings.long_press(),
                DeferredTask::LongPress {
                    note: note.as_int(),
                    pressed_at: now,
                },
            );
        } else {
            self.held_pads.remove(&note.as_int());
        }
        self.is_dirty.set(true);
    }

    // Sends releases for every held pad to the view in effect, so that a view
    // switch doesn't leave notes hanging.
    fn release_held_pads(&mut self, now: Instant) {
        if self.held_pads.is_empty() {
            return;
        }
        let notes: Vec<u8> = self.held_pads.drain().map(|(note, _)| note).collect();
        let Some(view) = self.views.active_or_temporary_mut() else {
            return;
        };
        let mut ctx = SurfaceContext {
            now,
            settings: &self.settings,
            buttons: &mut self.buttons,
            daw: &*self.daw,
        };
        for note in notes {
            view.on_grid_note(u7::from(note), u7::from(0), &mut ctx);
        }
    }

    /// Runs the deferred tasks that are due.
    pub fn tick(&mut self, now: Instant) {
        for task in self.scheduler.take_due(now) {
            match task {
                DeferredTask::KnobSettle { mode, index } => {
                    let Some(m) = self.modes.get_mut(mode) else {
                        continue;
                    };
                    match m.settle_check(index, now, &self.settings) {
                        SettleCheck::Settled => self.is_dirty.set(true),
                        SettleCheck::StillMoving => self
                            .scheduler
                            .schedule(now + self.settings.knob_recheck(), task),
                        SettleCheck::Idle => {}
                    }
                }
                DeferredTask::LongPress { note, pressed_at } => {
                    if self.held_pads.get(&note) != Some(&pressed_at) {
                        continue;
                    }
                    let Some(view) = self.views.active_or_temporary_mut() else {
                        continue;
                    };
                    let Some((x, y)) = view.core().layout().locate(u7::from(note)) else {
                        continue;
                    };
                    let mut ctx = SurfaceContext {
                        now,
                        settings: &self.settings,
                        buttons: &mut self.buttons,
                        daw: &*self.daw,
                    };
                    view.on_grid_long_press(x, y, &mut ctx);
                    self.is_dirty.set(true);
                }
                DeferredTask::ClearNotification { shown_at } => {
                    if self
                        .notification
                        .as_ref()
                        .is_some_and(|(_, at)| *at == shown_at)
                    {
                        self.notification = None;
                        self.is_dirty.set(true);
                    }
                }
            }
        }
    }

    /// Brings the DAW's indication and the device's feedback up to date. Safe
    /// to call as often as the host likes.
    ///
    /// Pinned modes that aren't in effect also update their controls. They
    /// should use [DisplayFormat::Hidden] if they share display cells with
    /// other modes.
    pub fn flush(&mut self, out: &mut dyn SurfaceOutput, now: Instant) {
        self.update_indication();
        self.blank_stale_controls(out);

        let effective = self.modes.effective_id();
        for id in self.modes.ids().to_vec() {
            if Some(id) == effective {
                continue;
            }
            if let Some(mode) = self.modes.get_mut(id).filter(|m| m.is_pinned()) {
                mode.update_display(out, now, &self.settings);
            }
        }
        if let Some(mode) = self.modes.active_or_temporary_mut() {
            mode.update_display(out, now, &self.settings);
        }
        if let Some(view) = self.views.active_or_temporary_mut() {
            view.update_display(out, &*self.daw);
        }
        out.set_message(self.notification.as_ref().map(|(text, _)| text.as_str()));
        self.is_dirty.set(false);
    }

    // Clears the controls and display columns that the previously effective
    // mode drew and that nothing now in effect covers.
    fn blank_stale_controls(&mut self, out: &mut dyn SurfaceOutput) {
        let (controls, columns) = self
            .modes
            .active_or_temporary()
            .map_or((Vec::default(), 0), |mode| {
                (mode.controls().to_vec(), mode.display_columns())
            });
        let is_covered = |control: &ControlId| {
            controls.contains(control)
                || self.modes.ids().iter().any(|id| {
                    self.modes
                        .get(*id)
                        .is_some_and(|m| m.is_pinned() && m.controls().contains(control))
                })
        };
        for control in self.drawn_controls.iter().filter(|c| !is_covered(*c)) {
            out.set_control_value(*control, ParamValue::MIN);
            out.set_control_color(*control, None);
        }
        for column in columns..self.drawn_columns {
            out.set_cell(column, DisplayCell::default());
        }
        self.drawn_controls = controls;
        self.drawn_columns = columns;
    }

    /// Reapplies indication if the mode, view or current track bank changed,
    /// or if a bank moved. Returns whether anything was applied.
    pub fn update_indication(&mut self) -> bool {
        if self.banks_changed.replace(false) {
            self.indicator.invalidate();
        }
        let key = IndicationKey {
            mode: self.modes.effective_id(),
            view: self.views.effective_id(),
            effect_active: self.tracks.is_effect_active(),
        };
        let device_parameters = self.daw.device_parameter_bank();
        let ctx = IndicationContext {
            tracks: &self.tracks,
            device_parameters: &*device_parameters,
        };
        self.indicator.update(
            key,
            self.modes.active_or_temporary(),
            self.views.active_or_temporary().map(|view| &**view),
            &ctx,
        )
    }
}
