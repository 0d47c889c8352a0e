// Copyright (c) 2024 Mike Tsao

use super::TestBank;
use crate::prelude::*;
use crate::types::u7;
use core::cell::RefCell;
use rustc_hash::FxHashMap;
use std::rc::Rc;
use strum_macros::Display;

/// Something a [TestDaw] was asked to do.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum DawAction {
    PlayNote { note: u8, velocity: u8 },
    SelectDrumPad(usize),
    LaunchSlot { track: usize, slot: usize },
    SelectSlot { track: usize, slot: usize },
    DuplicateSlot { track: usize, slot: usize },
    DeleteSlot { track: usize, slot: usize },
    LaunchScene(usize),
    ToggleStep { step: usize, row: usize },
    ClearStep { step: usize, row: usize },
    SelectStep { step: usize, row: usize },
    BrowseSelect { column: usize, row: usize },
    Transport(TransportCommand),
}

/// An in-memory [Daw] whose banks are [TestBank]s and which records every
/// action asked of it.
#[derive(Debug)]
pub struct TestDaw {
    tracks: Rc<TestBank>,
    effect_tracks: Rc<TestBank>,
    scenes: Rc<TestBank>,
    device_parameters: Rc<TestBank>,
    user_parameters: Rc<TestBank>,
    layers: Rc<TestBank>,
    drum_pads: Rc<TestBank>,
    has_drum_pads: Signal<bool>,
    actions: RefCell<Vec<DawAction>>,
    slots: RefCell<FxHashMap<(usize, usize), SlotState>>,
    steps: RefCell<FxHashMap<(usize, usize), StepState>>,
}
impl TestDaw {
    /// Eight-wide track banks, eight scenes, eight device and user
    /// parameters, and empty layer and drum-pad banks.
    pub fn new_with_tracks(track_names: &[&str]) -> Rc<Self> {
        Rc::new(Self {
            tracks: TestBank::new_tracks(8, track_names),
            effect_tracks: TestBank::new_tracks(8, &["Reverb", "Delay"]),
            scenes: TestBank::new_tracks(8, &["Intro", "Verse", "Chorus", "Outro"]),
            device_parameters: TestBank::new_tracks(
                8,
                &[
                    "Cutoff",
                    "Resonance",
                    "Drive",
                    "Attack",
                    "Decay",
                    "Sustain",
                    "Release",
                    "Mix",
                ],
            ),
            user_parameters: TestBank::new_tracks(8, &["User 1", "User 2"]),
            layers: TestBank::new_tracks(8, &[]),
            drum_pads: TestBank::new_tracks(16, &[]),
            has_drum_pads: Signal::new(false),
            actions: Default::default(),
            slots: Default::default(),
            steps: Default::default(),
        })
    }

    #[allow(missing_docs)]
    pub fn tracks(&self) -> &Rc<TestBank> {
        &self.tracks
    }
    #[allow(missing_docs)]
    pub fn effect_tracks(&self) -> &Rc<TestBank> {
        &self.effect_tracks
    }
    #[allow(missing_docs)]
    pub fn device_parameters(&self) -> &Rc<TestBank> {
        &self.device_parameters
    }
    #[allow(missing_docs)]
    pub fn user_parameters(&self) -> &Rc<TestBank> {
        &self.user_parameters
    }
    #[allow(missing_docs)]
    pub fn layers(&self) -> &Rc<TestBank> {
        &self.layers
    }
    #[allow(missing_docs)]
    pub fn drum_pads(&self) -> &Rc<TestBank> {
        &self.drum_pads
    }

    /// Every action so far, oldest first.
    pub fn actions(&self) -> Vec<DawAction> {
        self.actions.borrow().clone()
    }

    /// Returns the actions so far and forgets them.
    pub fn take_actions(&self) -> Vec<DawAction> {
        core::mem::take(&mut *self.actions.borrow_mut())
    }

    #[allow(missing_docs)]
    pub fn set_slot_state(&self, track: usize, slot: usize, state: SlotState) {
        self.slots.borrow_mut().insert((track, slot), state);
    }

    /// Indication calls across every bank.
    pub fn indication_calls(&self) -> usize {
        [
            &self.tracks,
            &self.effect_tracks,
            &self.device_parameters,
            &self.user_parameters,
            &self.layers,
            &self.drum_pads,
        ]
        .iter()
        .map(|bank| bank.indication_calls())
        .sum()
    }

    fn record(&self, action: DawAction) {
        self.actions.borrow_mut().push(action);
    }
}
impl Daw for TestDaw {
    fn track_bank(&self) -> BankRef {
        self.tracks.clone()
    }

    fn effect_track_bank(&self) -> BankRef {
        self.effect_tracks.clone()
    }

    fn scene_bank(&self) -> BankRef {
        self.scenes.clone()
    }

    fn device_parameter_bank(&self) -> BankRef {
        self.device_parameters.clone()
    }

    fn user_parameter_bank(&self) -> BankRef {
        self.user_parameters.clone()
    }

    fn layer_bank(&self) -> BankRef {
        self.layers.clone()
    }

    fn drum_pad_bank(&self) -> BankRef {
        self.drum_pads.clone()
    }

    fn has_drum_pads(&self) -> &Signal<bool> {
        &self.has_drum_pads
    }

    fn play_note(&self, note: u7, velocity: u7) {
        self.record(DawAction::PlayNote {
            note: note.as_int(),
            velocity: velocity.as_int(),
        });
    }

    fn select_drum_pad(&self, index: usize) {
        self.record(DawAction::SelectDrumPad(index));
    }

    fn launch_slot(&self, track: usize, slot: usize) {
        self.record(DawAction::LaunchSlot { track, slot });
        if self.slot_state(track, slot) != SlotState::Empty {
            self.set_slot_state(track, slot, SlotState::Queued);
        }
    }

    fn select_slot(&self, track: usize, slot: usize) {
        self.record(DawAction::SelectSlot { track, slot });
    }

    fn duplicate_slot(&self, track: usize, slot: usize) {
        self.record(DawAction::DuplicateSlot { track, slot });
    }

    fn delete_slot(&self, track: usize, slot: usize) {
        self.record(DawAction::DeleteSlot { track, slot });
        self.slots.borrow_mut().remove(&(track, slot));
    }

    fn launch_scene(&self, scene: usize) {
        self.record(DawAction::LaunchScene(scene));
    }

    fn slot_state(&self, track: usize, slot: usize) -> SlotState {
        self.slots
            .borrow()
            .get(&(track, slot))
            .copied()
            .unwrap_or_default()
    }

    fn toggle_step(&self, step: usize, row: usize) {
        self.record(DawAction::ToggleStep { step, row });
        let new_state = match self.step_state(step, row) {
            StepState::Off => StepState::On,
            StepState::On | StepState::Continued => StepState::Off,
        };
        self.steps.borrow_mut().insert((step, row), new_state);
    }

    fn clear_step(&self, step: usize, row: usize) {
        self.record(DawAction::ClearStep { step, row });
        self.steps.borrow_mut().remove(&(step, row));
    }

    fn select_step(&self, step: usize, row: usize) {
        self.record(DawAction::SelectStep { step, row });
    }

    fn step_state(&self, step: usize, row: usize) -> StepState {
        self.steps
            .borrow()
            .get(&(step, row))
            .copied()
            .unwrap_or_default()
    }

    fn browse_select(&self, column: usize, row: usize) {
        self.record(DawAction::BrowseSelect { column, row });
    }

    fn transport_command(&self, command: TransportCommand) {
        self.record(DawAction::Transport(command));
    }
}
