// Copyright (c) 2024 Mike Tsao

use super::{GridLayout, GridMode, SceneButtonHandler, View, ViewCore};
use crate::{
    prelude::*,
    surface::{SurfaceContext, SurfaceOutput},
    types::u7,
};

/// A step sequencer. Columns are steps within the current step page, and rows
/// are note rows, bottom row lowest. Scene buttons pick the step page.
#[derive(Debug)]
pub struct SequencerView {
    core: ViewCore,
    step_page: usize,
    selected_step: Option<(usize, usize)>,
}
impl SequencerView {
    #[allow(missing_docs)]
    pub fn new_with(layout: GridLayout) -> Self {
        Self {
            core: ViewCore::new_with(
                "Sequencer",
                layout,
                &[GridMode::StepToggle, GridMode::StepSelect],
            ),
            step_page: 0,
            selected_step: None,
        }
    }

    /// Which group of `columns` steps the grid shows.
    pub fn step_page(&self) -> usize {
        self.step_page
    }

    /// The `(step, row)` most recently selected.
    pub fn selected_step(&self) -> Option<(usize, usize)> {
        self.selected_step
    }

    fn address(&self, x: usize, y: usize) -> (usize, usize) {
        (self.step_page * self.core.layout().columns() + x, y)
    }

    fn select(&mut self, step: usize, row: usize, daw: &dyn Daw) {
        self.selected_step = Some((step, row));
        daw.select_step(step, row);
    }
}
impl View for SequencerView {
    fn core(&self) -> &ViewCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ViewCore {
        &mut self.core
    }

    fn on_grid_press(&mut self, x: usize, y: usize, _: u7, ctx: &mut SurfaceContext<'_>) {
        let (step, row) = self.address(x, y);
        if ctx.buttons.is_combination(Modifier::Delete) {
            ctx.daw.clear_step(step, row);
            return;
        }
        match self.core.grid_mode() {
            GridMode::StepSelect => self.select(step, row, ctx.daw),
            _ => ctx.daw.toggle_step(step, row),
        }
    }

    fn on_grid_long_press(&mut self, x: usize, y: usize, ctx: &mut SurfaceContext<'_>) {
        let (step, row) = self.address(x, y);
        self.select(step, row, ctx.daw);
    }

    fn update_display(&mut self, out: &mut dyn SurfaceOutput, daw: &dyn Daw) {
        for (x, y) in self.core.layout().pads() {
            let (step, row) = self.address(x, y);
            let light = if self.selected_step == Some((step, row)) {
                PadLight::On(Color::WHITE)
            } else {
                match daw.step_state(step, row) {
                    StepState::Off => PadLight::Off,
                    StepState::On => PadLight::On(Color::ORANGE),
                    StepState::Continued => PadLight::On(Color::ORANGE.dimmed()),
                }
            };
            out.set_pad(x, y, light);
        }
    }

    fn scene_button_handler(&mut self) -> Option<&mut dyn SceneButtonHandler> {
        Some(self)
    }
}
impl SceneButtonHandler for SequencerView {
    fn on_scene_button(&mut self, index: usize, _: &mut SurfaceContext<'_>) {
        if self.step_page != index {
            log::debug!("sequencer step page {index}");
            self.step_page = index;
        }
    }
}
