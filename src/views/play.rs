// Copyright (c) 2024 Mike Tsao

use super::{GridLayout, GridMode, View, ViewCore};
use crate::{
    prelude::*,
    surface::{SurfaceContext, SurfaceOutput},
    types::u7,
};
use rustc_hash::FxHashSet;

/// Pads play notes on the selected track. In [GridMode::Select] a pad press
/// selects the matching drum pad instead, which is how the drum view works.
#[derive(Debug)]
pub struct PlayView {
    core: ViewCore,
    held: FxHashSet<(usize, usize)>,
    selected_pad: Option<usize>,
}
impl PlayView {
    /// A chromatic note grid.
    pub fn new_with(layout: GridLayout) -> Self {
        Self {
            core: ViewCore::new_with("Play", layout, &[GridMode::Play]),
            held: Default::default(),
            selected_pad: None,
        }
    }

    /// A drum grid that can switch between playing and selecting pads.
    pub fn new_drum(layout: GridLayout) -> Self {
        Self {
            core: ViewCore::new_with("Drum", layout, &[GridMode::Play, GridMode::Select]),
            held: Default::default(),
            selected_pad: None,
        }
    }

    /// The drum pad most recently selected from the grid.
    pub fn selected_pad(&self) -> Option<usize> {
        self.selected_pad
    }

    fn pad_index(&self, x: usize, y: usize) -> usize {
        y * self.core.layout().columns() + x
    }
}
impl View for PlayView {
    fn core(&self) -> &ViewCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ViewCore {
        &mut self.core
    }

    fn on_grid_press(&mut self, x: usize, y: usize, velocity: u7, ctx: &mut SurfaceContext<'_>) {
        match self.core.grid_mode() {
            GridMode::Select => {
                let index = self.pad_index(x, y);
                self.selected_pad = Some(index);
                ctx.daw.select_drum_pad(index);
            }
            _ => {
                if let Some(note) = self.core.layout().note_at(x, y) {
                    self.held.insert((x, y));
                    ctx.daw.play_note(note, velocity);
                }
            }
        }
    }

    fn on_grid_release(&mut self, x: usize, y: usize, ctx: &mut SurfaceContext<'_>) {
        // Release whatever was pressed, even if the grid mode changed since.
        if self.held.remove(&(x, y)) {
            if let Some(note) = self.core.layout().note_at(x, y) {
                ctx.daw.play_note(note, u7::from(0));
            }
        }
    }

    fn update_display(&mut self, out: &mut dyn SurfaceOutput, _: &dyn Daw) {
        let selecting = self.core.grid_mode() == GridMode::Select;
        for (x, y) in self.core.layout().pads() {
            let light = if self.held.contains(&(x, y)) {
                PadLight::On(Color::GREEN)
            } else if selecting && self.selected_pad == Some(self.pad_index(x, y)) {
                PadLight::On(Color::WHITE)
            } else if selecting {
                PadLight::On(Color::GRAY.dimmed())
            } else {
                PadLight::Off
            };
            out.set_pad(x, y, light);
        }
    }
}
