// Copyright (c) 2024 Mike Tsao

use crate::{
    managers::{Activatable, BindingOwner, ControlBindings},
    prelude::*,
    surface::{SurfaceContext, SurfaceOutput},
    types::u7,
};
use derivative::Derivative;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// How the pad grid maps to MIDI notes. Pads are numbered from the bottom-left
/// corner, left to right and then upward, starting at `origin`.
#[derive(Clone, Copy, Builder, Debug, Derivative, PartialEq, Eq, Serialize, Deserialize)]
#[derivative(Default)]
#[builder(default)]
#[serde(rename_all = "kebab-case")]
pub struct GridLayout {
    /// The note of the bottom-left pad.
    #[derivative(Default(value = "36"))]
    origin: u8,
    #[derivative(Default(value = "8"))]
    columns: usize,
    #[derivative(Default(value = "8"))]
    rows: usize,
}
impl GridLayout {
    #[allow(missing_docs)]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[allow(missing_docs)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The pad that sends `note`, or [None] if `note` isn't on the grid.
    pub fn locate(&self, note: u7) -> Option<(usize, usize)> {
        let offset = note.as_int().checked_sub(self.origin)? as usize;
        if self.columns == 0 || offset >= self.columns * self.rows {
            return None;
        }
        Some((offset % self.columns, offset / self.columns))
    }

    /// The note the pad at `(x, y)` sends.
    pub fn note_at(&self, x: usize, y: usize) -> Option<u7> {
        if x >= self.columns || y >= self.rows {
            return None;
        }
        let note = self.origin as usize + y * self.columns + x;
        (note <= 127).then(|| u7::from(note as u8))
    }

    /// Every pad, bottom row first.
    pub fn pads(&self) -> impl Iterator<Item = (usize, usize)> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |y| (0..columns).map(move |x| (x, y)))
    }
}

/// What pressing a pad means within a view. Each view offers a subset and
/// cycles through it.
#[derive(
    Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum GridMode {
    /// Pads play notes.
    #[default]
    Play,
    /// Pads select (a drum pad, a clip slot).
    Select,
    /// Pads launch clips.
    Launch,
    /// Pads add or remove sequencer steps.
    StepToggle,
    /// Pads pick the step that note edits apply to.
    StepSelect,
    /// Pads pick browser results.
    Browse,
}

/// The state every view shares.
#[derive(Clone, Debug)]
pub struct ViewCore {
    name: String,
    is_active: bool,
    layout: GridLayout,
    grid_modes: Vec<GridMode>,
    grid_mode_index: usize,
    controls: Vec<ControlId>,
}
impl ViewCore {
    /// `grid_modes` lists the modes the view cycles through, first one
    /// current. An empty list means [GridMode::Play] only.
    pub fn new_with(name: &str, layout: GridLayout, grid_modes: &[GridMode]) -> Self {
        Self {
            name: name.to_string(),
            is_active: false,
            layout,
            grid_modes: if grid_modes.is_empty() {
                vec![GridMode::default()]
            } else {
                grid_modes.to_vec()
            },
            grid_mode_index: 0,
            controls: Vec::default(),
        }
    }

    /// Buttons the view claims while it's active.
    pub fn with_controls(mut self, controls: &[ControlId]) -> Self {
        self.controls = controls.to_vec();
        self
    }

    #[allow(missing_docs)]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[allow(missing_docs)]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    #[allow(missing_docs)]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    #[allow(missing_docs)]
    pub fn controls(&self) -> &[ControlId] {
        &self.controls
    }

    /// The current grid mode.
    pub fn grid_mode(&self) -> GridMode {
        self.grid_modes
            .get(self.grid_mode_index)
            .copied()
            .unwrap_or_default()
    }

    #[allow(missing_docs)]
    pub fn grid_modes(&self) -> &[GridMode] {
        &self.grid_modes
    }

    /// Makes `mode` current if the view offers it.
    pub fn set_grid_mode(&mut self, mode: GridMode) -> bool {
        match self.grid_modes.iter().position(|m| *m == mode) {
            Some(index) => {
                self.grid_mode_index = index;
                true
            }
            None => false,
        }
    }

    /// Moves to the next grid mode, wrapping around, and returns it.
    pub fn toggle_grid_mode(&mut self) -> GridMode {
        self.grid_mode_index = (self.grid_mode_index + 1) % self.grid_modes.len();
        self.grid_mode()
    }

    fn activate(&mut self, owner: BindingOwner, bindings: &mut ControlBindings) {
        if self.is_active {
            return;
        }
        self.is_active = true;
        for control in self.controls.iter() {
            bindings.bind(*control, owner);
        }
        log::debug!("view {} activated", self.name);
    }

    fn deactivate(&mut self, owner: BindingOwner, bindings: &mut ControlBindings) {
        if !self.is_active {
            return;
        }
        self.is_active = false;
        for control in self.controls.iter() {
            bindings.unbind(*control, owner);
        }
        log::debug!("view {} deactivated", self.name);
    }
}

/// Implemented by views that react to the column of scene buttons beside the
/// grid.
pub trait SceneButtonHandler {
    /// Scene button `index` (top to bottom) was pressed.
    fn on_scene_button(&mut self, index: usize, ctx: &mut SurfaceContext<'_>);
}

/// Gives the pad grid its meaning.
#[allow(unused_variables)]
pub trait View {
    #[allow(missing_docs)]
    fn core(&self) -> &ViewCore;

    #[allow(missing_docs)]
    fn core_mut(&mut self) -> &mut ViewCore;

    /// The pad at `(x, y)` was pressed with a nonzero velocity.
    fn on_grid_press(&mut self, x: usize, y: usize, velocity: u7, ctx: &mut SurfaceContext<'_>);

    /// The pad at `(x, y)` was released.
    fn on_grid_release(&mut self, x: usize, y: usize, ctx: &mut SurfaceContext<'_>) {}

    /// The pad at `(x, y)` has been held for the long-press duration.
    fn on_grid_long_press(&mut self, x: usize, y: usize, ctx: &mut SurfaceContext<'_>) {}

    /// A modifier button was pressed and released without being used in a
    /// combination.
    fn on_modifier_tap(&mut self, modifier: Modifier, ctx: &mut SurfaceContext<'_>) {}

    /// Lights the pads.
    fn update_display(&mut self, out: &mut dyn SurfaceOutput, daw: &dyn Daw);

    /// Returns the view's scene-button handling, if it has any.
    fn scene_button_handler(&mut self) -> Option<&mut dyn SceneButtonHandler> {
        None
    }

    /// Whether the DAW should highlight the clip launcher while this view is in
    /// effect.
    fn indicates_clip_launcher(&self) -> bool {
        false
    }

    /// Resolves a grid note to a pad and dispatches it. Returns false if the
    /// note isn't on the grid.
    fn on_grid_note(&mut self, note: u7, velocity: u7, ctx: &mut SurfaceContext<'_>) -> bool {
        let Some((x, y)) = self.core().layout().locate(note) else {
            log::trace!("note {} is off the grid", note.as_int());
            return false;
        };
        if velocity.as_int() > 0 {
            self.on_grid_press(x, y, velocity, ctx);
        } else {
            self.on_grid_release(x, y, ctx);
        }
        true
    }

    /// Cycles the view's grid mode.
    fn toggle_grid_mode(&mut self) -> GridMode {
        self.core_mut().toggle_grid_mode()
    }
}

impl Activatable for Box<dyn View> {
    fn name(&self) -> &str {
        self.core().name()
    }

    fn is_active(&self) -> bool {
        self.core().is_active()
    }

    fn activate(&mut self, owner: BindingOwner, bindings: &mut ControlBindings) {
        self.core_mut().activate(owner, bindings);
    }

    fn deactivate(&mut self, owner: BindingOwner, bindings: &mut ControlBindings) {
        self.core_mut().deactivate(owner, bindings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_maps_notes_both_ways() {
        let layout = GridLayoutBuilder::default()
            .origin(36)
            .columns(4)
            .rows(4)
            .build()
            .unwrap();
        assert_eq!(layout.locate(u7::from(36)), Some((0, 0)));
        assert_eq!(layout.locate(u7::from(41)), Some((1, 1)));
        assert_eq!(layout.locate(u7::from(35)), None, "below the grid");
        assert_eq!(layout.locate(u7::from(52)), None, "above the grid");
        assert_eq!(layout.note_at(1, 1), Some(u7::from(41)));
        assert_eq!(layout.note_at(4, 0), None);
        assert_eq!(layout.pads().count(), 16);
    }

    #[test]
    fn default_layout_is_eight_by_eight() {
        let layout = GridLayout::default();
        assert_eq!(layout.columns(), 8);
        assert_eq!(layout.locate(u7::from(99)), Some((7, 7)));
    }

    #[test]
    fn grid_modes_cycle() {
        let mut core = ViewCore::new_with(
            "Session",
            GridLayout::default(),
            &[GridMode::Launch, GridMode::Select],
        );
        assert_eq!(core.grid_mode(), GridMode::Launch);
        assert_eq!(core.toggle_grid_mode(), GridMode::Select);
        assert_eq!(core.toggle_grid_mode(), GridMode::Launch);
        assert!(!core.set_grid_mode(GridMode::Browse), "not offered");

        let core = ViewCore::new_with("Empty", GridLayout::default(), &[]);
        assert_eq!(core.grid_mode(), GridMode::Play);
    }
}
