// Copyright (c) 2024 Mike Tsao

use super::{GridLayout, GridMode, SceneButtonHandler, View, ViewCore};
use crate::{
    prelude::*,
    surface::{SurfaceContext, SurfaceOutput},
    types::u7,
};

/// The clip launcher. Columns are tracks and rows are scenes, top row first.
#[derive(Debug)]
pub struct SessionView {
    core: ViewCore,
    selected_slot: Option<(usize, usize)>,
}
impl SessionView {
    #[allow(missing_docs)]
    pub fn new_with(layout: GridLayout) -> Self {
        Self {
            core: ViewCore::new_with("Session", layout, &[GridMode::Launch, GridMode::Select]),
            selected_slot: None,
        }
    }

    /// The `(track, slot)` most recently selected from the grid.
    pub fn selected_slot(&self) -> Option<(usize, usize)> {
        self.selected_slot
    }

    fn address(&self, x: usize, y: usize) -> (usize, usize) {
        (x, self.core.layout().rows().saturating_sub(y + 1))
    }

    fn select(&mut self, track: usize, slot: usize, daw: &dyn Daw) {
        self.selected_slot = Some((track, slot));
        daw.select_slot(track, slot);
    }

    fn light(state: SlotState) -> PadLight {
        match state {
            SlotState::Empty => PadLight::Off,
            SlotState::Stopped => PadLight::On(Color::ORANGE.dimmed()),
            SlotState::Playing => PadLight::Pulse(Color::GREEN),
            SlotState::Recording => PadLight::Blink(Color::RED),
            SlotState::Queued => PadLight::Blink(Color::GREEN),
        }
    }
}
impl View for SessionView {
    fn core(&self) -> &ViewCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ViewCore {
        &mut self.core
    }

    fn on_grid_press(&mut self, x: usize, y: usize, _: u7, ctx: &mut SurfaceContext<'_>) {
        let (track, slot) = self.address(x, y);
        if ctx.buttons.is_combination(Modifier::Delete) {
            ctx.daw.delete_slot(track, slot);
        } else if ctx.buttons.is_combination(Modifier::Duplicate) {
            ctx.daw.duplicate_slot(track, slot);
        } else if ctx.buttons.is_combination(Modifier::Select)
            || self.core.grid_mode() == GridMode::Select
        {
            self.select(track, slot, ctx.daw);
        } else {
            ctx.daw.launch_slot(track, slot);
        }
    }

    fn on_grid_long_press(&mut self, x: usize, y: usize, ctx: &mut SurfaceContext<'_>) {
        let (track, slot) = self.address(x, y);
        self.select(track, slot, ctx.daw);
    }

    fn on_modifier_tap(&mut self, modifier: Modifier, ctx: &mut SurfaceContext<'_>) {
        let Some((track, slot)) = self.selected_slot else {
            return;
        };
        match modifier {
            Modifier::Delete => ctx.daw.delete_slot(track, slot),
            Modifier::Duplicate => ctx.daw.duplicate_slot(track, slot),
            _ => {}
        }
    }

    fn update_display(&mut self, out: &mut dyn SurfaceOutput, daw: &dyn Daw) {
        for (x, y) in self.core.layout().pads() {
            let (track, slot) = self.address(x, y);
            let light = if self.selected_slot == Some((track, slot))
                && self.core.grid_mode() == GridMode::Select
            {
                PadLight::On(Color::WHITE)
            } else {
                Self::light(daw.slot_state(track, slot))
            };
            out.set_pad(x, y, light);
        }
    }

    fn scene_button_handler(&mut self) -> Option<&mut dyn SceneButtonHandler> {
        Some(self)
    }

    fn indicates_clip_launcher(&self) -> bool {
        true
    }
}
impl SceneButtonHandler for SessionView {
    fn on_scene_button(&mut self, index: usize, ctx: &mut SurfaceContext<'_>) {
        ctx.daw.launch_scene(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        surface::ButtonStates,
        testing::{DawAction, RecordingOutput, TestDaw},
    };
    use std::time::Instant;

    #[test]
    fn combinations_take_priority_over_launching() {
        let daw = TestDaw::new_with_tracks(&["Drums", "Bass"]);
        let settings = SurfaceSettings::default();
        let mut buttons = ButtonStates::default();
        buttons.assign_modifier(Modifier::Duplicate, ControlId(7));
        let now = Instant::now();
        let mut view = SessionView::new_with(GridLayout::default());

        {
            let mut ctx = SurfaceContext {
                now,
                settings: &settings,
                buttons: &mut buttons,
                daw: &*daw,
            };
            view.on_grid_press(1, 7, u7::from(100), &mut ctx);
        }
        buttons.press(ControlId(7), now);
        {
            let mut ctx = SurfaceContext {
                now,
                settings: &settings,
                buttons: &mut buttons,
                daw: &*daw,
            };
            view.on_grid_press(1, 6, u7::from(100), &mut ctx);
        }
        assert!(buttons.release(ControlId(7)).is_some_and(|p| p.is_consumed()));
        assert_eq!(
            daw.take_actions(),
            vec![
                DawAction::LaunchSlot { track: 1, slot: 0 },
                DawAction::DuplicateSlot { track: 1, slot: 1 },
            ]
        );
    }

    #[test]
    fn slot_states_light_the_grid() {
        let daw = TestDaw::new_with_tracks(&["Drums"]);
        daw.set_slot_state(0, 0, SlotState::Playing);
        daw.set_slot_state(0, 1, SlotState::Stopped);
        let mut view = SessionView::new_with(GridLayout::default());
        let mut out = RecordingOutput::default();
        view.update_display(&mut out, &*daw);
        assert_eq!(out.pads[&(0, 7)], PadLight::Pulse(Color::GREEN));
        assert_eq!(out.pads[&(0, 6)], PadLight::On(Color::ORANGE.dimmed()));
        assert_eq!(out.pads[&(0, 0)], PadLight::Off);
        assert!(view.indicates_clip_launcher());
    }
}
