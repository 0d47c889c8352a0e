// Copyright (c) 2024 Mike Tsao

use super::{GridLayout, GridMode, View, ViewCore};
use crate::{
    prelude::*,
    surface::{SurfaceContext, SurfaceOutput},
    types::u7,
};

/// The device browser. Each column of pads is one filter column of the
/// browser, top row first.
#[derive(Debug)]
pub struct BrowserView {
    core: ViewCore,
    selections: Vec<Option<usize>>,
}
impl BrowserView {
    #[allow(missing_docs)]
    pub fn new_with(layout: GridLayout) -> Self {
        Self {
            selections: vec![None; layout.columns()],
            core: ViewCore::new_with("Browser", layout, &[GridMode::Browse]),
        }
    }

    /// The row picked in `column`, if any.
    pub fn selection(&self, column: usize) -> Option<usize> {
        self.selections.get(column).copied().flatten()
    }
}
impl View for BrowserView {
    fn core(&self) -> &ViewCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ViewCore {
        &mut self.core
    }

    fn on_grid_press(&mut self, x: usize, y: usize, _: u7, ctx: &mut SurfaceContext<'_>) {
        let row = self.core.layout().rows().saturating_sub(y + 1);
        if let Some(selection) = self.selections.get_mut(x) {
            *selection = Some(row);
        }
        ctx.daw.browse_select(x, row);
    }

    fn update_display(&mut self, out: &mut dyn SurfaceOutput, _: &dyn Daw) {
        let rows = self.core.layout().rows();
        for (x, y) in self.core.layout().pads() {
            let row = rows.saturating_sub(y + 1);
            let light = if self.selection(x) == Some(row) {
                PadLight::On(Color::BLUE)
            } else {
                PadLight::Off
            };
            out.set_pad(x, y, light);
        }
    }
}
