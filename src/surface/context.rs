// Copyright (c) 2024 Mike Tsao

use super::ButtonStates;
use crate::prelude::*;
use std::time::Instant;

/// What an event handler can see and touch while it handles one event.
pub struct SurfaceContext<'a> {
    /// When the event arrived.
    pub now: Instant,
    #[allow(missing_docs)]
    pub settings: &'a SurfaceSettings,
    /// The buttons currently held. Handlers consult modifiers through it.
    pub buttons: &'a mut ButtonStates,
    #[allow(missing_docs)]
    pub daw: &'a dyn Daw,
}
impl core::fmt::Debug for SurfaceContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SurfaceContext")
            .field("now", &self.now)
            .field("buttons", &self.buttons)
            .finish()
    }
}
