// Copyright (c) 2024 Mike Tsao

//! System utilities.

/// Commonly used imports.
pub mod prelude {
    pub use super::{Scheduler, SurfaceSettings};
}

pub use scheduler::Scheduler;
pub use settings::SurfaceSettings;

mod scheduler;
mod settings;
