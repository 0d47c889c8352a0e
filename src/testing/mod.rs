// Copyright (c) 2024 Mike Tsao

//! In-memory stand-ins for the DAW and the device. They are designed with an
//! emphasis on instrumentation and introspection rather than realism, and are
//! public so that device crates built on this one can test against them too.

pub use banks::{TestBank, TestTrack};
pub use daw::{DawAction, TestDaw};
pub use outputs::{RecordingOutput, RecordingTransport, SentMessage};
pub use parameters::TestParameter;

mod banks;
mod daw;
mod outputs;
mod parameters;
