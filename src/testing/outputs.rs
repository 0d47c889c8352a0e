// Copyright (c) 2024 Mike Tsao

use crate::{
    prelude::*,
    surface::{DisplayCell, SurfaceOutput, Transport},
    types::u7,
};
use rustc_hash::FxHashMap;

/// A [SurfaceOutput] that keeps the latest state of everything written to it,
/// plus a count of value writes per control.
#[derive(Debug, Default)]
pub struct RecordingOutput {
    /// Latest value per control.
    pub values: FxHashMap<ControlId, ParamValue>,
    /// How many times each control's value was written.
    pub value_writes: FxHashMap<ControlId, usize>,
    /// Latest color per control.
    pub colors: FxHashMap<ControlId, Option<Color>>,
    /// Latest text per display column.
    pub cells: FxHashMap<usize, DisplayCell>,
    /// The notification currently shown.
    pub message: Option<String>,
    /// Latest light per pad.
    pub pads: FxHashMap<(usize, usize), PadLight>,
}
impl RecordingOutput {
    /// Forgets the write counts but keeps the latest state.
    pub fn reset_counts(&mut self) {
        self.value_writes.clear();
    }

    /// The total number of value writes since the last reset.
    pub fn total_value_writes(&self) -> usize {
        self.value_writes.values().sum()
    }

    /// The top line of a display column, or an empty string.
    pub fn top(&self, column: usize) -> &str {
        self.cells.get(&column).map_or("", |cell| cell.top.as_str())
    }
}
impl SurfaceOutput for RecordingOutput {
    fn set_control_value(&mut self, control: ControlId, value: ParamValue) {
        *self.value_writes.entry(control).or_default() += 1;
        self.values.insert(control, value);
    }

    fn set_control_color(&mut self, control: ControlId, color: Option<Color>) {
        self.colors.insert(control, color);
    }

    fn set_cell(&mut self, column: usize, cell: DisplayCell) {
        self.cells.insert(column, cell);
    }

    fn set_message(&mut self, message: Option<&str>) {
        self.message = message.map(str::to_string);
    }

    fn set_pad(&mut self, x: usize, y: usize, light: PadLight) {
        self.pads.insert((x, y), light);
    }
}

/// One message sent through a [RecordingTransport].
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum SentMessage {
    ControlChange { channel: u8, cc: u8, value: u8 },
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8 },
    SysEx(Vec<u8>),
}

/// A [Transport] that records what it was asked to send.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    /// Everything sent, oldest first.
    pub sent: Vec<SentMessage>,
}
impl Transport for RecordingTransport {
    fn send_control_change(&mut self, channel: MidiChannel, cc: u7, value: u7) {
        self.sent.push(SentMessage::ControlChange {
            channel: channel.0,
            cc: cc.as_int(),
            value: value.as_int(),
        });
    }

    fn send_note_on(&mut self, channel: MidiChannel, note: u7, velocity: u7) {
        self.sent.push(SentMessage::NoteOn {
            channel: channel.0,
            note: note.as_int(),
            velocity: velocity.as_int(),
        });
    }

    fn send_note_off(&mut self, channel: MidiChannel, note: u7) {
        self.sent.push(SentMessage::NoteOff {
            channel: channel.0,
            note: note.as_int(),
        });
    }

    fn send_sysex(&mut self, bytes: &[u8]) {
        self.sent.push(SentMessage::SysEx(bytes.to_vec()));
    }
}
