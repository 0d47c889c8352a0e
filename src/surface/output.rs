// Copyright (c) 2024 Mike Tsao

use super::{ControlRegistry, MidiSource};
use crate::{prelude::*, types::u7, views::GridLayout};
use rustc_hash::FxHashMap;

/// The two lines of text above one control column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DisplayCell {
    #[allow(missing_docs)]
    pub top: String,
    #[allow(missing_docs)]
    pub bottom: String,
}

/// Where modes and views write their feedback.
#[allow(unused_variables)]
pub trait SurfaceOutput {
    /// The LED ring, motor fader or value indicator of a control.
    fn set_control_value(&mut self, control: ControlId, value: ParamValue);

    /// The accent color of a control, or [None] for unlit.
    fn set_control_color(&mut self, control: ControlId, color: Option<Color>) {}

    /// The text above control column `column`.
    fn set_cell(&mut self, column: usize, cell: DisplayCell) {}

    /// A transient message across the whole display, or [None] to remove it.
    fn set_message(&mut self, message: Option<&str>) {}

    /// A grid pad.
    fn set_pad(&mut self, x: usize, y: usize, light: PadLight);
}

/// The outgoing half of the device's MIDI connection.
pub trait Transport {
    #[allow(missing_docs)]
    fn send_control_change(&mut self, channel: MidiChannel, cc: u7, value: u7);

    #[allow(missing_docs)]
    fn send_note_on(&mut self, channel: MidiChannel, note: u7, velocity: u7);

    #[allow(missing_docs)]
    fn send_note_off(&mut self, channel: MidiChannel, note: u7);

    /// Sends a complete system-exclusive message, including the F0/F7 framing.
    fn send_sysex(&mut self, bytes: &[u8]);
}

/// Builds the device-specific system-exclusive messages for display text and
/// colors. Devices without a display don't need one.
#[allow(unused_variables)]
pub trait SysexEncoder {
    #[allow(missing_docs)]
    fn encode_cell(&self, column: usize, cell: &DisplayCell) -> Option<Vec<u8>> {
        None
    }

    #[allow(missing_docs)]
    fn encode_message(&self, message: Option<&str>) -> Option<Vec<u8>> {
        None
    }

    #[allow(missing_docs)]
    fn encode_color(&self, control: ControlId, color: Option<Color>) -> Option<Vec<u8>> {
        None
    }
}

/// Maps a pad color to the velocity that shows it. Devices with fixed
/// palettes provide their own.
pub type PaletteFn = fn(Color) -> u7;

/// The default palette: brightness, for single-color pads.
pub fn brightness_palette(color: Color) -> u7 {
    let brightest = color.r.max(color.g).max(color.b);
    u7::from(brightest / 2)
}

/// A [SurfaceOutput] that renders onto a [Transport], sending only what
/// changed since the last write.
///
/// Pads are note messages on the grid channel. Blinking and pulsing pads use
/// the next two channels up.
pub struct TransportOutput<T: Transport> {
    transport: T,
    registry: ControlRegistry,
    layout: GridLayout,
    palette: PaletteFn,
    encoder: Option<Box<dyn SysexEncoder>>,

    values: FxHashMap<ControlId, u7>,
    colors: FxHashMap<ControlId, Option<Color>>,
    cells: FxHashMap<usize, DisplayCell>,
    message: Option<Option<String>>,
    pads: FxHashMap<(usize, usize), PadLight>,
}
impl<T: Transport> core::fmt::Debug for TransportOutput<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TransportOutput")
            .field("layout", &self.layout)
            .field("values", &self.values.len())
            .field("pads", &self.pads.len())
            .finish()
    }
}
impl<T: Transport> TransportOutput<T> {
    #[allow(missing_docs)]
    pub fn new_with(transport: T, registry: ControlRegistry, layout: GridLayout) -> Self {
        Self {
            transport,
            registry,
            layout,
            palette: brightness_palette,
            encoder: None,
            values: Default::default(),
            colors: Default::default(),
            cells: Default::default(),
            message: None,
            pads: Default::default(),
        }
    }

    #[allow(missing_docs)]
    pub fn with_palette(mut self, palette: PaletteFn) -> Self {
        self.palette = palette;
        self
    }

    #[allow(missing_docs)]
    pub fn with_encoder(mut self, encoder: Box<dyn SysexEncoder>) -> Self {
        self.encoder = Some(encoder);
        self
    }

    #[allow(missing_docs)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[allow(missing_docs)]
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Forgets what the device is showing, so that the next writes all go out.
    /// Call it after the device reconnects.
    pub fn invalidate(&mut self) {
        self.values.clear();
        self.colors.clear();
        self.cells.clear();
        self.message = None;
        self.pads.clear();
    }

    fn send_sysex(&mut self, bytes: Option<Vec<u8>>) {
        if let Some(bytes) = bytes {
            self.transport.send_sysex(&bytes);
        }
    }
}
impl<T: Transport> SurfaceOutput for TransportOutput<T> {
    fn set_control_value(&mut self, control: ControlId, value: ParamValue) {
        let value = value.to_midi();
        if self.values.get(&control) == Some(&value) {
            return;
        }
        let Some((channel, source)) = self.registry.outbound(control) else {
            return;
        };
        self.values.insert(control, value);
        match source {
            MidiSource::Cc(cc) => self
                .transport
                .send_control_change(channel, u7::from(cc), value),
            MidiSource::Note(note) => {
                if value.as_int() > 0 {
                    self.transport.send_note_on(channel, u7::from(note), value);
                } else {
                    self.transport.send_note_off(channel, u7::from(note));
                }
            }
        }
    }

    fn set_control_color(&mut self, control: ControlId, color: Option<Color>) {
        if self.colors.get(&control) == Some(&color) {
            return;
        }
        self.colors.insert(control, color);
        let bytes = self
            .encoder
            .as_ref()
            .and_then(|e| e.encode_color(control, color));
        self.send_sysex(bytes);
    }

    fn set_cell(&mut self, column: usize, cell: DisplayCell) {
        if self.cells.get(&column) == Some(&cell) {
            return;
        }
        let bytes = self
            .encoder
            .as_ref()
            .and_then(|e| e.encode_cell(column, &cell));
        self.cells.insert(column, cell);
        self.send_sysex(bytes);
    }

    fn set_message(&mut self, message: Option<&str>) {
        let message = message.map(str::to_string);
        if self.message.as_ref() == Some(&message) {
            return;
        }
        let bytes = self
            .encoder
            .as_ref()
            .and_then(|e| e.encode_message(message.as_deref()));
        self.message = Some(message);
        self.send_sysex(bytes);
    }

    fn set_pad(&mut self, x: usize, y: usize, light: PadLight) {
        if self.pads.get(&(x, y)) == Some(&light) {
            return;
        }
        let (Some(channel), Some(note)) = (self.registry.grid_channel(), self.layout.note_at(x, y))
        else {
            return;
        };
        self.pads.insert((x, y), light);
        let (offset, color) = match light {
            PadLight::Off => {
                self.transport.send_note_off(channel, note);
                return;
            }
            PadLight::On(color) => (0, color),
            PadLight::Blink(color) => (1, color),
            PadLight::Pulse(color) => (2, color),
        };
        self.transport
            .send_note_on(channel.offset(offset), note, (self.palette)(color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        surface::ControlKind,
        testing::{RecordingTransport, SentMessage},
    };

    fn output() -> TransportOutput<RecordingTransport> {
        let mut registry = ControlRegistry::default();
        registry
            .register(
                MidiChannel(0),
                MidiSource::Cc(21),
                ControlId(1),
                ControlKind::Knob,
            )
            .unwrap();
        registry.set_grid_channel(MidiChannel(0));
        TransportOutput::new_with(
            RecordingTransport::default(),
            registry,
            GridLayout::default(),
        )
    }

    #[test]
    fn unchanged_values_are_not_resent() {
        let mut out = output();
        out.set_control_value(ControlId(1), ParamValue::MAX);
        out.set_control_value(ControlId(1), ParamValue::MAX);
        out.set_control_value(ControlId(99), ParamValue::MAX);
        assert_eq!(
            out.transport().sent,
            vec![SentMessage::ControlChange {
                channel: 0,
                cc: 21,
                value: 127
            }]
        );

        out.invalidate();
        out.set_control_value(ControlId(1), ParamValue::MAX);
        assert_eq!(out.transport().sent.len(), 2, "invalidate forces a resend");
    }

    #[test]
    fn pads_use_channel_per_animation() {
        let mut out = output();
        out.set_pad(0, 0, PadLight::On(Color::WHITE));
        out.set_pad(1, 0, PadLight::Pulse(Color::WHITE));
        out.set_pad(1, 0, PadLight::Pulse(Color::WHITE));
        out.set_pad(1, 0, PadLight::Off);
        assert_eq!(
            out.transport().sent,
            vec![
                SentMessage::NoteOn {
                    channel: 0,
                    note: 36,
                    velocity: 127
                },
                SentMessage::NoteOn {
                    channel: 2,
                    note: 37,
                    velocity: 127
                },
                SentMessage::NoteOff {
                    channel: 0,
                    note: 37
                },
            ]
        );
    }

    #[test]
    fn text_goes_through_the_encoder() {
        struct Encoder;
        impl SysexEncoder for Encoder {
            fn encode_cell(&self, column: usize, cell: &DisplayCell) -> Option<Vec<u8>> {
                let mut bytes = vec![0xf0, column as u8];
                bytes.extend(cell.top.bytes());
                bytes.push(0xf7);
                Some(bytes)
            }
        }
        let mut out = output().with_encoder(Box::new(Encoder));
        let cell = DisplayCell {
            top: "Hi".to_string(),
            bottom: String::default(),
        };
        out.set_cell(2, cell.clone());
        out.set_cell(2, cell);
        out.set_message(Some("ignored"));
        assert_eq!(
            out.transport().sent,
            vec![SentMessage::SysEx(vec![0xf0, 2, b'H', b'i', 0xf7])]
        );
    }
}
