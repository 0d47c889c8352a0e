// Copyright (c) 2024 Mike Tsao

use crate::{
    prelude::*,
    types::{u7, MidiMessage},
};
use anyhow::{anyhow, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// What kind of physical control a [ControlId] names.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlKind {
    /// A pot that reports its absolute position.
    Knob,
    /// A fader. Absolute, like [ControlKind::Knob].
    Fader,
    /// An endless encoder that reports relative steps.
    Encoder,
    /// A momentary button.
    Button,
    /// The touch sensor of another control. Its events are reported against
    /// that control.
    Touch,
}

/// Where a control's MIDI comes from and goes to.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MidiSource {
    /// A control change number.
    Cc(u8),
    /// A note number.
    Note(u8),
}
impl MidiSource {
    /// The controller or note number.
    pub fn number(&self) -> u8 {
        match self {
            MidiSource::Cc(number) | MidiSource::Note(number) => *number,
        }
    }
}

/// A physical event, already attributed to a control.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SurfaceEvent {
    /// A knob, fader or encoder reported a value.
    Knob {
        #[allow(missing_docs)]
        control: ControlId,
        #[allow(missing_docs)]
        value: KnobValue,
    },
    /// A control's touch sensor changed.
    Touch {
        #[allow(missing_docs)]
        control: ControlId,
        #[allow(missing_docs)]
        is_touched: bool,
    },
    /// A button went down or up.
    Button {
        #[allow(missing_docs)]
        control: ControlId,
        #[allow(missing_docs)]
        is_pressed: bool,
    },
    /// A grid pad was struck (velocity > 0) or released (velocity 0).
    Grid {
        #[allow(missing_docs)]
        note: u7,
        #[allow(missing_docs)]
        velocity: u7,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Registration {
    control: ControlId,
    kind: ControlKind,
}

/// The device's physical controls: which MIDI message each one sends, and the
/// channel the pad grid uses.
#[derive(Clone, Debug, Default)]
pub struct ControlRegistry {
    inbound: FxHashMap<(u8, MidiSource), Registration>,
    outbound: FxHashMap<ControlId, (MidiChannel, MidiSource)>,
    grid_channel: Option<MidiChannel>,
}
impl ControlRegistry {
    /// Declares a control. For [ControlKind::Touch], `control` is the control
    /// the sensor belongs to. Each control other than a touch sensor can be
    /// declared once.
    pub fn register(
        &mut self,
        channel: MidiChannel,
        source: MidiSource,
        control: ControlId,
        kind: ControlKind,
    ) -> Result<()> {
        if channel.0 > MidiChannel::MAX_VALUE {
            return Err(anyhow!("channel {channel} is out of range"));
        }
        if source.number() > 127 {
            return Err(anyhow!("{source:?} is not a 7-bit MIDI number"));
        }
        let key = (channel.0, source);
        if let Some(existing) = self.inbound.get(&key) {
            return Err(anyhow!(
                "{source} on channel {channel} is already control {}",
                existing.control
            ));
        }
        if kind != ControlKind::Touch {
            if let Some((existing_channel, existing_source)) = self.outbound.get(&control) {
                return Err(anyhow!(
                    "control {control} already sends {existing_source:?} on channel {existing_channel}"
                ));
            }
            self.outbound.insert(control, (channel, source));
        }
        self.inbound.insert(key, Registration { control, kind });
        Ok(())
    }

    /// Notes on `channel` are pad-grid notes.
    pub fn set_grid_channel(&mut self, channel: MidiChannel) {
        self.grid_channel = Some(channel);
    }

    #[allow(missing_docs)]
    pub fn grid_channel(&self) -> Option<MidiChannel> {
        self.grid_channel
    }

    /// Where feedback for `control` goes.
    pub fn outbound(&self, control: ControlId) -> Option<(MidiChannel, MidiSource)> {
        self.outbound.get(&control).copied()
    }

    /// The kind of a registered control.
    pub fn kind(&self, control: ControlId) -> Option<ControlKind> {
        self.inbound
            .values()
            .find(|r| r.control == control && r.kind != ControlKind::Touch)
            .map(|r| r.kind)
    }

    /// Attributes an incoming message to a control. Messages from unknown
    /// sources come back as [None].
    pub fn translate(&self, channel: MidiChannel, message: &MidiMessage) -> Option<SurfaceEvent> {
        match *message {
            MidiMessage::NoteOn { key, vel } => self.translate_note(channel, key, vel),
            MidiMessage::NoteOff { key, .. } => self.translate_note(channel, key, u7::from(0)),
            MidiMessage::Controller { controller, value } => {
                let r = self.inbound.get(&(channel.0, MidiSource::Cc(controller.as_int())))?;
                Some(match r.kind {
                    ControlKind::Knob | ControlKind::Fader => SurfaceEvent::Knob {
                        control: r.control,
                        value: KnobValue::Absolute(ParamValue::from_midi(value)),
                    },
                    ControlKind::Encoder => SurfaceEvent::Knob {
                        control: r.control,
                        value: KnobValue::from_relative_midi(value),
                    },
                    ControlKind::Button => SurfaceEvent::Button {
                        control: r.control,
                        is_pressed: value.as_int() > 0,
                    },
                    ControlKind::Touch => SurfaceEvent::Touch {
                        control: r.control,
                        is_touched: value.as_int() > 0,
                    },
                })
            }
            _ => None,
        }
    }

    fn translate_note(&self, channel: MidiChannel, key: u7, velocity: u7) -> Option<SurfaceEvent> {
        if let Some(r) = self.inbound.get(&(channel.0, MidiSource::Note(key.as_int()))) {
            let is_on = velocity.as_int() > 0;
            return match r.kind {
                ControlKind::Button => Some(SurfaceEvent::Button {
                    control: r.control,
                    is_pressed: is_on,
                }),
                ControlKind::Touch => Some(SurfaceEvent::Touch {
                    control: r.control,
                    is_touched: is_on,
                }),
                _ => None,
            };
        }
        if self.grid_channel == Some(channel) {
            return Some(SurfaceEvent::Grid {
                note: key,
                velocity,
            });
        }
        None
    }
}
