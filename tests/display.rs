// Copyright (c) 2024 Mike Tsao

use core::time::Duration;
use float_cmp::approx_eq;
use more_asserts::assert_gt;
use std::{rc::Rc, time::Instant};
use surfacer::{
    prelude::*,
    testing::{RecordingOutput, RecordingTransport, SentMessage, TestDaw},
};

const KNOBS: [ControlId; 8] = [
    ControlId(1),
    ControlId(2),
    ControlId(3),
    ControlId(4),
    ControlId(5),
    ControlId(6),
    ControlId(7),
    ControlId(8),
];

fn ms(start: Instant, millis: u64) -> Instant {
    start + Duration::from_millis(millis)
}

fn knob(control: ControlId, value: f64) -> SurfaceEvent {
    SurfaceEvent::Knob {
        control,
        value: KnobValue::Absolute(ParamValue(value)),
    }
}

// Volume and pan over a four-track bank, with no views.
fn volume_session() -> (Rc<TestDaw>, ControllerSession) {
    let _ = env_logger::builder().is_test(true).try_init();
    let daw = TestDaw::new_with_tracks(&["Drums", "Bass", "Keys", "Vox"]);
    let mut session = ControllerSession::new(SurfaceSettings::default(), daw.clone());
    for (id, name, kind, indication) in [
        (
            ModeId::VOLUME,
            "Volume",
            ParameterKind::Volume,
            IndicationTarget::Volume,
        ),
        (ModeId::PAN, "Pan", ParameterKind::Pan, IndicationTarget::Pan),
    ] {
        let mode = Mode::new_with(
            ModeConfigBuilder::default()
                .name(name)
                .controls(KNOBS.to_vec())
                .indication(indication)
                .build()
                .unwrap(),
            BankPageProvider::following(session.tracks(), kind),
        );
        session.register_mode(id, mode).unwrap();
    }
    session.set_default_mode(ModeId::VOLUME);
    session.start().unwrap();
    (daw, session)
}

// Demonstrates that a knob being turned keeps its LED ring to itself until it
// has been quiet for the settle window.
#[test]
fn turning_knobs_are_not_repainted() {
    let (daw, mut session) = volume_session();
    let mut out = RecordingOutput::default();
    let t0 = Instant::now();

    session.flush(&mut out, t0);
    assert_eq!(out.total_value_writes(), KNOBS.len());
    out.reset_counts();

    session.handle_event(knob(KNOBS[0], 0.25), t0);
    session.flush(&mut out, ms(t0, 50));
    assert_eq!(out.value_writes.get(&KNOBS[0]), None);
    assert_eq!(out.value_writes.get(&KNOBS[1]), Some(&1));

    // 150ms later is still within the window of the first value.
    session.handle_event(knob(KNOBS[0], 0.5), ms(t0, 150));
    session.flush(&mut out, ms(t0, 300));
    assert_eq!(out.value_writes.get(&KNOBS[0]), None);
    assert!(!session.is_dirty());

    // The re-check scheduled by the first value now finds the knob settled.
    session.tick(ms(t0, 400));
    assert!(session.is_dirty(), "settling asks for a repaint");
    session.flush(&mut out, ms(t0, 400));
    assert_eq!(out.value_writes.get(&KNOBS[0]), Some(&1));
    assert!(approx_eq!(
        f64,
        out.values[&KNOBS[0]].0,
        0.5,
        epsilon = 0.000001
    ));

    let volume = daw
        .tracks()
        .test_parameter(0, ParameterKind::Volume)
        .unwrap();
    assert!(approx_eq!(f64, volume.value().0, 0.5, epsilon = 0.000001));
    assert_eq!(volume.set_value_calls(), 2);
    assert_eq!(session.next_due(), None, "nothing left to re-check");
}

// Demonstrates that repeated flushes don't keep telling the DAW what it
// already knows.
#[test]
fn indication_is_applied_once_per_change() {
    let (daw, mut session) = volume_session();
    let mut out = RecordingOutput::default();
    let now = Instant::now();

    session.flush(&mut out, now);
    let first = daw.indication_calls();
    assert_gt!(first, 0);
    assert_eq!(
        daw.tracks().indicated_parameters(),
        vec![
            "Drums Volume".to_string(),
            "Bass Volume".to_string(),
            "Keys Volume".to_string(),
            "Vox Volume".to_string(),
        ]
    );

    session.flush(&mut out, now);
    session.handle_event(knob(KNOBS[2], 0.1), now);
    session.flush(&mut out, now);
    assert!(!session.update_indication());
    assert_eq!(daw.indication_calls(), first);

    session.set_mode(ModeId::PAN).unwrap();
    session.flush(&mut out, now);
    assert_gt!(daw.indication_calls(), first);
    assert_eq!(
        daw.tracks().indicated_parameters(),
        vec![
            "Drums Pan".to_string(),
            "Bass Pan".to_string(),
            "Keys Pan".to_string(),
            "Vox Pan".to_string(),
        ]
    );
}

// Demonstrates a session rendering onto raw MIDI, sending only what changed.
#[test]
fn transport_output_sends_only_changes() {
    let (_, mut session) = volume_session();
    let mut registry = ControlRegistry::default();
    for (i, control) in KNOBS.iter().enumerate() {
        registry
            .register(
                MidiChannel(0),
                MidiSource::Cc(21 + i as u8),
                *control,
                ControlKind::Knob,
            )
            .unwrap();
    }
    let mut out = TransportOutput::new_with(
        RecordingTransport::default(),
        registry,
        GridLayout::default(),
    );
    let t0 = Instant::now();

    session.flush(&mut out, t0);
    let sent = &out.transport().sent;
    assert_eq!(sent.len(), KNOBS.len());
    assert_eq!(
        sent[0],
        SentMessage::ControlChange {
            channel: 0,
            cc: 21,
            value: 102
        },
        "a volume of 0.8"
    );
    assert_eq!(
        sent[7],
        SentMessage::ControlChange {
            channel: 0,
            cc: 28,
            value: 0
        },
        "past the last track"
    );

    session.flush(&mut out, t0);
    assert_eq!(out.transport().sent.len(), KNOBS.len());

    session.handle_event(knob(KNOBS[1], 0.25), t0);
    session.flush(&mut out, ms(t0, 300));
    assert_eq!(
        out.transport().sent.last(),
        Some(&SentMessage::ControlChange {
            channel: 0,
            cc: 22,
            value: 32
        })
    );
    assert_eq!(out.transport().sent.len(), KNOBS.len() + 1);
}

// Demonstrates that switching to a mode with fewer controls clears what the
// previous mode left on the others.
#[test]
fn switching_modes_blanks_what_the_old_mode_drew() {
    let (daw, mut session) = volume_session();
    let track = Mode::new_with(
        ModeConfigBuilder::default()
            .name("Track")
            .controls(KNOBS[..2].to_vec())
            .indication(IndicationTarget::SelectedTrack)
            .build()
            .unwrap(),
        SelectedItemProvider::following(session.tracks()),
    );
    session.register_mode(ModeId::TRACK, track).unwrap();
    let mut out = RecordingOutput::default();
    let now = Instant::now();

    session.flush(&mut out, now);
    assert_eq!(out.top(2), "Keys Volume");
    assert!(out.colors[&KNOBS[3]].is_some());

    daw.tracks().select(0);
    session.set_mode(ModeId::TRACK).unwrap();
    session.flush(&mut out, now);
    assert_eq!(out.top(0), "Drums Volume");
    assert_eq!(out.top(1), "Drums Pan");
    for column in 2..KNOBS.len() {
        assert_eq!(out.top(column), "", "column {column} belongs to no mode");
        assert_eq!(out.values[&KNOBS[column]], ParamValue::MIN);
        assert_eq!(out.colors[&KNOBS[column]], None);
    }

    // Once blanked, the unused controls are left alone.
    out.reset_counts();
    session.flush(&mut out, now);
    assert_eq!(out.value_writes.get(&KNOBS[3]), None);
    assert_eq!(out.value_writes.get(&KNOBS[0]), Some(&1));
}
