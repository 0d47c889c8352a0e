// Copyright (c) 2024 Mike Tsao

use std::{rc::Rc, time::Instant};
use surfacer::{
    prelude::*,
    testing::{RecordingOutput, TestDaw},
};

const KNOB: ControlId = ControlId(1);

fn layer_session(daw: &Rc<TestDaw>) -> ControllerSession {
    let _ = env_logger::builder().is_test(true).try_init();
    daw.layers().set_names(&["Layer A", "Layer B"]);
    daw.drum_pads().set_names(&["Kick", "Snare", "Hat"]);

    let mut session = ControllerSession::new(SurfaceSettings::default(), daw.clone());
    let layers = Mode::new_with(
        ModeConfigBuilder::default()
            .name("Layers")
            .controls(vec![KNOB, ControlId(2)])
            .build()
            .unwrap(),
        LayerDrumPadProvider::new_with(&**daw, ParameterKind::Volume),
    );
    session.register_mode(ModeId::LAYER, layers).unwrap();
    session.set_default_mode(ModeId::LAYER);
    session.start().unwrap();
    session
}

// Values and touches that arrive after the device gains drum pads must land on
// the drum pads, never on the layers the controls addressed before.
#[test]
fn drum_pad_flip_retargets_values_and_touches() {
    let daw = TestDaw::new_with_tracks(&[]);
    let mut session = layer_session(&daw);
    let now = Instant::now();
    let layer = daw.layers().test_parameter(0, ParameterKind::Volume).unwrap();
    let kick = daw
        .drum_pads()
        .test_parameter(0, ParameterKind::Volume)
        .unwrap();

    session.handle_event(
        SurfaceEvent::Touch {
            control: KNOB,
            is_touched: true,
        },
        now,
    );
    session.handle_event(
        SurfaceEvent::Knob {
            control: KNOB,
            value: KnobValue::Absolute(ParamValue(0.3)),
        },
        now,
    );
    assert_eq!(layer.value(), ParamValue(0.3));
    assert!(layer.is_touched());

    daw.has_drum_pads().set(true);
    session.handle_event(
        SurfaceEvent::Knob {
            control: KNOB,
            value: KnobValue::Absolute(ParamValue(0.6)),
        },
        now,
    );
    assert_eq!(layer.value(), ParamValue(0.3), "the old handle is left alone");
    assert_eq!(layer.set_value_calls(), 1);
    assert_eq!(kick.value(), ParamValue(0.6));
    assert_eq!(layer.touch_history(), vec![true, false]);
    assert!(kick.is_touched(), "the held touch moved to the new parameter");

    session.handle_event(
        SurfaceEvent::Touch {
            control: KNOB,
            is_touched: false,
        },
        now,
    );
    assert_eq!(kick.touch_history(), vec![true, false]);
    assert_eq!(layer.touch_history(), vec![true, false]);

    let mut out = RecordingOutput::default();
    session.flush(&mut out, now + core::time::Duration::from_secs(1));
    assert_eq!(out.top(0), "Kick Volume");
    assert_eq!(out.top(1), "Snare Volume");
}

#[test]
fn past_the_end_is_always_the_empty_parameter() {
    let _ = env_logger::builder().is_test(true).try_init();
    let daw = TestDaw::new_with_tracks(&["Drums", "Bass"]);
    let tracks = CurrentTrackBank::from_daw(&*daw);
    let providers: Vec<ProviderRef> = vec![
        BankPageProvider::following(&tracks, ParameterKind::Volume),
        BankPageProvider::following(&tracks, ParameterKind::Send(3)),
        SelectedItemProvider::following(&tracks),
        LayerDrumPadProvider::new_with(&*daw, ParameterKind::Pan),
    ];

    for provider in providers.iter() {
        for index in provider.size()..32 {
            let parameter = provider.get(index);
            assert!(!parameter.exists());
            parameter.set_value(ParamValue::MAX);
            parameter.inc(0.5);
            parameter.reset();
            parameter.touch(true);
            assert_eq!(parameter.value(), ParamValue::MIN);
            assert_eq!(provider.color(index), None);
        }
    }
    assert_eq!(providers[0].size(), 2);
    assert_eq!(providers[2].size(), 0, "nothing is selected");

    daw.tracks().select(1);
    assert_eq!(providers[2].size(), 2, "volume and pan, no sends");
    assert_eq!(providers[2].get(1).name(), "Bass Pan");
    assert!(!providers[2].get(2).exists());
}

#[test]
fn nothing_selected_shows_the_placeholder() {
    let _ = env_logger::builder().is_test(true).try_init();
    let daw = TestDaw::new_with_tracks(&["Drums", "Bass"]);
    let mut session = ControllerSession::new(SurfaceSettings::default(), daw.clone());
    let track = Mode::new_with(
        ModeConfigBuilder::default()
            .name("Track")
            .controls(vec![KNOB, ControlId(2), ControlId(3)])
            .placeholder("Please select a track...")
            .indication(IndicationTarget::SelectedTrack)
            .build()
            .unwrap(),
        SelectedItemProvider::following(session.tracks()),
    );
    session.register_mode(ModeId::TRACK, track).unwrap();
    session.set_default_mode(ModeId::TRACK);
    session.start().unwrap();

    let now = Instant::now();
    let mut out = RecordingOutput::default();
    session.flush(&mut out, now);
    assert_eq!(out.top(0), "Please select a track...");
    assert_eq!(out.top(1), "");
    assert!(daw.tracks().indicated_parameters().is_empty());

    daw.tracks().select(0);
    session.flush(&mut out, now);
    assert_eq!(out.top(0), "Drums Volume");
    assert_eq!(out.top(1), "Drums Pan");
    assert_eq!(out.top(2), "", "no sends");
    assert_eq!(
        daw.tracks().indicated_parameters(),
        vec!["Drums Volume", "Drums Pan"],
        "the selection change reapplied indication"
    );
}
