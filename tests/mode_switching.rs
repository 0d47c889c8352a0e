// Copyright (c) 2024 Mike Tsao

use std::{rc::Rc, time::Instant};
use surfacer::{
    prelude::*,
    testing::{TestBank, TestDaw},
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

fn mixer_mode(session: &ControllerSession, name: &str, mode: ModeId) -> Mode {
    let (kind, indication) = match mode.send_index() {
        Some(k) => (ParameterKind::Send(k), IndicationTarget::Send(k)),
        None if mode == ModeId::PAN => (ParameterKind::Pan, IndicationTarget::Pan),
        None => (ParameterKind::Volume, IndicationTarget::Volume),
    };
    Mode::new_with(
        ModeConfigBuilder::default()
            .name(name)
            .controls(KNOBS.to_vec())
            .indication(indication)
            .placeholder("Please select a track...")
            .build()
            .unwrap(),
        BankPageProvider::following(session.tracks(), kind),
    )
}

// Volume, pan and send 1 over the track bank, with VOLUME as the default.
fn mixer_session() -> (Rc<TestDaw>, ControllerSession) {
    let _ = env_logger::builder().is_test(true).try_init();
    let daw = TestDaw::new_with_tracks(&["Drums", "Bass", "Keys", "Vox"]);
    daw.tracks().set_send_count(2);
    daw.effect_tracks().set_send_count(2);

    let mut session = ControllerSession::new(SurfaceSettings::default(), daw.clone());
    for (id, name) in [
        (ModeId::VOLUME, "Volume"),
        (ModeId::PAN, "Pan"),
        (ModeId::SEND1, "Send 1"),
    ] {
        let mode = mixer_mode(&session, name, id);
        session.register_mode(id, mode).unwrap();
    }
    session.set_default_mode(ModeId::VOLUME);
    session
        .register_view(
            ViewId::SESSION,
            Box::new(SessionView::new_with(GridLayout::default())),
        )
        .unwrap();
    session.set_default_view(ViewId::SESSION);
    session.start().unwrap();
    (daw, session)
}

fn assert_indicated_sends_only(bank: &TestBank, names: &[&str]) {
    let expected: Vec<String> = names.iter().map(|name| format!("{name} Send 1")).collect();
    assert_eq!(bank.indicated_parameters(), expected);
}

#[test]
fn send1_end_to_end() {
    let (daw, mut session) = mixer_session();
    session.set_mode(ModeId::SEND1).unwrap();
    assert_eq!(
        session.effective_mode_instance().map(|m| m.name()),
        Some("Send 1")
    );

    assert!(session.update_indication());
    assert_indicated_sends_only(daw.tracks(), &["Drums", "Bass", "Keys", "Vox"]);
    assert!(daw.effect_tracks().indicated_parameters().is_empty());
    assert!(
        daw.tracks().is_clip_launcher_indicated(),
        "the session view highlights the launcher of the current bank"
    );

    session.toggle_effect_bank();
    assert!(session.update_indication());
    assert!(daw.tracks().indicated_parameters().is_empty());
    assert_indicated_sends_only(daw.effect_tracks(), &["Reverb", "Delay"]);
    assert!(!daw.tracks().is_clip_launcher_indicated());
    assert!(daw.effect_tracks().is_clip_launcher_indicated());
}

#[test]
fn at_most_one_mode_is_ever_active() {
    let (_, mut session) = mixer_session();
    let sequence = [
        ModeId::PAN,
        ModeId::PAN,
        ModeId::SEND1,
        ModeId::VOLUME,
        ModeId::SEND1,
        ModeId::PAN,
    ];
    for id in sequence {
        session.set_mode(id).unwrap();
        assert_eq!(session.modes().active_count(), 1);
        assert_eq!(session.effective_mode(), Some(id));
        assert!(session.modes().get(id).unwrap().is_active());
    }
    assert_eq!(session.views().active_count(), 1);
}

#[test]
fn reactivating_does_not_rebind() {
    let (_, mut session) = mixer_session();
    let before = session.bindings().len();
    let owned = session
        .bindings()
        .count_for(BindingOwner::Mode(ModeId::VOLUME));
    assert_eq!(owned, KNOBS.len());

    session.set_mode(ModeId::VOLUME).unwrap();
    assert_eq!(session.bindings().len(), before);
    assert_eq!(
        session
            .bindings()
            .count_for(BindingOwner::Mode(ModeId::VOLUME)),
        owned
    );

    session.set_mode(ModeId::PAN).unwrap();
    assert_eq!(
        session
            .bindings()
            .count_for(BindingOwner::Mode(ModeId::VOLUME)),
        0
    );
    assert_eq!(
        session.bindings().count_for(BindingOwner::Mode(ModeId::PAN)),
        KNOBS.len()
    );
    assert_eq!(session.bindings().len(), before);
}

#[test]
fn overlay_restores_the_previous_mode() {
    let (_, mut session) = mixer_session();
    let now = Instant::now();
    let pan_button = ControlId(50);
    let send_button = ControlId(51);
    session.bind_button(pan_button, ButtonAction::MomentaryMode(ModeId::PAN));
    session.bind_button(send_button, ButtonAction::MomentaryMode(ModeId::SEND1));
    let button = |control, is_pressed| SurfaceEvent::Button {
        control,
        is_pressed,
    };

    session.handle_event(button(pan_button, true), now);
    assert_eq!(session.effective_mode(), Some(ModeId::PAN));
    assert_eq!(session.modes().active_id(), Some(ModeId::VOLUME));

    // A second overlay is a wiring error. It's logged and ignored.
    session.handle_event(button(send_button, true), now);
    assert_eq!(session.effective_mode(), Some(ModeId::PAN));
    session.handle_event(button(send_button, false), now);
    assert_eq!(session.effective_mode(), Some(ModeId::PAN));

    session.handle_event(button(pan_button, false), now);
    assert_eq!(session.effective_mode(), Some(ModeId::VOLUME));
    assert_eq!(session.modes().temporary_id(), None);
    assert_eq!(session.modes().active_count(), 1);
}

#[test]
fn configuration_errors_surface_at_startup() {
    let daw = TestDaw::new_with_tracks(&[]);
    let mut session = ControllerSession::new(SurfaceSettings::default(), daw);
    let mode = mixer_mode(&session, "Volume", ModeId::VOLUME);
    session.register_mode(ModeId::VOLUME, mode).unwrap();
    let again = mixer_mode(&session, "Volume", ModeId::VOLUME);
    let e = session.register_mode(ModeId::VOLUME, again).unwrap_err();
    assert_eq!(
        e.downcast_ref::<SurfaceError>(),
        Some(&SurfaceError::duplicate(ManagedKind::Mode, ModeId::VOLUME))
    );

    assert!(matches!(
        session.set_mode(ModeId::PAN),
        Err(SurfaceError::Unregistered { .. })
    ));

    session.set_default_mode(ModeId::USER);
    assert!(session.start().is_err());
}
