mod common;

use common::{frame, loaded, TWO_TAPS};
use lanebeat_core::{
    AppCore, ChartSource, Command, Event, FrameClock, PlaybackClock, PlayResult, Transport,
    TransportState, DIAGNOSTICS_FILE, INPUT_QUEUE_CAPACITY,
};
use lanebeat_ports::input::InputEvent;
use lanebeat_ports::playback::TimeSource;
use lanebeat_ports::types::GroupId;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

#[test]
fn playback_clock_ignores_backwards_writes() {
    let clock = PlaybackClock::new();
    clock.set(1.5);
    clock.set(1.2);
    assert_eq!(clock.now(), 1.5);
    clock.set(2.0);
    assert_eq!(clock.get(), 2.0);

    clock.reset();
    assert_eq!(clock.get(), 0.0);
}

#[test]
fn transport_latches_only_while_playing() {
    let playback = Arc::new(PlaybackClock::new());
    let mut transport = Transport::new(playback.clone());
    let frame_clock: Arc<FrameClock> = transport.frame_clock();

    playback.set(0.4);
    assert_eq!(transport.begin_frame(), None);
    assert_eq!(frame_clock.now(), 0.0);

    transport.play();
    assert_eq!(transport.begin_frame(), Some(0.4));
    playback.set(0.9);
    // Mid-frame clock movement is invisible until the next latch.
    assert_eq!(frame_clock.now(), 0.4);

    transport.pause();
    assert_eq!(transport.state(), TransportState::Paused);
    assert_eq!(transport.begin_frame(), None);
    assert_eq!(transport.now(), 0.4);

    transport.stop();
    assert_eq!(transport.state(), TransportState::Stopped);
    assert_eq!(playback.get(), 0.0);
    assert_eq!(transport.now(), 0.0);
}

#[test]
fn full_input_queue_rejects_further_events() {
    let app = AppCore::new(None).unwrap();
    let sink = app.input_sink();
    for i in 0..INPUT_QUEUE_CAPACITY {
        assert!(sink.push(InputEvent::press(0, i as f64)));
    }
    assert!(!sink.push(InputEvent::press(0, 0.0)));
}

#[test]
fn input_sink_is_shareable_across_threads() {
    let mut app = loaded(TWO_TAPS);
    app.handle_command(Command::StartPlay).unwrap();
    let sink = app.input_sink();

    std::thread::spawn(move || {
        sink.press(0, 0.5);
        sink.release(0, 0.6);
    })
    .join()
    .unwrap();

    let events = frame(&mut app, 0.6);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::JudgeFeedback { lane: 0, time_lag: Some(lag), .. } if *lag == 0.0
    )));
}

#[test]
fn commands_and_events_use_tagged_json() {
    let cmd: Command = serde_json::from_value(json!({
        "type": "LoadChart",
        "payload": { "source": { "type": "Stored", "payload": "demo" } }
    }))
    .unwrap();
    assert!(matches!(
        cmd,
        Command::LoadChart { source: ChartSource::Stored(name) } if name == "demo"
    ));

    let cmd: Command = serde_json::from_value(json!({ "type": "StartPlay" })).unwrap();
    assert!(matches!(cmd, Command::StartPlay));

    let value = serde_json::to_value(Event::LongNoteRetired { group: GroupId(3) }).unwrap();
    assert_eq!(
        value,
        json!({ "type": "LongNoteRetired", "payload": { "group": 3 } })
    );
}

#[test]
fn diagnostics_bundle_captures_summary_inputs_and_live_notes() {
    let mut app = loaded(TWO_TAPS);
    let sink = app.input_sink();
    app.handle_command(Command::StartPlay).unwrap();
    sink.press(0, 0.5);
    frame(&mut app, 0.5);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bundle");
    app.handle_command(Command::ExportDiagnostics {
        path: path.to_string_lossy().into_owned(),
    })
    .unwrap();

    let bundle: serde_json::Value =
        serde_json::from_slice(&std::fs::read(path.join(DIAGNOSTICS_FILE)).unwrap()).unwrap();

    let summary: PlayResult = serde_json::from_value(bundle["summary"].clone()).unwrap();
    assert_eq!(summary.score, 500_000);
    assert_eq!(summary.tier_counts.perfect, 1);
    assert_eq!(bundle["recent_inputs"].as_array().map(Vec::len), Some(1));

    let session = &bundle["session"];
    assert_eq!(session["state"], json!("Running"));
    assert_eq!(session["now"], json!(0.5));
    assert_eq!(session["title"], json!("two taps"));
    assert_eq!(session["total_notes"], json!(2));
    // Only the untouched lane 1 note is still live.
    let live = session["live_notes"].as_array().cloned().unwrap_or_default();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0]["lane"], json!(1));
    assert_eq!(live[0]["arrival_time"], json!(1.0));
}

#[test]
fn diagnostics_without_a_chart_has_no_session() {
    let app = AppCore::new(None).unwrap();
    let bundle = app.diagnostics();
    assert!(bundle.summary.is_none());
    assert!(bundle.session.is_none());

    let dir = tempfile::tempdir().unwrap();
    let written = bundle.write_to(dir.path()).unwrap();
    assert_eq!(written, dir.path().join(DIAGNOSTICS_FILE));

    let value: serde_json::Value = serde_json::from_slice(&std::fs::read(written).unwrap()).unwrap();
    assert_eq!(value["session"], serde_json::Value::Null);
    assert_eq!(value["settings"]["judging_offset_ms"], json!(0));
}
