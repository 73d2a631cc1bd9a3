//! End-to-end: JSON landmark lines in, UDP gesture messages out

use std::io::Cursor;
use std::net::UdpSocket;
use std::time::Duration;

use kelp_core::{FrameLandmarks, HandLandmark, HandSnapshot, Handedness, Landmark, Signal};
use kelp_runtime::{
    CaptureLoop, ExitReason, JsonLandmarkExtractor, JsonLinesSource, RuntimeConfig, SchedulerConfig,
};
use kelp_transport::UdpSink;
use kelp_wire::{GestureMessage, PointerMessage};

fn fist_line(handedness: Handedness) -> String {
    let mut hand = HandSnapshot::zeroed(handedness);
    for (tip, knuckle) in HandLandmark::finger_pairs() {
        hand.set(*knuckle, Landmark::new(0.5, 0.6));
        hand.set(*tip, Landmark::new(0.5, 0.7));
    }
    hand.set(HandLandmark::ThumbMcp, Landmark::new(0.52, 0.6));
    hand.set(HandLandmark::ThumbTip, Landmark::new(0.50, 0.6));

    let frame = FrameLandmarks::empty().with_hand(hand).unwrap();
    serde_json::to_string(&frame).unwrap()
}

fn receiver() -> UdpSocket {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();
    socket
}

fn drain(socket: &UdpSocket, expected: usize) -> Vec<GestureMessage> {
    let mut buf = [0u8; 2048];
    (0..expected)
        .map(|_| {
            let (len, _) = socket.recv_from(&mut buf).unwrap();
            GestureMessage::decode(&buf[..len]).unwrap()
        })
        .collect()
}

#[test]
fn test_grab_press_and_release_over_udp() {
    let rx = receiver();
    let config = RuntimeConfig::default();

    let mut lines: Vec<String> = (0..5).map(|_| fist_line(Handedness::Right)).collect();
    lines.extend(["{}".to_string(), "".to_string(), "garbage".to_string()]);
    let input = lines.join("\n");

    let sink = UdpSink::open(rx.local_addr().unwrap()).unwrap();
    let source = JsonLinesSource::from_reader(Cursor::new(input));
    let mut capture = CaptureLoop::new(&config, source, JsonLandmarkExtractor, sink).unwrap();

    assert_eq!(capture.run(), ExitReason::EndOfStream);

    let stats = capture.stats();
    assert_eq!(stats.frames_captured, 8);
    assert_eq!(stats.frames_without_detection, 3);
    assert_eq!(stats.emissions_sent, 3);

    let messages = drain(&rx, 3);
    // First frame: everything false, still sent
    assert!(!messages[0].states.any());
    // Fifth fist frame reaches the grab threshold
    assert_eq!(messages[1].states.active().collect::<Vec<_>>(), vec![Signal::Grab]);
    // One frame without a fist drops it again
    assert!(!messages[2].states.any());
}

#[test]
fn test_frame_skip_slows_activation() {
    let rx = receiver();
    let config = RuntimeConfig {
        scheduler: SchedulerConfig::every(2),
        ..RuntimeConfig::default()
    };

    // Ten captured fist frames, five admitted: exactly the grab threshold
    let input = (0..10)
        .map(|_| fist_line(Handedness::Left))
        .collect::<Vec<_>>()
        .join("\n");

    let sink = UdpSink::open(rx.local_addr().unwrap()).unwrap();
    let source = JsonLinesSource::from_reader(Cursor::new(input));
    let mut capture = CaptureLoop::new(&config, source, JsonLandmarkExtractor, sink).unwrap();
    capture.run();

    assert_eq!(capture.stats().frames_admitted, 5);
    assert_eq!(capture.stats().frames_skipped, 5);
    assert_eq!(capture.pipeline().debounce().counter(Signal::Grab), 5);

    let messages = drain(&rx, 2);
    assert!(messages[1].states[Signal::Grab]);
}

#[test]
fn test_pointer_stream_over_udp() {
    let gestures = receiver();
    let pointer = receiver();
    let config = RuntimeConfig::default();

    let hand = HandSnapshot::zeroed(Handedness::Right)
        .with(HandLandmark::IndexTip, Landmark::new(0.25, 0.5));
    let hand_line = serde_json::to_string(&FrameLandmarks::empty().with_hand(hand).unwrap()).unwrap();
    let input = [hand_line.as_str(), "{}", hand_line.as_str()].join("\n");

    let mut capture = CaptureLoop::new(
        &config,
        JsonLinesSource::from_reader(Cursor::new(input)),
        JsonLandmarkExtractor,
        UdpSink::open(gestures.local_addr().unwrap()).unwrap(),
    )
    .unwrap()
    .with_pointer_sink(UdpSink::open(pointer.local_addr().unwrap()).unwrap());
    capture.run();

    assert_eq!(capture.stats().pointer_sent, 2);

    let mut buf = [0u8; 256];
    for _ in 0..2 {
        let (len, _) = pointer.recv_from(&mut buf).unwrap();
        assert_eq!(
            PointerMessage::decode(&buf[..len]).unwrap(),
            PointerMessage { x: 0.25, y: 0.5 }
        );
    }
}
