//! kelp-gestures - turn landmark streams into debounced gesture messages
//!
//! Reads extractor output as JSON lines (one captured frame per line) from a
//! file or stdin and sends gesture state changes over UDP.
//!
//! ## Usage
//!
//! ```bash
//! # Live: pipe the landmark extractor into kelp
//! landmark-extractor --camera 0 | kelp-gestures
//!
//! # Replay a recording to another host, processing every other frame
//! KELP_DEST=192.168.1.20:5005 KELP_FRAME_SKIP=2 kelp-gestures session.jsonl
//!
//! # Also stream the index fingertip as a pointer
//! KELP_POINTER_DEST=127.0.0.1:5052 kelp-gestures
//! ```

use std::io::BufRead;
use std::path::PathBuf;

use tracing::info;

use kelp_core::{KelpResult, Signal};
use kelp_runtime::{
    init_logging, CaptureLoop, ExitReason, JsonLandmarkExtractor, JsonLinesSource, RuntimeConfig,
    StopSignal,
};
use kelp_transport::UdpSink;

fn drive<R: BufRead>(
    config: &RuntimeConfig,
    source: JsonLinesSource<R>,
    sink: UdpSink,
    pointer: Option<UdpSink>,
    stop: StopSignal,
) -> KelpResult<ExitReason> {
    let mut capture =
        CaptureLoop::new(config, source, JsonLandmarkExtractor, sink)?.with_stop_signal(stop);
    if let Some(pointer) = pointer {
        capture = capture.with_pointer_sink(pointer);
    }
    Ok(capture.run())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = RuntimeConfig::from_env()?;
    init_logging(config.log_format)?;

    let input: Option<PathBuf> = std::env::args().nth(1).map(PathBuf::from);

    info!("Kelp gesture bridge starting");
    info!("  Destination: {}", config.emitter.destination);
    match config.emitter.pointer_destination {
        Some(dest) => info!("  Pointer: {}", dest),
        None => info!("  Pointer: off"),
    }
    match &input {
        Some(path) => info!("  Landmarks: {}", path.display()),
        None => info!("  Landmarks: stdin"),
    }
    info!("  Frame skip factor: {}", config.scheduler.factor());
    info!("Gestures:");
    for signal in Signal::all() {
        info!(
            "  {:<22} -> {} (debounce {} frames)",
            signal.as_str(),
            signal.action(),
            config.debounce.threshold(*signal)
        );
    }

    let sink = UdpSink::open(config.emitter.destination)?;
    let pointer = config
        .emitter
        .pointer_destination
        .map(UdpSink::open)
        .transpose()?;
    let stop = StopSignal::new();
    let loop_stop = stop.clone();

    let mut capture = tokio::task::spawn_blocking(move || match input {
        Some(path) => drive(&config, JsonLinesSource::open(&path)?, sink, pointer, loop_stop),
        None => drive(&config, JsonLinesSource::stdin(), sink, pointer, loop_stop),
    });

    let reason = tokio::select! {
        joined = &mut capture => joined??,
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, stopping after the current frame");
            stop.trigger();
            capture.await??
        }
    };

    info!("Capture ended: {:?}", reason);
    info!("Goodbye!");
    Ok(())
}
