use anyhow::{Context, Result};
use clap::Parser;
use lanebeat_core::{AppCore, ChartSource, Command, Event, SessionState};
use lanebeat_infra_storage_fs::FsStorage;
use lanebeat_ports::input::InputEvent;
use lanebeat_ports::playback::PlaybackMode;
use lanebeat_ports::storage::StoragePort;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(16);
const FRAME_SECONDS: f64 = 1.0 / 60.0;

#[derive(Parser, Debug)]
#[command(name = "lanebeat-app", about = "Headless Lanebeat session runner")]
struct RunArgs {
    /// Chart to play: a `.json` path, or the name of a stored chart.
    #[arg(required_unless_present = "list")]
    chart: Option<String>,

    /// List stored charts and exit.
    #[arg(long)]
    list: bool,

    /// Let the engine hit every note.
    #[arg(long)]
    autoplay: bool,

    /// JSON array of input events replayed at their timestamps.
    #[arg(long)]
    inputs: Option<PathBuf>,

    /// Write a diagnostics bundle into this directory after the song ends.
    #[arg(long)]
    diagnostics: Option<PathBuf>,

    /// Pace frames at wall-clock speed instead of running flat out.
    #[arg(long)]
    realtime: bool,

    /// Settings and chart directory (defaults to the user config dir).
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

/// A path to a `.json` file loads directly; anything else is a stored chart name.
fn chart_source(chart: &str) -> ChartSource {
    let path = Path::new(chart);
    if path.extension().is_some_and(|ext| ext == "json") || path.is_file() {
        ChartSource::JsonFile(chart.to_string())
    } else {
        ChartSource::Stored(chart.to_string())
    }
}

fn load_inputs(path: &Path) -> Result<Vec<InputEvent>> {
    let data = fs::read(path).with_context(|| format!("reading inputs {}", path.display()))?;
    let mut inputs: Vec<InputEvent> = serde_json::from_slice(&data)
        .with_context(|| format!("parsing inputs {}", path.display()))?;
    inputs.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    Ok(inputs)
}

fn emit(events: Vec<Event>) {
    for event in events {
        match serde_json::to_string(&event) {
            Ok(line) => println!("{line}"),
            Err(e) => warn!("failed to encode event: {e}"),
        }
    }
}

fn run(args: RunArgs) -> Result<()> {
    let storage = args.data_dir.map(FsStorage::new).unwrap_or_default();
    let storage: Option<Box<dyn StoragePort>> = Some(Box::new(storage));
    let mut core = AppCore::new(storage).context("starting session core")?;

    if args.list {
        core.handle_command(Command::ListCharts)
            .context("listing charts")?;
        emit(core.drain_events());
        return Ok(());
    }

    let chart = args.chart.context("no chart given")?;
    let inputs = match args.inputs.as_deref() {
        Some(path) => load_inputs(path)?,
        None => Vec::new(),
    };

    let mode = if args.autoplay {
        PlaybackMode::Autoplay
    } else {
        PlaybackMode::Manual
    };
    core.handle_command(Command::SetPlaybackMode { mode })?;
    core.handle_command(Command::LoadChart {
        source: chart_source(&chart),
    })
    .with_context(|| format!("loading chart {chart}"))?;
    core.handle_command(Command::StartPlay)?;
    emit(core.drain_events());

    let clock = core.playback_clock();
    let sink = core.input_sink();
    let mut next_input = 0;
    let mut frame = 0u64;
    while core.session_state() != SessionState::Finished {
        frame += 1;
        let now = frame as f64 * FRAME_SECONDS;
        clock.set(now);
        while next_input < inputs.len() && inputs[next_input].timestamp <= now {
            sink.push(inputs[next_input]);
            next_input += 1;
        }

        core.tick();
        emit(core.drain_events());

        if args.realtime {
            std::thread::sleep(FRAME);
        }
    }
    info!("played {frame} frames");

    if let Some(dir) = args.diagnostics {
        core.handle_command(Command::ExportDiagnostics {
            path: dir.to_string_lossy().into_owned(),
        })
        .with_context(|| format!("exporting diagnostics to {}", dir.display()))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();

    run(RunArgs::parse())
}
