use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use clap::Parser;
use tracing::{error, info, warn};

use camviewer_rs::camera_pipeline::{
    CheckpointCompression, Colormap, DeviceSettings, Dimensions, OperatorSetup, SessionConfig,
    SessionController, SessionControls, SessionEvent, SyntheticSource, TiffCheckpointWriter, ViewMode,
};
use camviewer_rs::logger;

/// Headless acquisition run against the synthetic camera
#[derive(Parser, Debug)]
#[command(name = "camviewer", version, about)]
struct Args {
    /// Operator setup file to restore before starting
    #[arg(long)]
    setup: Option<PathBuf>,

    /// Save the operator setup used for this run
    #[arg(long)]
    save_setup: Option<PathBuf>,

    /// Directory checkpoint files are written to
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Checkpoint file name stem
    #[arg(short, long)]
    base_name: Option<String>,

    /// Do not write checkpoint files
    #[arg(long)]
    no_persist: bool,

    /// Session length in seconds
    #[arg(short, long, default_value_t = 5.0)]
    seconds: f64,

    /// Seconds between periodic checkpoints
    #[arg(long, default_value_t = 30)]
    checkpoint_interval: u64,

    #[arg(long)]
    view: Option<ViewMode>,

    #[arg(long)]
    colormap: Option<Colormap>,

    /// Floor threshold, percent of frame maximum
    #[arg(long)]
    floor: Option<f64>,

    /// Ceiling threshold, percent of frame maximum
    #[arg(long)]
    ceiling: Option<f64>,

    /// Quarter turns counter-clockwise (negative turns clockwise)
    #[arg(long, allow_hyphen_values = true)]
    rotate: Option<i32>,

    /// Sensor readout width and height of the synthetic camera
    #[arg(long, num_args = 2, value_names = ["WIDTH", "HEIGHT"], default_values_t = [512, 512])]
    sensor: Vec<usize>,

    /// Display surface width and height
    #[arg(long, num_args = 2, value_names = ["WIDTH", "HEIGHT"], default_values_t = [640, 640])]
    display: Vec<u32>,

    /// Noise seed of the synthetic camera
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,

    /// Write the last rendered bitmap to this PNG file
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    if args.seconds <= 0.0 {
        bail!("session length must be positive, got {}", args.seconds);
    }

    let mut setup = match &args.setup {
        Some(path) => OperatorSetup::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => OperatorSetup::default(),
    };
    if let Some(directory) = &args.directory {
        setup.directory = directory.clone();
    }
    if let Some(base_name) = &args.base_name {
        setup.base_name = base_name.clone();
    }
    if args.no_persist {
        setup.persist = false;
    }

    let controls = Arc::new(SessionControls::default());
    setup.apply_to(&controls);
    if let Some(view) = args.view {
        controls.set_view(view);
    }
    if let Some(colormap) = args.colormap {
        controls.set_colormap(colormap);
    }
    if args.floor.is_some() || args.ceiling.is_some() {
        let current = controls.render();
        controls.set_thresholds(
            args.floor.unwrap_or(current.floor_percent),
            args.ceiling.unwrap_or(current.ceiling_percent),
        )?;
    }
    if let Some(steps) = args.rotate {
        controls.rotate(steps);
    }

    let config = SessionConfig::builder()
        .directory(&setup.directory)
        .base_name(&setup.base_name)
        .checkpoint_interval(Duration::from_secs(args.checkpoint_interval))
        .display_size(args.display[0], args.display[1])
        .build();
    std::fs::create_dir_all(&config.directory)
        .with_context(|| format!("creating {}", config.directory.display()))?;

    let source = SyntheticSource::new(Dimensions::new(args.sensor[0], args.sensor[1]))
        .paced(true)
        .with_seed(args.seed);
    let writer = TiffCheckpointWriter::new(CheckpointCompression::DeflateBalanced);
    let mut controller = SessionController::new(source, writer, config)
        .context("camera initialization failed")?
        .with_controls(Arc::clone(&controls));

    let device = device_settings_for(&setup.device, args.sensor[0], args.sensor[1]);
    controller.apply_device_settings(&device)?;

    if let Some(path) = &args.save_setup {
        OperatorSetup::capture(&device, &controls, controller.config()).save(path)?;
    }

    controller.start()?;
    info!(params = ?controls.render(), "Acquiring");

    let deadline = Instant::now() + Duration::from_secs_f64(args.seconds);
    let mut last_display = None;
    while Instant::now() < deadline {
        let report = controller.tick();
        for event in &report.events {
            match event {
                SessionEvent::FpsUpdated(fps) => info!(fps, "Frame rate"),
                SessionEvent::CheckpointWritten(path) => info!(path = %path.display(), "Checkpoint"),
                SessionEvent::CheckpointFailed(reason) => warn!(%reason, "Checkpoint failed"),
                SessionEvent::AcquisitionStopped(reason) => error!(%reason, "Acquisition stopped"),
            }
        }
        if report.display.is_some() {
            last_display = report.display;
        } else {
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    if let Some(summary) = controller.stop()? {
        info!(
            processed = summary.frames_processed,
            dropped = summary.frames_dropped,
            output = ?summary.output_path,
            "Session finished"
        );
    }

    if let (Some(path), Some(snapshot)) = (&args.snapshot, &last_display) {
        snapshot
            .image
            .save(path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), view = %snapshot.view, "Display snapshot written");
    }

    controller.shutdown()?;
    Ok(())
}

/// Limits the configured subarea to the synthetic sensor size.
fn device_settings_for(settings: &DeviceSettings, width: usize, height: usize) -> DeviceSettings {
    let mut device = settings.clone();
    device.subarea.end_x = device.subarea.end_x.min(width as u32);
    device.subarea.end_y = device.subarea.end_y.min(height as u32);
    device
}
