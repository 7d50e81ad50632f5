use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;

use voxorb_animation::AnimationController;
use voxorb_app::display::TracePlayer;
use voxorb_app::{OrbRuntime, OrbSettings, RuntimeOptions, VoiceOrb};
use voxorb_foundation::real_clock;
use voxorb_vad::{EventKind, VadConfig, VadEvent};

#[derive(Parser)]
#[command(name = "voxorb")]
#[command(about = "Microphone-reactive orb animation driver")]
struct Cli {
    /// Input device name (default: system default input)
    #[arg(short = 'D', long)]
    device: Option<String>,

    /// Path to a TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Analysis tick period in milliseconds (~16 is a 60 Hz refresh)
    #[arg(long)]
    tick_ms: Option<u64>,

    /// List available input devices and exit
    #[arg(long)]
    list_devices: bool,
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all("logs")?;
    let file_appender = RollingFileAppender::new(Rotation::DAILY, "logs", "voxorb.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout.and(non_blocking_file))
        .with_env_filter(log_level)
        .init();
    std::mem::forget(guard);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.list_devices {
        for name in voxorb_audio::input_device_names()? {
            println!("{name}");
        }
        return Ok(());
    }

    init_logging().map_err(|e| anyhow::anyhow!("logging init failed: {e}"))?;
    tracing::info!("Starting voxorb");

    if !voxorb_audio::is_supported() {
        anyhow::bail!("no audio input device available in this environment");
    }

    let settings = match &cli.config {
        Some(path) => OrbSettings::load(path)?,
        None => OrbSettings::default(),
    };

    let mut vad_config = VadConfig::default();
    vad_config.merge(settings.vad.clone());

    let device = cli.device.clone().or(settings.device.clone());
    let tick_ms = cli.tick_ms.or(settings.tick_ms).unwrap_or(16);

    let mut controller = AnimationController::default();
    controller.attach_player(Box::new(TracePlayer));

    let clock = real_clock();
    let orb = Arc::new(VoiceOrb::new(vad_config, controller, clock));

    // Forward discrete transitions out of the sync listener context; the
    // main loop drains and logs them.
    let (event_tx, event_rx) = crossbeam_channel::unbounded::<VadEvent>();
    for kind in [EventKind::VoiceStart, EventKind::VoiceEnd, EventKind::Error] {
        let tx = event_tx.clone();
        orb.on(kind, move |event| {
            let _ = tx.send(event.clone());
        });
    }

    let mut runtime = OrbRuntime::new(
        orb.clone(),
        RuntimeOptions {
            device,
            tick: Duration::from_millis(tick_ms),
        },
    );
    runtime.connect()?;
    runtime.start()?;
    tracing::info!(tick_ms, "analysis loop running, speak to drive the orb");

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut drain_interval = tokio::time::interval(Duration::from_millis(100));
    let mut status_interval = tokio::time::interval(Duration::from_secs(10));
    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                tracing::info!("Shutdown signal received");
                break;
            }
            _ = drain_interval.tick() => {
                for event in event_rx.try_iter() {
                    match event {
                        VadEvent::VoiceStart { timestamp_ms } => {
                            tracing::info!(timestamp_ms, "voice detected");
                        }
                        VadEvent::VoiceEnd { timestamp_ms, duration_ms } => {
                            tracing::info!(timestamp_ms, duration_ms, "voice ended");
                        }
                        VadEvent::Error { message } => {
                            tracing::warn!(%message, "detector error");
                        }
                        VadEvent::VoiceLevel { .. } => {}
                    }
                }
            }
            _ = status_interval.tick() => {
                let metrics = orb.metrics();
                tracing::info!(
                    samples = metrics.samples_processed,
                    segments = metrics.voice_segments,
                    voice_ms = metrics.total_voice_ms,
                    level = metrics.last_smoothed,
                    "pipeline status"
                );
            }
        }
    }

    runtime.shutdown().await;
    Ok(())
}
